//! The per-day event index and the day query.
//!
//! A [`CalendarIndex`] has no mutating API: it is assembled through a
//! [`CalendarIndexBuilder`] and frozen by [`CalendarIndexBuilder::build`], so
//! a consumer holding an index never sees it change underneath.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::event::Event;
use crate::time::DateKey;

/// Mapping from local day to that day's events, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CalendarIndex {
    days: BTreeMap<DateKey, Vec<Event>>,
}

impl CalendarIndex {
    /// Returns an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a new index.
    pub fn builder() -> CalendarIndexBuilder {
        CalendarIndexBuilder::default()
    }

    /// Returns true if no day holds any event.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of days that hold at least one event.
    pub fn date_count(&self) -> usize {
        self.days.len()
    }

    /// Total number of events across all days.
    pub fn event_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        self.days.contains_key(key)
    }

    /// Returns the bucket for `key`, if present.
    pub fn get(&self, key: &DateKey) -> Option<&[Event]> {
        self.days.get(key).map(Vec::as_slice)
    }

    /// Returns the events of one day; an absent day yields an empty slice.
    pub fn events_for_day(&self, key: &DateKey) -> &[Event] {
        self.get(key).unwrap_or(&[])
    }

    /// Iterates days in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &[Event])> {
        self.days.iter().map(|(key, events)| (key, events.as_slice()))
    }

    /// Iterates every event, day by day.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.days.values().flatten()
    }
}

/// Returns the events of `key` in `index`, never failing on absent days.
pub fn events_for_day<'a>(index: &'a CalendarIndex, key: &DateKey) -> &'a [Event] {
    index.events_for_day(key)
}

/// Accumulates events into day buckets.
#[derive(Debug, Default)]
pub struct CalendarIndexBuilder {
    days: BTreeMap<DateKey, Vec<Event>>,
}

impl CalendarIndexBuilder {
    /// Appends an event to the bucket of its day, creating the bucket if needed.
    pub fn push(&mut self, event: Event) {
        self.days.entry(event.date_key()).or_default().push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Freezes the accumulated buckets into an index.
    pub fn build(self) -> CalendarIndex {
        CalendarIndex { days: self.days }
    }
}

impl Extend<Event> for CalendarIndexBuilder {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}

impl FromIterator<Event> for CalendarIndex {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        let mut builder = Self::builder();
        builder.extend(iter);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn event(day: &str, title: &str) -> Event {
        Event::new(key(day), EventKind::GenericEvent, title, "#2196F3")
    }

    #[test]
    fn buckets_keep_insertion_order() {
        let index: CalendarIndex = vec![
            event("2025-09-01", "first"),
            event("2025-09-02", "other day"),
            event("2025-09-01", "second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(index.date_count(), 2);
        assert_eq!(index.event_count(), 3);
        let titles: Vec<_> = index
            .events_for_day(&key("2025-09-01"))
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn day_query_is_total() {
        let index: CalendarIndex = vec![event("2025-09-01", "x")].into_iter().collect();
        assert!(events_for_day(&index, &key("2025-09-02")).is_empty());
        assert!(index.get(&key("2025-09-02")).is_none());
        assert!(events_for_day(&CalendarIndex::new(), &key("2025-01-01")).is_empty());
    }

    #[test]
    fn iteration_is_chronological() {
        let index: CalendarIndex = vec![
            event("2025-12-25", "late"),
            event("2025-01-01", "early"),
        ]
        .into_iter()
        .collect();
        let days: Vec<_> = index.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(days, vec!["2025-01-01", "2025-12-25"]);
        assert_eq!(index.events().count(), 2);
    }

    #[test]
    fn empty_builder_builds_empty_index() {
        let builder = CalendarIndex::builder();
        assert!(builder.is_empty());
        let index = builder.build();
        assert!(index.is_empty());
        assert_eq!(index.event_count(), 0);
    }

    #[test]
    fn serializes_as_date_map() {
        let index: CalendarIndex = vec![event("2025-09-01", "x")].into_iter().collect();
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["2025-09-01"][0]["title"], "x");
    }
}
