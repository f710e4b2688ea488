//! RawEvent to Event conversion.
//!
//! The only fallible step is the date: a record whose date does not parse is
//! rejected on its own, the caller decides to drop it and keep going.

use chrono::{Local, TimeZone};
use tracing::debug;

use campuscal_core::{Event, InvalidDateError, normalize_in};

use crate::raw_event::RawEvent;

/// Converts a [`RawEvent`] into an [`Event`] keyed by its local day.
///
/// # Errors
///
/// Returns [`InvalidDateError`] if the raw date cannot be parsed.
pub fn to_event(raw: &RawEvent) -> Result<Event, InvalidDateError> {
    to_event_in(raw, &Local)
}

/// Same as [`to_event`] with an explicit timezone for absolute instants.
pub fn to_event_in<Tz: TimeZone>(raw: &RawEvent, tz: &Tz) -> Result<Event, InvalidDateError> {
    let date_key = normalize_in(&raw.raw_date, tz)?;

    let mut event = Event::new(
        date_key,
        raw.source_kind.event_kind(),
        &raw.title,
        raw.effective_color(),
    )
    .with_metadata_map(raw.metadata.clone());

    if let Some(ref time) = raw.time {
        event = event.with_time(time);
    }
    if let Some(ref status) = raw.status {
        event = event.with_status(status);
    }

    Ok(event)
}

/// Converts a batch, dropping records whose date does not parse.
///
/// Returns the converted events and the number of dropped records.
pub fn to_events(raw_events: &[RawEvent]) -> (Vec<Event>, usize) {
    let mut dropped = 0;
    let events: Vec<Event> = raw_events
        .iter()
        .filter_map(|raw| match to_event(raw) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!(kind = %raw.source_kind, title = %raw.title, error = %e, "dropping event with invalid date");
                dropped += 1;
                None
            }
        })
        .collect();
    (events, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_event::{HOLIDAY_COLOR, SourceKind};
    use campuscal_core::{DateKey, EventKind};
    use chrono::FixedOffset;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn holiday_conversion() {
        let raw = RawEvent::new(SourceKind::Holiday, "2025-12-25", "Christmas Day");
        let event = to_event(&raw).unwrap();

        assert_eq!(event.date_key(), key("2025-12-25"));
        assert_eq!(event.kind, EventKind::Holiday);
        assert_eq!(event.title, "Christmas Day");
        assert_eq!(event.color, HOLIDAY_COLOR);
        assert!(event.time.is_none());
    }

    #[test]
    fn carries_display_fields_and_metadata() {
        let raw = RawEvent::new(SourceKind::Assignment, "2025-09-01T23:59:00", "Essay")
            .with_time("23:59")
            .with_status("pending")
            .with_metadata("classId", "c-9");
        let event = to_event(&raw).unwrap();

        assert_eq!(event.date_key(), key("2025-09-01"));
        assert_eq!(event.time.as_deref(), Some("23:59"));
        assert_eq!(event.status.as_deref(), Some("pending"));
        assert_eq!(event.metadata["classId"], "c-9");
    }

    #[test]
    fn instants_use_the_given_timezone() {
        let raw = RawEvent::new(SourceKind::GenericEvent, "2025-03-09T16:00:00Z", "Assembly");
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(to_event_in(&raw, &manila).unwrap().date_key(), key("2025-03-10"));
    }

    #[test]
    fn invalid_dates_are_dropped_individually() {
        let raws = vec![
            RawEvent::new(SourceKind::GenericEvent, "2025-09-01", "valid"),
            RawEvent::new(SourceKind::GenericEvent, "not-a-date", "broken"),
        ];
        let (events, dropped) = to_events(&raws);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "valid");
        assert_eq!(dropped, 1);
    }
}
