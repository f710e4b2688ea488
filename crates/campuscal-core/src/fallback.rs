//! Placeholder events for an empty calendar.
//!
//! When every source failed (or legitimately returned nothing) the calendar
//! views still render a small, fixed agenda anchored on today. Every
//! placeholder carries `metadata.synthetic = true` so it can never be
//! mistaken for a real record.

use tracing::debug;

use crate::event::{Event, EventKind, SYNTHETIC_KEY};
use crate::index::CalendarIndex;
use crate::time::DateKey;

struct Placeholder {
    offset_days: i64,
    title: &'static str,
    category: &'static str,
    color: &'static str,
    time: &'static str,
    status: &'static str,
}

const PLACEHOLDERS: [Placeholder; 4] = [
    Placeholder {
        offset_days: 0,
        title: "Faculty Meeting",
        category: "meeting",
        color: "#4CAF50",
        time: "9:00 AM",
        status: "Scheduled",
    },
    Placeholder {
        offset_days: 1,
        title: "Class Preparation",
        category: "class",
        color: "#2196F3",
        time: "2:00 PM",
        status: "Pending",
    },
    Placeholder {
        offset_days: 2,
        title: "Student Consultation",
        category: "consultation",
        color: "#FF9800",
        time: "10:00 AM",
        status: "Confirmed",
    },
    Placeholder {
        offset_days: 7,
        title: "Department Review",
        category: "review",
        color: "#9C27B0",
        time: "3:00 PM",
        status: "Scheduled",
    },
];

/// Returns the placeholder agenda anchored on `today`.
pub fn synthetic_events(today: DateKey) -> Vec<Event> {
    PLACEHOLDERS
        .iter()
        .filter_map(|p| {
            let day = today.add_days(p.offset_days)?;
            Some(
                Event::new(day, EventKind::GenericEvent, p.title, p.color)
                    .with_time(p.time)
                    .with_status(p.status)
                    .with_metadata("type", p.category)
                    .with_metadata(SYNTHETIC_KEY, true),
            )
        })
        .collect()
}

/// Substitutes the placeholder agenda for an empty index.
///
/// A non-empty index is returned unchanged.
pub fn apply_fallback(index: CalendarIndex) -> CalendarIndex {
    apply_fallback_at(index, DateKey::today())
}

/// Same as [`apply_fallback`] with an explicit anchor day.
pub fn apply_fallback_at(index: CalendarIndex, today: DateKey) -> CalendarIndex {
    if !index.is_empty() {
        return index;
    }
    debug!(anchor = %today, "calendar index is empty, using placeholder events");
    synthetic_events(today).into_iter().collect()
}
