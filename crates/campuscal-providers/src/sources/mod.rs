//! Concrete source adapters.
//!
//! - [`HolidayAdapter`] - public holidays for one country and year
//! - [`ClassDayAdapter`] - class days of the active academic term
//! - [`AssignmentAdapter`] - assignment and quiz due dates
//! - [`GenericEventAdapter`] - school events

mod assignment;
mod class_day;
mod generic_event;
mod holiday;

pub use assignment::AssignmentAdapter;
pub use class_day::{ActiveTerm, ClassDayAdapter};
pub use generic_event::GenericEventAdapter;
pub use holiday::HolidayAdapter;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::raw_event::RawEvent;

/// Decodes each record independently and maps it into a [`RawEvent`].
///
/// Records that fail to decode, or that `map` rejects, are dropped and
/// logged; the rest of the batch is kept.
pub(crate) fn decode_records<T, F>(source: &str, records: Vec<Value>, map: F) -> Vec<RawEvent>
where
    T: DeserializeOwned,
    F: Fn(T) -> Option<RawEvent>,
{
    let total = records.len();
    let events: Vec<RawEvent> = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| match serde_json::from_value::<T>(record) {
            Ok(decoded) => {
                let event = map(decoded);
                if event.is_none() {
                    debug!(source = %source, position, "dropping record without a usable date");
                }
                event
            }
            Err(e) => {
                debug!(source = %source, position, error = %e, "dropping malformed record");
                None
            }
        })
        .collect();

    if events.len() < total {
        debug!(source = %source, kept = events.len(), dropped = total - events.len(), "decoded records");
    }
    events
}

/// Returns the trimmed string if it is not blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
