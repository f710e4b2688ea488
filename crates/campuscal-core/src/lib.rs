//! Core types: date keys, events, calendar index, month grid, fallback.
//!
//! Everything in this crate is pure: no I/O, no async. Fetching and
//! aggregation live in `campuscal-providers` and `campuscal-engine`.

pub mod event;
pub mod fallback;
pub mod grid;
pub mod index;
pub mod time;
pub mod tracing;

pub use event::{Event, EventKind, Metadata, SYNTHETIC_KEY};
pub use fallback::{apply_fallback, apply_fallback_at, synthetic_events};
pub use grid::{
    DayCell, FIXED_GRID_CELLS, MonthGrid, WEEKDAY_HEADERS, build_month_grid, build_month_grid_at,
    days_in_month, shift_month,
};
pub use index::{CalendarIndex, CalendarIndexBuilder, events_for_day};
pub use time::{DATE_KEY_FORMAT, DateKey, DateLike, InvalidDateError, normalize, normalize_in};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
