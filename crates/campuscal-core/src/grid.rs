//! Month view builder.
//!
//! A [`MonthGrid`] is a Sunday-first sequence of cells for one calendar
//! month. Leading cells before the 1st are `None` so weekday columns line up;
//! there is no trailing padding unless a caller asks for it with
//! [`MonthGrid::padded_to`].

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::index::CalendarIndex;
use crate::time::DateKey;

/// Cell count of a fixed six-week grid.
pub const FIXED_GRID_CELLS: usize = 42;

/// Column headers, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One day of the month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: DateKey,
    /// Day of month, 1-based.
    pub day: u32,
    pub has_events: bool,
    pub event_count: usize,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Render-ready cells for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    cells: Vec<Option<DayCell>>,
}

impl MonthGrid {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Title such as `March 2025`.
    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    /// All cells, padding included.
    pub fn cells(&self) -> &[Option<DayCell>] {
        &self.cells
    }

    /// Number of `None` cells before the 1st.
    pub fn leading_padding(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }

    /// Iterates only the real day cells.
    pub fn day_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.cells.iter().flatten()
    }

    /// Splits the cells into rows of seven. The last row may be shorter.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<DayCell>]> {
        self.cells.chunks(7)
    }

    /// Pads trailing cells with `None` up to `len` cells.
    pub fn padded_to(mut self, len: usize) -> Self {
        if self.cells.len() < len {
            self.cells.resize(len, None);
        }
        self
    }
}

/// Builds the grid of the month containing `reference`, marking the current day.
pub fn build_month_grid(
    index: &CalendarIndex,
    reference: NaiveDate,
    selected: &DateKey,
) -> MonthGrid {
    build_month_grid_at(index, reference, selected, DateKey::today())
}

/// Same as [`build_month_grid`] with an explicit "today".
pub fn build_month_grid_at(
    index: &CalendarIndex,
    reference: NaiveDate,
    selected: &DateKey,
    today: DateKey,
) -> MonthGrid {
    let first = reference.with_day(1).unwrap_or(reference);
    let days = days_in_month(first.year(), first.month()) as usize;
    let offset = first.weekday().num_days_from_sunday() as usize;

    let mut cells = Vec::with_capacity(offset + days);
    cells.resize(offset, None);
    cells.extend(first.iter_days().take(days).map(|date| {
        let key = DateKey::new(date);
        let event_count = index.events_for_day(&key).len();
        Some(DayCell {
            date: key,
            day: date.day(),
            has_events: index.contains(&key),
            event_count,
            is_today: key == today,
            is_selected: key == *selected,
        })
    }));

    MonthGrid {
        year: first.year(),
        month: first.month(),
        cells,
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Moves `date` by `delta` months, clamping the day to the target month.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}
