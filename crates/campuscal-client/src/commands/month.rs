//! Month command: grid plus the selected day's events.

use chrono::{Datelike, NaiveDate};

use campuscal_core::{DateKey, FIXED_GRID_CELLS, build_month_grid};

use crate::commands::{load_index, print_json};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::render::{MonthOutput, render_day, render_month};

/// Shows the month containing `month` (or the selected day, or today).
pub async fn run(
    config: &ClientConfig,
    month: Option<NaiveDate>,
    select: Option<DateKey>,
    no_fallback: bool,
    json: bool,
) -> ClientResult<()> {
    let today = DateKey::today();
    let (reference, selected) = resolve_view(month, select, today);

    let index = load_index(config, no_fallback).await;
    let mut grid = build_month_grid(&index, reference, &selected);
    if config.display.fixed_height {
        grid = grid.padded_to(FIXED_GRID_CELLS);
    }
    let events = index.events_for_day(&selected);

    if json {
        return print_json(&MonthOutput {
            title: grid.title(),
            grid: &grid,
            selected,
            events,
        });
    }

    print!("{}", render_month(&grid));
    println!();
    print!("{}", render_day(&selected, events));
    Ok(())
}

/// Picks the month to show and the day to select.
///
/// An explicit selection wins. Otherwise today is selected when it falls in
/// the shown month, and the first of the month when it does not.
fn resolve_view(
    month: Option<NaiveDate>,
    select: Option<DateKey>,
    today: DateKey,
) -> (NaiveDate, DateKey) {
    let reference = month
        .or_else(|| select.map(|s| s.date()))
        .unwrap_or_else(|| today.date());

    let selected = select.unwrap_or_else(|| {
        let t = today.date();
        if t.year() == reference.year() && t.month() == reference.month() {
            today
        } else {
            DateKey::from_ymd(reference.year(), reference.month(), 1).unwrap_or(today)
        }
    });
    (reference, selected)
}
