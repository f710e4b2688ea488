//! Day command: the events of one day.

use campuscal_core::DateKey;

use crate::commands::{load_index, print_json};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::render::{DayOutput, render_day};

pub async fn run(
    config: &ClientConfig,
    date: Option<DateKey>,
    no_fallback: bool,
    json: bool,
) -> ClientResult<()> {
    let date = date.unwrap_or_else(DateKey::today);
    let index = load_index(config, no_fallback).await;
    let events = index.events_for_day(&date);

    if json {
        return print_json(&DayOutput { date, events });
    }
    print!("{}", render_day(&date, events));
    Ok(())
}
