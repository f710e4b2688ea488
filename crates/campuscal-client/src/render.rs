//! Text rendering of the month grid, day lists and source reports.

use std::fmt::Write;

use serde::Serialize;

use campuscal_core::{DateKey, Event, MonthGrid, WEEKDAY_HEADERS};
use campuscal_engine::AggregationReport;

/// Width of one grid column.
const CELL_WIDTH: usize = 6;

/// JSON shape of the `month` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOutput<'a> {
    pub title: String,
    pub grid: &'a MonthGrid,
    pub selected: DateKey,
    pub events: &'a [Event],
}

/// JSON shape of the `day` command.
#[derive(Debug, Serialize)]
pub struct DayOutput<'a> {
    pub date: DateKey,
    pub events: &'a [Event],
}

/// Renders a Sunday-first month grid.
///
/// Today is shown as `(d)`, the selected day as `[d]`, and days with
/// events carry their event count.
pub fn render_month(grid: &MonthGrid) -> String {
    let mut out = String::new();
    let width = CELL_WIDTH * 7;
    let _ = writeln!(out, "{:^width$}", grid.title(), width = width);

    for header in WEEKDAY_HEADERS {
        let _ = write!(out, "{:^width$}", header, width = CELL_WIDTH);
    }
    out.push('\n');

    for week in grid.weeks() {
        let line: String = week
            .iter()
            .map(|cell| match cell {
                None => " ".repeat(CELL_WIDTH),
                Some(cell) => {
                    let (open, close) = if cell.is_selected {
                        ('[', ']')
                    } else if cell.is_today {
                        ('(', ')')
                    } else {
                        (' ', ' ')
                    };
                    let count = if cell.has_events {
                        cell.event_count.to_string()
                    } else {
                        String::new()
                    };
                    format!("{}{:>2}{}{:<2}", open, cell.day, close, count)
                }
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Renders the events of one day.
pub fn render_day(date: &DateKey, events: &[Event]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", date.date().format("%A, %B %-d, %Y"));

    if events.is_empty() {
        out.push_str("  No events scheduled for this date\n");
        return out;
    }

    for event in events {
        let _ = write!(out, "  [{}] {}", event.kind.label(), event.title);
        if let Some(time) = event.time.as_deref().filter(|t| !t.is_empty()) {
            let _ = write!(out, "  {}", time);
        }
        if let Some(status) = event.status.as_deref().filter(|s| !s.is_empty()) {
            let _ = write!(out, "  ({})", status);
        }
        if event.is_synthetic() {
            out.push_str("  *placeholder*");
        }
        out.push('\n');
    }
    out
}

/// Renders the per-source aggregation report as a table.
pub fn render_report(report: &AggregationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<14} {:<14} {:>7} {:>5} {:>7}",
        "SOURCE", "KIND", "FETCHED", "KEPT", "DROPPED"
    );
    for source in report.sources() {
        let _ = writeln!(
            out,
            "{:<14} {:<14} {:>7} {:>5} {:>7}",
            source.name, source.kind.as_str(), source.fetched, source.kept, source.dropped
        );
    }
    let silent: Vec<&str> = report.silent_sources().collect();
    if !silent.is_empty() {
        let _ = writeln!(out, "\nno events from: {}", silent.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use campuscal_core::{CalendarIndex, EventKind, build_month_grid_at};

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn sample_index() -> CalendarIndex {
        [
            Event::new(key("2025-03-12"), EventKind::Holiday, "Holiday", "#FFEB3B"),
            Event::new(key("2025-03-12"), EventKind::Assignment, "Essay", "#FF5722")
                .with_time("23:59")
                .with_status("pending"),
            Event::new(key("2025-03-20"), EventKind::ClassDay, "Class Day", "#4CAF50"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn month_grid_layout() {
        let index = sample_index();
        let grid = build_month_grid_at(
            &index,
            key("2025-03-01").date(),
            &key("2025-03-12"),
            key("2025-03-20"),
        );
        let text = render_month(&grid);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "March 2025");
        assert_eq!(lines[1], " Sun   Mon   Tue   Wed   Thu   Fri   Sat  ");
        // March 1st 2025 is a Saturday
        assert_eq!(lines[2], format!("{}{}", " ".repeat(36), "  1"));
        assert!(text.contains("[12]2"));
        assert!(text.contains("(20)1"));
        assert_eq!(lines.len(), 2 + 6);
    }

    #[test]
    fn day_listing() {
        let index = sample_index();
        let day = key("2025-03-12");
        let text = render_day(&day, index.events_for_day(&day));
        assert_eq!(
            text,
            "Wednesday, March 12, 2025\n  [Holiday] Holiday\n  [Due] Essay  23:59  (pending)\n"
        );
    }

    #[test]
    fn empty_day() {
        let text = render_day(&key("2025-03-13"), &[]);
        assert!(text.ends_with("No events scheduled for this date\n"));
    }

    #[test]
    fn month_json_shape() {
        let index = sample_index();
        let selected = key("2025-03-12");
        let grid = build_month_grid_at(&index, selected.date(), &selected, selected);
        let output = MonthOutput {
            title: grid.title(),
            grid: &grid,
            selected,
            events: index.events_for_day(&selected),
        };

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["title"], "March 2025");
        assert_eq!(json["selected"], "2025-03-12");
        assert_eq!(json["events"].as_array().unwrap().len(), 2);
    }
}
