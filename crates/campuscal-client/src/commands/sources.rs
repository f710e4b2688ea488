//! Sources command: fetch every source and report what it contributed.

use campuscal_engine::aggregate_with_report;

use crate::adapters::build_adapters;
use crate::commands::print_json;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::render::render_report;

pub async fn run(config: &ClientConfig, json: bool) -> ClientResult<()> {
    let adapters = build_adapters(config);
    let (index, report) = aggregate_with_report(&adapters).await;

    if json {
        return print_json(&report);
    }
    print!("{}", render_report(&report));
    println!(
        "\n{} events on {} days",
        index.event_count(),
        index.date_count()
    );
    Ok(())
}
