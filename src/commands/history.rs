// File: history.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::time::Duration;

use super::{
    format_duration, print_error, print_info, print_success, print_warning, require_connection,
    truncate_display,
};
use crate::api::HistoryItem;
use crate::cli::HistoryArgs;
use crate::client::TautulliClient;
use crate::config::{ConfigParameter, DayBoundary};
use crate::export::formatter_for;
use crate::history::{FetchOutcome, HistoryFetcher};
use crate::storage::ConfigStore;

pub async fn execute(args: &HistoryArgs, store: &ConfigStore, config: ConfigParameter) -> Result<()> {
    let params = require_connection(store)?;
    let query = args.to_request().validate(config.max_length())?;
    let format = args.format.to_lowercase();
    anyhow::ensure!(
        matches!(format.as_str(), "table" | "json" | "csv"),
        "Unsupported format: {}",
        args.format
    );

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed_precise}]") {
        spinner.set_style(style);
    }
    spinner.set_message(format!(
        "Fetching up to {} items for user {}",
        query.requested_length, query.user_id
    ));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let fetcher = HistoryFetcher::new(TautulliClient::new(config), config);
    let (outcome, stats) = fetcher.fetch_with_stats(&params, &query).await;
    spinner.finish_and_clear();

    match &outcome {
        FetchOutcome::Empty => {
            print_error("Tautulli did not return any history, see the log for details");
            return Ok(());
        }
        FetchOutcome::Partial(items) => print_warning(&format!(
            "Tautulli stopped answering mid-way, returning {} of {} requested items",
            items.len(),
            query.requested_length
        )),
        FetchOutcome::Complete(items) if items.is_empty() => {
            print_warning("No history found matching the criteria");
            return Ok(());
        }
        FetchOutcome::Complete(_) => {}
    }

    print_info(&format!(
        "{} items from {} API calls in {}",
        outcome.len(),
        stats.total_calls(),
        format_duration(stats.elapsed_ms())
    ));

    let items = outcome.into_items();
    let count = items.len();
    let boundary = config.day_boundary();
    let rendered = match format.as_str() {
        "table" => {
            display_history_table(&items, boundary);
            return Ok(());
        }
        "json" => serde_json::to_string_pretty(&json!({"success": true, "history": &items}))?,
        other => formatter_for(other, boundary)?.generate(&items)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Wrote {} items to {}", count, path.display()));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn display_history_table(items: &[HistoryItem], boundary: DayBoundary) {
    println!();
    println!("{}", "═".repeat(110).bright_black());
    println!("{:^110}", "WATCH HISTORY".bold().bright_white());
    println!("{}", "═".repeat(110).bright_black());

    println!(
        "{:<20} {:<16} {:<44} {:<10} {:<9} {}",
        "Date".bold(),
        "User".bold(),
        "Title".bold(),
        "Type".bold(),
        "Status".bold(),
        "Done".bold()
    );
    println!("{}", "─".repeat(110).bright_black());

    for item in items {
        let date = boundary
            .format_timestamp(item.timestamp(), "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default();
        let title = item.display_title();
        let status = match item.int_field("watched_status") {
            1 => "Finished".green(),
            0 => "Stopped".yellow(),
            _ => "Unknown".bright_black(),
        };

        println!(
            "{:<20} {:<16} {:<44} {:<10} {:<9} {}%",
            date,
            truncate_display(item.str_field("friendly_name"), 16),
            truncate_display(&title, 44),
            item.str_field("media_type"),
            status,
            item.int_field("percent_complete")
        );
    }

    println!("{}", "─".repeat(110).bright_black());
    println!();
}
