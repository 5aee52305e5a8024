// File: export.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::api::HistoryItem;
use crate::config::DayBoundary;

pub const CSV_HEADERS: [&str; 8] = [
    "Date",
    "User",
    "Title",
    "Media Type",
    "Duration (min)",
    "Percent Complete",
    "Status",
    "IP Address",
];

pub trait HistoryFormatter {
    fn generate(&self, items: &[HistoryItem]) -> Result<String>;
    fn file_extension(&self) -> &'static str;
    fn content_type(&self) -> &'static str;
}

pub struct CsvFormatter {
    boundary: DayBoundary,
}

impl CsvFormatter {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }

    fn escape_csv(&self, field: &str) -> String {
        if field.contains(',')
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r')
        {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn row(&self, item: &HistoryItem) -> [String; 8] {
        let date = if item.has_value("date") {
            self.boundary
                .format_timestamp(item.timestamp(), "%Y-%m-%d %H:%M:%S")
                .unwrap_or_default()
        } else {
            String::new()
        };

        let duration = if item.has_value("duration") {
            format!("{:.1}", item.int_field("duration") as f64 / 60.0)
        } else {
            "0".to_string()
        };

        let percent = match item.get("percent_complete") {
            None | Some(serde_json::Value::Null) => "0".to_string(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let status = match item.int_field("watched_status") {
            1 => "Finished",
            0 => "Stopped",
            _ => "Unknown",
        };

        [
            date,
            item.str_field("friendly_name").to_string(),
            item.display_title(),
            item.str_field("media_type").to_string(),
            duration,
            format!("{}%", percent),
            status.to_string(),
            item.str_field("ip_address").to_string(),
        ]
    }
}

impl HistoryFormatter for CsvFormatter {
    fn generate(&self, items: &[HistoryItem]) -> Result<String> {
        if items.is_empty() {
            anyhow::bail!("No data to export");
        }

        let mut csv = String::new();
        csv.push_str(&CSV_HEADERS.join(","));
        csv.push('\n');

        for item in items {
            let fields: Vec<String> = self
                .row(item)
                .iter()
                .map(|field| self.escape_csv(field))
                .collect();
            csv.push_str(&fields.join(","));
            csv.push('\n');
        }

        Ok(csv)
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn content_type(&self) -> &'static str {
        "text/csv"
    }
}

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl HistoryFormatter for JsonFormatter {
    fn generate(&self, items: &[HistoryItem]) -> Result<String> {
        serde_json::to_string_pretty(items)
            .map_err(|e| anyhow::anyhow!("Failed to serialize history to JSON: {}", e))
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

pub fn formatter_for(format: &str, boundary: DayBoundary) -> Result<Box<dyn HistoryFormatter>> {
    match format.to_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvFormatter::new(boundary))),
        "json" => Ok(Box::new(JsonFormatter::new())),
        _ => Err(anyhow::anyhow!("Unsupported export format: {}", format)),
    }
}

pub fn export_filename(boundary: DayBoundary, extension: &str) -> String {
    format!(
        "tautulli_history_{}.{}",
        boundary.now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SavedResultSet {
    Wrapped { history: Vec<HistoryItem> },
    Bare(Vec<HistoryItem>),
}

/// Reads a previously saved result set, either a bare JSON array or the
/// `{"history": [...]}` object a history listing produces.
pub fn parse_result_set(content: &str) -> Result<Vec<HistoryItem>> {
    let parsed: SavedResultSet =
        serde_json::from_str(content).context("History data is not a JSON array or object")?;
    Ok(match parsed {
        SavedResultSet::Wrapped { history } => history,
        SavedResultSet::Bare(items) => items,
    })
}

pub fn load_result_set<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryItem>> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    parse_result_set(&content)
}
