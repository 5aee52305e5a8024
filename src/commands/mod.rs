// File: mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use colored::*;

use crate::cli::{ConfigArgs, ExportArgs, HistoryArgs, TestArgs};
use crate::config::{ConfigParameter, ConnectionParameters};
use crate::storage::ConfigStore;

pub mod export;
pub mod history;
pub mod probe;
pub mod settings;

pub async fn handle_config_command(
    args: &ConfigArgs,
    store: &ConfigStore,
    config: ConfigParameter,
) -> Result<()> {
    settings::execute(args, store, config).await
}

pub async fn handle_test_command(
    args: &TestArgs,
    store: &ConfigStore,
    config: ConfigParameter,
) -> Result<()> {
    probe::test(args, store, config).await
}

pub async fn handle_users_command(store: &ConfigStore, config: ConfigParameter) -> Result<()> {
    probe::users(store, config).await
}

pub async fn handle_history_command(
    args: &HistoryArgs,
    store: &ConfigStore,
    config: ConfigParameter,
) -> Result<()> {
    history::execute(args, store, config).await
}

pub fn handle_export_command(args: &ExportArgs, config: ConfigParameter) -> Result<()> {
    export::execute(args, config)
}

fn require_connection(store: &ConfigStore) -> Result<ConnectionParameters> {
    store.connection()?.ok_or_else(|| {
        anyhow::anyhow!("Tautulli not configured. Run `config set --url <URL> --api-key <KEY>` first.")
    })
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

fn format_duration(ms: u64) -> String {
    if ms >= 60000 {
        format!("{}m {:.1}s", ms / 60000, (ms % 60000) as f64 / 1000.0)
    } else if ms >= 1000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}

fn truncate_display(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let cut: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}
