// File: settings.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use colored::*;

use super::{print_info, print_success, print_warning};
use crate::cli::{ConfigAction, ConfigArgs};
use crate::client::TautulliClient;
use crate::config::ConfigParameter;
use crate::storage::ConfigStore;

pub async fn execute(args: &ConfigArgs, store: &ConfigStore, config: ConfigParameter) -> Result<()> {
    match &args.action {
        ConfigAction::Set {
            url,
            api_key,
            skip_test,
        } => set(store, config, url, api_key, *skip_test).await,
        ConfigAction::Show => show(store),
    }
}

async fn set(
    store: &ConfigStore,
    config: ConfigParameter,
    url: &str,
    api_key: &str,
    skip_test: bool,
) -> Result<()> {
    let saved = store.save(url, api_key)?;
    print_success("Configuration saved successfully!");

    if skip_test {
        return Ok(());
    }

    match saved.connection() {
        Some(params) => {
            let (ok, message) = TautulliClient::new(config).test_connection(&params).await;
            if ok {
                print_success(&message);
            } else {
                print_warning(&message);
            }
        }
        None => print_warning("URL or API key is empty, connection not tested"),
    }

    Ok(())
}

fn show(store: &ConfigStore) -> Result<()> {
    let current = store.get_or_create()?;

    print_info(&format!("Configuration store: {}", store.path().display()));
    println!(
        "{:<12} {}",
        "URL:".bold(),
        current.tautulli_url.as_deref().unwrap_or("(not set)")
    );
    let key = current.masked_api_key();
    println!(
        "{:<12} {}",
        "API key:".bold(),
        if key.is_empty() { "(not set)" } else { key.as_str() }
    );
    println!(
        "{:<12} {}",
        "Updated:".bold(),
        current.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if !current.is_configured() {
        print_warning("Please configure Tautulli settings first.");
    }

    Ok(())
}
