// File: probe.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;
use colored::*;

use super::{print_success, print_warning, require_connection, truncate_display};
use crate::api::UserSummary;
use crate::cli::TestArgs;
use crate::client::TautulliClient;
use crate::config::{ConfigParameter, ConnectionParameters};
use crate::storage::ConfigStore;

pub async fn test(args: &TestArgs, store: &ConfigStore, config: ConfigParameter) -> Result<()> {
    let params = match (&args.url, &args.api_key) {
        (Some(url), Some(api_key)) => ConnectionParameters::new(url, api_key),
        _ => require_connection(store)?,
    };

    let (ok, message) = TautulliClient::new(config).test_connection(&params).await;
    if ok {
        print_success(&message);
        Ok(())
    } else {
        Err(anyhow::anyhow!(message))
    }
}

pub async fn users(store: &ConfigStore, config: ConfigParameter) -> Result<()> {
    let params = require_connection(store)?;
    let users = TautulliClient::new(config).list_users(&params).await;

    if users.is_empty() {
        print_warning("No users returned by Tautulli");
        return Ok(());
    }

    display_users(&users);
    Ok(())
}

fn display_users(users: &[UserSummary]) {
    println!();
    println!("{:<12} {}", "User ID".bold(), "Name".bold());
    println!("{}", "─".repeat(50).bright_black());
    for user in users {
        println!(
            "{:<12} {}",
            user.display_id(),
            truncate_display(&user.friendly_name(), 37)
        );
    }
    println!();
}
