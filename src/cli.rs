// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ConfigParameter, DayBoundary};
use crate::request::HistoryRequest;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(long = "log-level", default_value = "warn", global = true)]
    pub log_level: String,

    #[arg(long = "no-color", help = "Disable colored output", global = true)]
    pub no_color: bool,

    #[arg(
        long = "utc",
        help = "Interpret dates and render timestamps in UTC instead of local time",
        global = true
    )]
    pub utc: bool,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 30,
        help = "History request timeout in seconds",
        global = true
    )]
    pub timeout: u64,

    #[arg(
        short = 'r',
        long = "rate-limit",
        default_value_t = 10,
        help = "Maximum API calls per second (0 disables pacing)",
        global = true
    )]
    pub rate_limit: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show or change the stored Tautulli connection
    Config(ConfigArgs),
    /// Check that the Tautulli server is reachable
    Test(TestArgs),
    /// List the users known to the Tautulli server
    Users,
    /// Fetch watch history for a user
    History(HistoryArgs),
    /// Convert a saved history result set to CSV
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    Set {
        #[arg(long = "url", help = "Tautulli base URL, e.g. http://localhost:8181")]
        url: String,

        #[arg(long = "api-key")]
        api_key: String,

        #[arg(long = "skip-test", help = "Do not test the connection after saving")]
        skip_test: bool,
    },
    Show,
}

#[derive(Args, Debug)]
pub struct TestArgs {
    #[arg(long = "url", requires = "api_key")]
    pub url: Option<String>,

    #[arg(long = "api-key", requires = "url")]
    pub api_key: Option<String>,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[arg(short = 'u', long = "user-id")]
    pub user_id: Option<String>,

    #[arg(long = "start-date", help = "Start date (YYYY-MM-DD)")]
    pub start_date: Option<String>,

    #[arg(long = "end-date", help = "End date (YYYY-MM-DD)")]
    pub end_date: Option<String>,

    #[arg(
        short = 'm',
        long = "media-type",
        help = "movie, episode, track, live or photo"
    )]
    pub media_type: Option<String>,

    #[arg(short = 'l', long = "length", default_value_t = 25)]
    pub length: usize,

    #[arg(long = "format", default_value = "table", help = "table, json or csv")]
    pub format: String,

    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(short = 'i', long = "input", help = "JSON file written by `history --format json`")]
    pub input: PathBuf,

    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn config_parameter(&self) -> ConfigParameter {
        let mut config = ConfigParameter::new();
        config.set_history_timeout(self.timeout);
        config.set_rate_limit(self.rate_limit);
        if self.utc {
            config.set_day_boundary(DayBoundary::utc());
        }
        config
    }
}

impl HistoryArgs {
    pub fn to_request(&self) -> HistoryRequest {
        HistoryRequest {
            user_id: self.user_id.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            media_type: self.media_type.clone(),
            length: Some(self.length),
        }
    }
}
