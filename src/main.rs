// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2022-2025
// - Volker Schwaberow <volker@schwaberow.de>

use clap::Parser;
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;

use tautulli_export::cli::{Cli, Commands};
use tautulli_export::commands::{self, print_error};
use tautulli_export::storage::ConfigStore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Warn);
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config_parameter();

    if let Commands::Export(args) = &cli.command {
        return commands::handle_export_command(args, config);
    }

    let store = ConfigStore::open(cli.data_dir.clone())?;
    debug!("Using configuration store at {}", store.path().display());

    match &cli.command {
        Commands::Config(args) => commands::handle_config_command(args, &store, config).await,
        Commands::Test(args) => commands::handle_test_command(args, &store, config).await,
        Commands::Users => commands::handle_users_command(&store, config).await,
        Commands::History(args) => commands::handle_history_command(args, &store, config).await,
        Commands::Export(args) => commands::handle_export_command(args, config),
    }
}
