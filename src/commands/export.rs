// File: export.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use std::path::PathBuf;

use super::print_success;
use crate::cli::ExportArgs;
use crate::config::ConfigParameter;
use crate::export::{export_filename, load_result_set, CsvFormatter, HistoryFormatter};

pub fn execute(args: &ExportArgs, config: ConfigParameter) -> Result<()> {
    let items = load_result_set(&args.input)?;
    let formatter = CsvFormatter::new(config.day_boundary());
    let content = formatter.generate(&items)?;

    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(export_filename(
            config.day_boundary(),
            formatter.file_extension(),
        ))
    });

    std::fs::write(&output, content)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    print_success(&format!(
        "Exported {} rows to {}",
        items.len(),
        output.display()
    ));

    Ok(())
}
