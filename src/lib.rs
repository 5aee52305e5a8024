// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::new_without_default)]
#![allow(clippy::bool_assert_comparison)]

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod request;
pub mod stats;
pub mod storage;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_imports() {
        let _ = config::ConfigParameter::default();
        let _ = stats::FetchStats::new();
        let _ = client::TautulliClient::new(config::ConfigParameter::new());
        let _ = history::HistoryQuery::new("1", 25);
        let _ = request::HistoryRequest::default();
        let _ = export::JsonFormatter::new();
    }
}
