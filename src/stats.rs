// File: stats.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2022-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    total_calls: u64,
    failed_calls: u64,
    items_received: usize,
    items_returned: usize,
    start_time: u64,
    end_time: u64,
}

impl FetchStats {
    pub fn new() -> FetchStats {
        FetchStats::default()
    }

    pub fn add_call(&mut self, items: usize) {
        self.total_calls += 1;
        self.items_received += items;
    }

    pub fn add_failure(&mut self) {
        self.total_calls += 1;
        self.failed_calls += 1;
    }

    pub fn total_calls(&self) -> u64 {
        self.total_calls
    }

    pub fn failed_calls(&self) -> u64 {
        self.failed_calls
    }

    pub fn items_received(&self) -> usize {
        self.items_received
    }

    pub fn set_items_returned(&mut self, items_returned: usize) {
        self.items_returned = items_returned;
    }

    pub fn items_returned(&self) -> usize {
        self.items_returned
    }

    pub fn mark_start(&mut self) {
        self.start_time = now_millis();
    }

    pub fn mark_end(&mut self) {
        self.end_time = now_millis();
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn end_time(&self) -> u64 {
        self.end_time
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
