// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

pub const API_PATH: &str = "api/v2";
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_OVERFETCH_FACTOR: usize = 4;
pub const DEFAULT_MAX_LENGTH: usize = 10_000;

/// Base URL and API key of a Tautulli server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    base_url: String,
    api_key: String,
}

impl ConnectionParameters {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim().to_string(),
            api_key: api_key.trim().to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, API_PATH)
        } else {
            format!("{}/{}", self.base_url, API_PATH)
        }
    }
}

/// Timezone in which calendar dates are turned into Unix-second boundaries
/// and in which exported timestamps are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    Local,
    Fixed(FixedOffset),
}

impl DayBoundary {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Unix timestamp of 00:00:00 on `date`.
    pub fn midnight(&self, date: NaiveDate) -> i64 {
        let naive = date.and_time(NaiveTime::MIN);
        let resolved = match self {
            Self::Local => chrono::Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp()),
            Self::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.timestamp()),
        };
        // A DST gap can swallow local midnight.
        resolved.unwrap_or_else(|| naive.and_utc().timestamp())
    }

    /// Unix timestamp of 23:59:59 on `date`.
    pub fn end_of_day(&self, date: NaiveDate) -> i64 {
        match date.succ_opt() {
            Some(next) => self.midnight(next) - 1,
            None => self.midnight(date) + 86_399,
        }
    }

    pub fn format_timestamp(&self, timestamp: i64, fmt: &str) -> Option<String> {
        let utc: DateTime<Utc> = DateTime::from_timestamp(timestamp, 0)?;
        let rendered = match self {
            Self::Local => utc.with_timezone(&chrono::Local).format(fmt).to_string(),
            Self::Fixed(offset) => utc.with_timezone(offset).format(fmt).to_string(),
        };
        Some(rendered)
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::Local => chrono::Local::now().naive_local(),
            Self::Fixed(offset) => Utc::now().with_timezone(offset).naive_local(),
        }
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::Local
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigParameter {
    probe_timeout: u64,
    history_timeout: u64,
    page_size: usize,
    overfetch_factor: usize,
    max_length: usize,
    rate_limit: u32,
    day_boundary: DayBoundary,
}

impl ConfigParameter {
    pub fn new() -> Self {
        Self {
            probe_timeout: 10,
            history_timeout: 30,
            page_size: DEFAULT_PAGE_SIZE,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
            max_length: DEFAULT_MAX_LENGTH,
            rate_limit: 10,
            day_boundary: DayBoundary::Local,
        }
    }

    pub fn set_probe_timeout(&mut self, probe_timeout: u64) {
        self.probe_timeout = probe_timeout;
    }

    pub fn probe_timeout(&self) -> u64 {
        self.probe_timeout
    }

    pub fn set_history_timeout(&mut self, history_timeout: u64) {
        self.history_timeout = history_timeout;
    }

    pub fn history_timeout(&self) -> u64 {
        self.history_timeout
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_overfetch_factor(&mut self, overfetch_factor: usize) {
        self.overfetch_factor = overfetch_factor.max(1);
    }

    pub fn overfetch_factor(&self) -> usize {
        self.overfetch_factor
    }

    pub fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length;
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn set_rate_limit(&mut self, rate_limit: u32) {
        self.rate_limit = rate_limit;
    }

    /// Outbound API calls per second, 0 disables pacing.
    pub fn rate_limit(&self) -> u32 {
        self.rate_limit
    }

    pub fn set_day_boundary(&mut self, day_boundary: DayBoundary) {
        self.day_boundary = day_boundary;
    }

    pub fn day_boundary(&self) -> DayBoundary {
        self.day_boundary
    }
}

impl Default for ConfigParameter {
    fn default() -> Self {
        Self::new()
    }
}
