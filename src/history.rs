// File: history.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Retrieval and filtering of remote watch history.
//!
//! The upstream API caps a single response at roughly a thousand rows and has
//! no date filter. Requests above the page size are split into offset based
//! pages; date ranges are applied locally once the rows are in. When a date
//! range is combined with a small request, a single call over-fetches
//! (`overfetch_factor` times the requested count, capped at one page) so that
//! enough rows survive the local filter.
//!
//! Known limitation: the over-fetch is a heuristic. If fewer than one in
//! `overfetch_factor` upstream rows fall inside the range, fewer rows than
//! requested come back even though more exist further back in history.
//!
//! Upstream failures never reach the caller. They are logged and turn into
//! [`FetchOutcome::Empty`] or [`FetchOutcome::Partial`].

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::api::HistoryItem;
use crate::config::{ConfigParameter, ConnectionParameters, DayBoundary};
use crate::error::FetchError;
use crate::stats::FetchStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub user_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub media_type: Option<String>,
    pub requested_length: usize,
}

impl HistoryQuery {
    pub fn new(user_id: &str, requested_length: usize) -> Self {
        Self {
            user_id: user_id.to_string(),
            start_date: None,
            end_date: None,
            media_type: None,
            requested_length,
        }
    }

    pub fn with_dates(mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    pub fn with_media_type(mut self, media_type: Option<&str>) -> Self {
        self.media_type = media_type.map(str::to_string);
        self
    }

    pub fn has_date_filter(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref().filter(|m| !m.is_empty())
    }
}

/// Parameters of a single `get_history` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub user_id: &'a str,
    /// Offset into the history, only sent for paginated fetches.
    pub start: Option<usize>,
    pub length: usize,
    pub media_type: Option<&'a str>,
}

/// Anything that can serve one page of history.
#[allow(async_fn_in_trait)]
pub trait HistorySource {
    async fn history_page(
        &self,
        params: &ConnectionParameters,
        request: &PageRequest<'_>,
    ) -> Result<Vec<HistoryItem>, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    Direct,
    Paginated,
}

impl FetchStrategy {
    pub fn for_length(requested_length: usize, page_size: usize) -> Self {
        if requested_length > page_size {
            FetchStrategy::Paginated
        } else {
            FetchStrategy::Direct
        }
    }
}

/// Inclusive Unix-second window derived from calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    start: Option<i64>,
    end: Option<i64>,
}

impl DateRange {
    pub fn from_dates(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        boundary: DayBoundary,
    ) -> Self {
        Self {
            start: start_date.map(|d| boundary.midnight(d)),
            end: end_date.map(|d| boundary.end_of_day(d)),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start.map_or(true, |s| timestamp >= s) && self.end.map_or(true, |e| timestamp <= e)
    }

    /// Keeps the items inside the window, preserving order.
    pub fn apply(&self, items: Vec<HistoryItem>) -> Vec<HistoryItem> {
        if self.is_unbounded() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| self.contains(item.timestamp()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Every remote call succeeded.
    Complete(Vec<HistoryItem>),
    /// A page failed after earlier pages came back; holds what was salvaged.
    Partial(Vec<HistoryItem>),
    /// The first remote call failed.
    Empty,
}

impl FetchOutcome {
    pub fn items(&self) -> &[HistoryItem] {
        match self {
            FetchOutcome::Complete(items) | FetchOutcome::Partial(items) => items,
            FetchOutcome::Empty => &[],
        }
    }

    pub fn into_items(self) -> Vec<HistoryItem> {
        match self {
            FetchOutcome::Complete(items) | FetchOutcome::Partial(items) => items,
            FetchOutcome::Empty => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, FetchOutcome::Complete(_))
    }
}

struct Collected {
    items: Vec<HistoryItem>,
    failed: bool,
}

pub struct HistoryFetcher<S> {
    source: S,
    config: ConfigParameter,
}

impl<S: HistorySource> HistoryFetcher<S> {
    pub fn new(source: S, config: ConfigParameter) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn strategy(&self, query: &HistoryQuery) -> FetchStrategy {
        FetchStrategy::for_length(query.requested_length, self.config.page_size())
    }

    /// Row count asked for by the single call of the direct strategy.
    pub fn direct_length(&self, query: &HistoryQuery) -> usize {
        if query.has_date_filter() {
            query
                .requested_length
                .saturating_mul(self.config.overfetch_factor())
                .min(self.config.page_size())
        } else {
            query.requested_length
        }
    }

    pub async fn fetch(&self, params: &ConnectionParameters, query: &HistoryQuery) -> FetchOutcome {
        self.fetch_with_stats(params, query).await.0
    }

    pub async fn fetch_with_stats(
        &self,
        params: &ConnectionParameters,
        query: &HistoryQuery,
    ) -> (FetchOutcome, FetchStats) {
        let mut stats = FetchStats::new();
        stats.mark_start();

        if query.requested_length == 0 {
            stats.mark_end();
            return (FetchOutcome::Complete(Vec::new()), stats);
        }

        let strategy = self.strategy(query);
        info!(
            "Fetching up to {} history items for user {} ({:?})",
            query.requested_length, query.user_id, strategy
        );

        let collected = match strategy {
            FetchStrategy::Direct => self.fetch_direct(params, query, &mut stats).await,
            FetchStrategy::Paginated => self.fetch_paginated(params, query, &mut stats).await,
        };

        let outcome = if collected.failed && collected.items.is_empty() {
            FetchOutcome::Empty
        } else {
            let range = DateRange::from_dates(
                query.start_date,
                query.end_date,
                self.config.day_boundary(),
            );
            let mut items = range.apply(collected.items);
            items.truncate(query.requested_length);
            if collected.failed {
                FetchOutcome::Partial(items)
            } else {
                FetchOutcome::Complete(items)
            }
        };

        stats.set_items_returned(outcome.len());
        stats.mark_end();
        debug!(
            "History fetch done: {} calls, {} received, {} returned in {} ms",
            stats.total_calls(),
            stats.items_received(),
            stats.items_returned(),
            stats.elapsed_ms()
        );
        (outcome, stats)
    }

    async fn fetch_direct(
        &self,
        params: &ConnectionParameters,
        query: &HistoryQuery,
        stats: &mut FetchStats,
    ) -> Collected {
        let request = PageRequest {
            user_id: &query.user_id,
            start: None,
            length: self.direct_length(query),
            media_type: query.media_type(),
        };

        match self.source.history_page(params, &request).await {
            Ok(items) => {
                stats.add_call(items.len());
                Collected {
                    items,
                    failed: false,
                }
            }
            Err(e) => {
                stats.add_failure();
                warn!("Error getting history: {}", e);
                Collected {
                    items: Vec::new(),
                    failed: true,
                }
            }
        }
    }

    async fn fetch_paginated(
        &self,
        params: &ConnectionParameters,
        query: &HistoryQuery,
        stats: &mut FetchStats,
    ) -> Collected {
        let page_size = self.config.page_size();
        let wanted = query.requested_length;
        let mut items: Vec<HistoryItem> = Vec::new();
        let mut offset = 0usize;
        let mut failed = false;

        while items.len() < wanted {
            let to_fetch = page_size.min(wanted - items.len());
            let request = PageRequest {
                user_id: &query.user_id,
                start: Some(offset),
                length: to_fetch,
                media_type: query.media_type(),
            };

            let mut page = match self.source.history_page(params, &request).await {
                Ok(page) => page,
                Err(e) => {
                    stats.add_failure();
                    warn!(
                        "History page at offset {} failed, keeping {} items: {}",
                        offset,
                        items.len(),
                        e
                    );
                    failed = true;
                    break;
                }
            };

            let received = page.len();
            stats.add_call(received);
            debug!("Page at offset {}: {} of {} items", offset, received, to_fetch);

            if received == 0 {
                break;
            }

            page.truncate(wanted - items.len());
            items.extend(page);
            offset += received;

            if received < to_fetch {
                break;
            }
        }

        Collected { items, failed }
    }
}
