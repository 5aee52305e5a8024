// File: client.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use log::{debug, error, warn};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{
    Envelope, HistoryItem, HistoryPayload, UserSummary, CMD_HISTORY, CMD_SERVER_INFO,
    CMD_USER_NAMES,
};
use crate::config::{ConfigParameter, ConnectionParameters};
use crate::error::FetchError;
use crate::history::{HistorySource, PageRequest};

/// Thin async client for the Tautulli API v2 endpoint.
#[derive(Debug, Clone)]
pub struct TautulliClient {
    config: ConfigParameter,
    rate_limiter: Option<Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    client: reqwest::Client,
}

impl TautulliClient {
    pub fn new(config: ConfigParameter) -> Self {
        let rate_limiter = NonZeroU32::new(config.rate_limit())
            .map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))));
        TautulliClient {
            config,
            rate_limiter,
            client: reqwest::Client::new(),
        }
    }

    async fn call(
        &self,
        params: &ConnectionParameters,
        cmd: &str,
        extra: &[(&str, String)],
        timeout: u64,
    ) -> Result<Envelope, FetchError> {
        if let Some(rate_limiter) = &self.rate_limiter {
            rate_limiter.until_ready().await;
        }

        let mut query: Vec<(&str, String)> = vec![
            ("apikey", params.api_key().to_string()),
            ("cmd", cmd.to_string()),
        ];
        query.extend(extra.iter().cloned());

        debug!("GET {} cmd={}", params.endpoint(), cmd);
        let response = self
            .client
            .get(params.endpoint())
            .query(&query)
            .timeout(Duration::from_secs(timeout))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        serde_json::from_str::<Envelope>(&body)
            .map_err(|e| FetchError::Malformed(format!("HTTP {}: {}", status, e)))
    }

    /// Asks the server for its identity to verify URL and API key.
    pub async fn test_connection(&self, params: &ConnectionParameters) -> (bool, String) {
        let outcome = match self
            .call(params, CMD_SERVER_INFO, &[], self.config.probe_timeout())
            .await
        {
            Ok(envelope) => envelope.into_payload::<serde_json::Value>().map(|_| ()),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => (true, "Connection successful!".to_string()),
            Err(FetchError::Upstream(msg)) => (false, format!("API returned error: {}", msg)),
            Err(FetchError::Transport(e)) => (false, format!("Connection failed: {}", e)),
            Err(e) => (false, format!("Error: {}", e)),
        }
    }

    /// Lists the users known to the server, empty on any failure.
    pub async fn list_users(&self, params: &ConnectionParameters) -> Vec<UserSummary> {
        let result = match self
            .call(params, CMD_USER_NAMES, &[], self.config.probe_timeout())
            .await
        {
            Ok(envelope) => envelope.into_payload::<Vec<UserSummary>>(),
            Err(e) => Err(e),
        };

        match result {
            Ok(users) => users.unwrap_or_default(),
            Err(e) => {
                error!("Error getting users: {}", e);
                Vec::new()
            }
        }
    }
}

impl HistorySource for TautulliClient {
    async fn history_page(
        &self,
        params: &ConnectionParameters,
        request: &PageRequest<'_>,
    ) -> Result<Vec<HistoryItem>, FetchError> {
        let mut extra = vec![("user_id", request.user_id.to_string())];
        if let Some(start) = request.start {
            extra.push(("start", start.to_string()));
        }
        extra.push(("length", request.length.to_string()));
        if let Some(media_type) = request.media_type {
            extra.push(("media_type", media_type.to_string()));
        }

        let envelope = self
            .call(params, CMD_HISTORY, &extra, self.config.history_timeout())
            .await?;

        match envelope.into_payload::<HistoryPayload>()? {
            Some(payload) => {
                debug!(
                    "History page: total={:?} filtered={:?}",
                    payload.records_total, payload.records_filtered
                );
                Ok(payload.into_items())
            }
            None => {
                warn!("History response carried no data");
                Ok(Vec::new())
            }
        }
    }
}
