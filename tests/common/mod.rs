// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::HashMap;
use tautulli_export::config::{ConfigParameter, ConnectionParameters, DayBoundary};
use wiremock::{MockServer, ResponseTemplate};

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn create_mock_response(status: u16, body: &str, headers: HashMap<&str, &str>) -> ResponseTemplate {
    let mut response = ResponseTemplate::new(status).set_body_string(body);
    for (key, value) in headers {
        response = response.append_header(key, value);
    }
    response
}

pub fn create_json_response(data: Value) -> ResponseTemplate {
    let mut headers = HashMap::new();
    headers.insert("content-type", "application/json");
    create_mock_response(200, &data.to_string(), headers)
}

pub fn success_envelope(data: Value) -> ResponseTemplate {
    create_json_response(json!({
        "response": {"result": "success", "message": null, "data": data}
    }))
}

pub fn error_envelope(message: &str) -> ResponseTemplate {
    create_json_response(json!({
        "response": {"result": "error", "message": message, "data": {}}
    }))
}

/// `count` history rows with ids starting at `first_id`, newest first.
pub fn history_rows(first_id: usize, count: usize) -> Vec<Value> {
    (first_id..first_id + count)
        .map(|id| {
            json!({
                "id": id,
                "date": 1_700_000_000 - id as i64 * 60,
                "friendly_name": "Jon",
                "title": format!("Item {}", id),
                "media_type": "movie",
                "watched_status": 1
            })
        })
        .collect()
}

pub fn history_response(rows: Vec<Value>) -> ResponseTemplate {
    let total = rows.len();
    success_envelope(json!({
        "recordsTotal": total,
        "recordsFiltered": total,
        "draw": 1,
        "data": rows
    }))
}

pub fn params_for(server: &MockServer) -> ConnectionParameters {
    ConnectionParameters::new(&server.uri(), "test-api-key")
}

pub fn test_config() -> ConfigParameter {
    let mut config = ConfigParameter::new();
    config.set_rate_limit(0);
    config.set_day_boundary(DayBoundary::utc());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_setup() {
        let server = setup_mock_server().await;
        assert!(!server.uri().is_empty());
    }

    #[test]
    fn test_history_rows() {
        let rows = history_rows(10, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["id"], 10);
    }
}
