// File: e2e_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

mod common;

use common::*;
use serde_json::json;
use serial_test::serial;
use tautulli_export::cli::{ExportArgs, HistoryArgs};
use tautulli_export::commands::{export, history};
use tautulli_export::storage::ConfigStore;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::Mock;

fn history_args(output: std::path::PathBuf) -> HistoryArgs {
    HistoryArgs {
        user_id: Some("7".to_string()),
        start_date: Some("2024-01-15".to_string()),
        end_date: Some("2024-01-15".to_string()),
        media_type: None,
        length: 2,
        format: "json".to_string(),
        output: Some(output),
    }
}

#[tokio::test]
#[serial]
async fn test_history_then_export_workflow() {
    let mock_server = setup_mock_server().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "get_history"))
        .and(query_param("length", "8"))
        .respond_with(history_response(vec![
            json!({
                "date": 1_705_329_000,
                "friendly_name": "Jon",
                "grandparent_title": "The Expanse",
                "title": "Dulcinea",
                "media_type": "episode",
                "duration": 2730,
                "percent_complete": 98,
                "watched_status": 1,
                "ip_address": "10.0.0.4"
            }),
            json!({"date": 1_705_200_000, "title": "Yesterday", "watched_status": 1}),
            json!({
                "date": 1_705_280_000,
                "friendly_name": "Jon",
                "title": "Heat",
                "media_type": "movie",
                "duration": 10200,
                "percent_complete": 40,
                "watched_status": 0
            }),
        ]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = ConfigStore::open(Some(temp_dir.path().to_path_buf())).unwrap();
    store.save(&mock_server.uri(), "test-api-key").unwrap();

    let json_path = temp_dir.path().join("history.json");
    history::execute(&history_args(json_path.clone()), &store, test_config())
        .await
        .unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(saved["success"], json!(true));
    assert_eq!(saved["history"].as_array().map(Vec::len), Some(2));

    let csv_path = temp_dir.path().join("history.csv");
    let args = ExportArgs {
        input: json_path,
        output: Some(csv_path.clone()),
    };
    export::execute(&args, test_config()).unwrap();

    let csv = std::fs::read_to_string(csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        "2024-01-15 14:30:00,Jon,The Expanse - Dulcinea,episode,45.5,98%,Finished,10.0.0.4"
    );
    assert_eq!(lines[2], "2024-01-15 00:53:20,Jon,Heat,movie,170.0,40%,Stopped,");
}

#[tokio::test]
#[serial]
async fn test_history_requires_configuration() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConfigStore::open(Some(temp_dir.path().to_path_buf())).unwrap();

    let err = history::execute(
        &history_args(temp_dir.path().join("out.json")),
        &store,
        test_config(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("not configured"));
}

#[tokio::test]
#[serial]
async fn test_history_rejects_invalid_request_before_calling() {
    let mock_server = setup_mock_server().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(history_response(Vec::new()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let store = ConfigStore::open(Some(temp_dir.path().to_path_buf())).unwrap();
    store.save(&mock_server.uri(), "test-api-key").unwrap();

    let mut args = history_args(temp_dir.path().join("out.json"));
    args.start_date = Some("2024-02-01".to_string());
    let err = history::execute(&args, &store, test_config()).await.unwrap_err();
    assert_eq!(err.to_string(), "Start date must be before or equal to end date");

    args.length = 10_001;
    let err = history::execute(&args, &store, test_config()).await.unwrap_err();
    assert_eq!(err.to_string(), "Export limit is 10,000 items maximum");
}
