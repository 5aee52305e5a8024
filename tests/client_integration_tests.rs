// File: client_integration_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

mod common;

use common::*;
use serde_json::json;
use serial_test::serial;
use std::time::Duration;
use tautulli_export::client::TautulliClient;
use tautulli_export::config::ConnectionParameters;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
#[serial]
async fn test_connection_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "get_server_info"))
        .and(query_param("apikey", "test-api-key"))
        .respond_with(success_envelope(json!({"pms_name": "Plex", "pms_version": "1.40"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TautulliClient::new(test_config());
    let (ok, message) = client.test_connection(&params_for(&mock_server)).await;

    assert!(ok);
    assert_eq!(message, "Connection successful!");
}

#[tokio::test]
#[serial]
async fn test_connection_trailing_slash_in_url() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(success_envelope(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = ConnectionParameters::new(&format!("{}/", mock_server.uri()), " test-api-key ");
    let (ok, _) = TautulliClient::new(test_config())
        .test_connection(&params)
        .await;

    assert!(ok);
}

#[tokio::test]
#[serial]
async fn test_connection_api_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(error_envelope("Invalid apikey"))
        .mount(&mock_server)
        .await;

    let (ok, message) = TautulliClient::new(test_config())
        .test_connection(&params_for(&mock_server))
        .await;

    assert!(!ok);
    assert_eq!(message, "API returned error: Invalid apikey");
}

#[tokio::test]
#[serial]
async fn test_connection_api_error_without_message() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(create_json_response(json!({"response": {"result": "error"}})))
        .mount(&mock_server)
        .await;

    let (ok, message) = TautulliClient::new(test_config())
        .test_connection(&params_for(&mock_server))
        .await;

    assert!(!ok);
    assert_eq!(message, "API returned error: Unknown error");
}

#[tokio::test]
#[serial]
async fn test_connection_refused() {
    let params = ConnectionParameters::new("http://127.0.0.1:1", "test-api-key");
    let (ok, message) = TautulliClient::new(test_config())
        .test_connection(&params)
        .await;

    assert!(!ok);
    assert!(message.starts_with("Connection failed: "), "{}", message);
}

#[tokio::test]
#[serial]
async fn test_connection_timeout() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(success_envelope(json!({})).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let mut config = test_config();
    config.set_probe_timeout(1);
    let (ok, message) = TautulliClient::new(config)
        .test_connection(&params_for(&mock_server))
        .await;

    assert!(!ok);
    assert!(message.starts_with("Connection failed: "), "{}", message);
}

#[tokio::test]
#[serial]
async fn test_connection_non_json_body() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let (ok, message) = TautulliClient::new(test_config())
        .test_connection(&params_for(&mock_server))
        .await;

    assert!(!ok);
    assert!(message.starts_with("Error: "), "{}", message);
    assert!(message.contains("HTTP 502"), "{}", message);
}

#[tokio::test]
#[serial]
async fn test_list_users_success() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .and(query_param("cmd", "get_user_names"))
        .respond_with(success_envelope(json!([
            {"user_id": 1, "friendly_name": "Jon"},
            {"user_id": "22", "friendly_name": "Ann", "thumb": "/t.png"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let users = TautulliClient::new(test_config())
        .list_users(&params_for(&mock_server))
        .await;

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].display_id(), "1");
    assert_eq!(users[0].friendly_name(), "Jon");
    assert_eq!(users[1].get("thumb"), Some(&json!("/t.png")));
    assert_eq!(users[1].display_id(), "22");
}

#[tokio::test]
#[serial]
async fn test_list_users_api_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(error_envelope("Invalid apikey"))
        .mount(&mock_server)
        .await;

    let users = TautulliClient::new(test_config())
        .list_users(&params_for(&mock_server))
        .await;

    assert!(users.is_empty());
}

#[tokio::test]
#[serial]
async fn test_list_users_unreachable() {
    let params = ConnectionParameters::new("http://127.0.0.1:1", "test-api-key");
    let users = TautulliClient::new(test_config()).list_users(&params).await;

    assert!(users.is_empty());
}

#[tokio::test]
#[serial]
async fn test_connection_ok_status_with_non_json_body() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Login</html>"))
        .mount(&mock_server)
        .await;

    let (ok, message) = TautulliClient::new(test_config())
        .test_connection(&params_for(&mock_server))
        .await;

    assert!(!ok);
    assert!(
        message.starts_with("Error: Malformed response: HTTP 200"),
        "{}",
        message
    );
}
