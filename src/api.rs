// File: api.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Partial schema of the Tautulli API v2 responses.
//!
//! Only the fields this crate acts on are typed. Everything else is kept as
//! raw JSON so that records pass through unchanged.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FetchError;

pub const RESULT_SUCCESS: &str = "success";

pub const CMD_SERVER_INFO: &str = "get_server_info";
pub const CMD_USER_NAMES: &str = "get_user_names";
pub const CMD_HISTORY: &str = "get_history";

#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub response: ResponseBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ResponseBody {
    pub fn is_success(&self) -> bool {
        self.result.as_deref() == Some(RESULT_SUCCESS)
    }
}

impl Envelope {
    /// Decodes the payload of a successful response into `T`.
    ///
    /// The result flag is checked before the payload shape, so an error
    /// response with an unexpected `data` still reports the upstream message.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<Option<T>, FetchError> {
        if !self.response.is_success() {
            return Err(FetchError::Upstream(
                self.response
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        match self.response.data {
            None | Some(Value::Null) => Ok(None),
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryPayload {
    #[serde(default)]
    pub data: Option<Vec<HistoryItem>>,
    #[serde(default, rename = "recordsTotal")]
    pub records_total: Option<Value>,
    #[serde(default, rename = "recordsFiltered")]
    pub records_filtered: Option<Value>,
}

impl HistoryPayload {
    pub fn into_items(self) -> Vec<HistoryItem> {
        self.data.unwrap_or_default()
    }
}

/// One row of watch history, kept as the upstream object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryItem(Map<String, Value>);

impl HistoryItem {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Unix timestamp of the play, 0 when missing or unreadable.
    pub fn timestamp(&self) -> i64 {
        self.int_field("date")
    }

    pub fn str_field(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn int_field(&self, key: &str) -> i64 {
        self.get(key).map(lenient_int).unwrap_or(0)
    }

    /// `"Show - Episode"` for episodes, the plain title otherwise.
    pub fn display_title(&self) -> String {
        if self.has_value("grandparent_title") {
            format!(
                "{} - {}",
                self.str_field("grandparent_title"),
                self.str_field("title")
            )
        } else {
            self.str_field("title").to_string()
        }
    }

    /// Mirrors a loose truthiness check: absent, null, false, 0 and "" are unset.
    pub fn has_value(&self, key: &str) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map_or(false, |v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(a)) => !a.is_empty(),
            Some(Value::Object(o)) => !o.is_empty(),
        }
    }
}

fn lenient_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// One entry of the user list, kept as the upstream object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserSummary(Map<String, Value>);

impl UserSummary {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn display_id(&self) -> String {
        display_value(self.get("user_id"))
    }

    pub fn friendly_name(&self) -> String {
        display_value(self.get("friendly_name"))
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
