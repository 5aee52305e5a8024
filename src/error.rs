// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;

/// Failure of a single remote API call.
///
/// The history engine never hands these to its callers; they are logged and
/// folded into an empty or partial result. The connectivity probe turns them
/// into a human readable message.
#[derive(Debug)]
pub enum FetchError {
    Transport(reqwest::Error),
    Upstream(String),
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "{}", e),
            Self::Upstream(msg) => write!(f, "API returned error: {}", msg),
            Self::Malformed(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Upstream(_) => None,
            Self::Malformed(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Malformed(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    LengthTooLarge(usize),
    LengthTooSmall,
    MissingUserId,
    InvalidDate(String),
    InvertedRange,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthTooLarge(limit) => write!(
                f,
                "Export limit is {} items maximum",
                group_thousands(*limit)
            ),
            Self::LengthTooSmall => write!(f, "Length must be at least 1"),
            Self::MissingUserId => write!(f, "User ID required"),
            Self::InvalidDate(_) => write!(f, "Invalid date format"),
            Self::InvertedRange => write!(f, "Start date must be before or equal to end date"),
        }
    }
}

impl std::error::Error for RequestError {}

fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[derive(Debug)]
pub enum StorageError {
    Database(String),
    Serialization(serde_json::Error),
    Io(std::io::Error),
    DirectoryCreation(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(e) => write!(f, "Database error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::DirectoryCreation(msg) => write!(f, "Directory creation failed: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(_) => None,
            Self::Serialization(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::DirectoryCreation(_) => None,
        }
    }
}

impl From<sled::Error> for StorageError {
    fn from(error: sled::Error) -> Self {
        Self::Database(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_messages() {
        assert_eq!(
            RequestError::LengthTooLarge(10_000).to_string(),
            "Export limit is 10,000 items maximum"
        );
        assert_eq!(
            RequestError::LengthTooLarge(500).to_string(),
            "Export limit is 500 items maximum"
        );
        assert_eq!(RequestError::MissingUserId.to_string(), "User ID required");
        assert_eq!(
            RequestError::InvalidDate("2024-13-01".to_string()).to_string(),
            "Invalid date format"
        );
        assert_eq!(
            RequestError::InvertedRange.to_string(),
            "Start date must be before or equal to end date"
        );
    }

    #[test]
    fn test_fetch_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let fetch_err: FetchError = err.into();
        assert!(matches!(fetch_err, FetchError::Malformed(_)));
        assert!(fetch_err.to_string().starts_with("Malformed response"));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Database("locked".to_string());
        assert_eq!(err.to_string(), "Database error: locked");
    }
}
