// File: request.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::NaiveDate;

use crate::error::RequestError;
use crate::history::HistoryQuery;

pub const DEFAULT_LENGTH: usize = 25;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw history request fields as a form or the command line hands them over.
#[derive(Debug, Clone, Default)]
pub struct HistoryRequest {
    pub user_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub media_type: Option<String>,
    pub length: Option<usize>,
}

impl HistoryRequest {
    pub fn validate(&self, max_length: usize) -> Result<HistoryQuery, RequestError> {
        let length = self.length.unwrap_or(DEFAULT_LENGTH);
        if length > max_length {
            return Err(RequestError::LengthTooLarge(max_length));
        }
        if length == 0 {
            return Err(RequestError::LengthTooSmall);
        }

        let user_id = non_blank(&self.user_id).ok_or(RequestError::MissingUserId)?;

        let start_date = non_blank(&self.start_date).map(parse_date).transpose()?;
        let end_date = non_blank(&self.end_date).map(parse_date).transpose()?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(RequestError::InvertedRange);
            }
        }

        Ok(HistoryQuery::new(user_id, length)
            .with_dates(start_date, end_date)
            .with_media_type(non_blank(&self.media_type)))
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, RequestError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| RequestError::InvalidDate(value.to_string()))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
