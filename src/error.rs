// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// Failures raised at the store, quote and import boundaries.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("row {row}: missing required field(s): {}", .missing.join(", "))]
    ImportRow { row: usize, missing: Vec<String> },

    #[error("row {row}: invalid {field} '{value}'")]
    ImportValue {
        row: usize,
        field: String,
        value: String,
    },

    /// Also returned when the id exists under another owner.
    #[error("trade {id} not found")]
    NotFound { id: i64 },

    #[error("quote for {ticker} unavailable: {message}")]
    Quote { ticker: String, message: String },

    #[error(transparent)]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl JournalError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        JournalError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type JournalResult<T> = std::result::Result<T, JournalError>;
