// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-crate error vocabulary: validation failures surfaced synchronously
//! and the HTTP envelope every error eventually maps into.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced synchronously to an HTTP caller as 4xx.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown shade_id {0}")]
    UnknownShade(crate::id::ShadeId),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error("malformed time '{0}', expected HH:MM")]
    MalformedTime(String),

    #[error("unknown action '{0}', expected up|down|stop")]
    UnknownAction(String),
}

/// Stable error code + human message + optional structured details, the
/// shape carried by every HTTP response's `error` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        let code = match &e {
            ValidationError::UnknownShade(_) => "validation_error",
            ValidationError::UnknownGroup(_) => "validation_error",
            ValidationError::MalformedTime(_) => "validation_error",
            ValidationError::UnknownAction(_) => "validation_error",
        };
        ApiError::new(code, e.to_string())
    }
}
