// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene '{0}' not found")]
    NotFound(String),

    #[error("invalid scene document: {0}")]
    Invalid(String),

    #[error("IO error reading scene document: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error parsing scene document: {0}")]
    Json(#[from] serde_json::Error),
}
