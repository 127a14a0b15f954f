// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("no serial port connected")]
    NotConnected,

    #[error("no port from the allow-list could be opened: {0}")]
    NoPortAvailable(String),

    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ack timed out after {0:?}")]
    Timeout(std::time::Duration),
}
