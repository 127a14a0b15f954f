// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("player lock file held by another instance")]
    LockHeld,

    #[error("bluetooth collaborator unavailable: {0}")]
    BluetoothUnavailable(String),

    #[error("player launch failed: {0}")]
    LaunchFailed(String),

    #[error("player stop failed: {0}")]
    StopFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
