// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audio session state machine vocabulary.

use serde::{Deserialize, Serialize};

/// `Off -> StartingConnectingBt -> StartingLaunching -> Running -> Stopping -> Off`,
/// plus a terminal `Failed(reason)` reachable from any starting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AudioSessionState {
    Off,
    StartingConnectingBt,
    StartingLaunching,
    Running,
    Stopping,
    Failed { reason: String },
}

/// Outcome of one `AudioStartupMachine::start()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AudioStartupResult {
    Skipped { reason: String },
    Success { path: AudioStartupPath },
    Failed { reason: String, error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioStartupPath {
    Fast,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BluetoothStatus {
    pub connected: bool,
    pub sink_ready: bool,
}
