// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Bluetooth collaborator: the audio player daemon's own internals are
//! out of scope, so only its status/connect contract lives here, fronting
//! a real `bluetoothctl` on the production path.

use crate::error::AudioError;
use async_trait::async_trait;
use duskline_core::BluetoothStatus;
use std::time::Duration;

#[async_trait]
pub trait BluetoothCollaborator: Send + Sync + 'static {
    async fn status(&self) -> Result<BluetoothStatus, AudioError>;

    /// Attempt to connect the configured sink, bounded by `budget` (a 60s
    /// sub-step timeout on the production path).
    async fn connect(&self, budget: Duration) -> Result<BluetoothStatus, AudioError>;
}

/// Shells out to `bluetoothctl` for the configured device's paired/connected
/// state via `tokio::process::Command`.
pub struct BluetoothctlCollaborator {
    device_mac: String,
}

impl BluetoothctlCollaborator {
    pub fn new(device_mac: impl Into<String>) -> Self {
        Self { device_mac: device_mac.into() }
    }

    async fn info(&self) -> Result<String, AudioError> {
        let output = tokio::process::Command::new("bluetoothctl")
            .args(["info", &self.device_mac])
            .output()
            .await
            .map_err(|e| AudioError::BluetoothUnavailable(e.to_string()))?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn parse_status(info: &str) -> BluetoothStatus {
    let connected = info.lines().any(|l| l.trim() == "Connected: yes");
    let sink_ready = info.to_ascii_lowercase().contains("audio sink");
    BluetoothStatus { connected, sink_ready: connected && sink_ready }
}

#[async_trait]
impl BluetoothCollaborator for BluetoothctlCollaborator {
    async fn status(&self) -> Result<BluetoothStatus, AudioError> {
        let info = self.info().await?;
        Ok(parse_status(&info))
    }

    async fn connect(&self, budget: Duration) -> Result<BluetoothStatus, AudioError> {
        let connect = tokio::process::Command::new("bluetoothctl").args(["connect", &self.device_mac]).output();
        match tokio::time::timeout(budget, connect).await {
            Ok(Ok(output)) if output.status.success() => self.status().await,
            Ok(Ok(output)) => {
                Err(AudioError::BluetoothUnavailable(String::from_utf8_lossy(&output.stderr).to_string()))
            }
            Ok(Err(e)) => Err(AudioError::BluetoothUnavailable(e.to_string())),
            Err(_) => Err(AudioError::BluetoothUnavailable("connect timed out".into())),
        }
    }
}

#[cfg(test)]
#[path = "bluetooth_tests.rs"]
mod tests;
