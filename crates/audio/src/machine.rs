// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The audio startup state machine: right-of-way check, Bluetooth
//! fast/slow path, guarded launch, and a coalesced `start()` so concurrent
//! callers share one outcome.

use crate::bluetooth::BluetoothCollaborator;
use crate::error::AudioError;
use crate::lock::PlayerLock;
use crate::player::PlayerProcess;
use duskline_core::{AudioSessionState, AudioStartupPath, AudioStartupResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const BT_CONNECT_BUDGET: Duration = Duration::from_secs(60);
const OVERALL_BUDGET: Duration = Duration::from_secs(90);
const STOP_BOUND: Duration = Duration::from_millis(1000);

pub struct AudioStartupMachine<B: BluetoothCollaborator, P: PlayerProcess> {
    bluetooth: Arc<B>,
    player: Arc<P>,
    lock_path: PathBuf,
    status_path: PathBuf,
    state: parking_lot::Mutex<AudioSessionState>,
    lock: parking_lot::Mutex<Option<PlayerLock>>,
    inflight: parking_lot::Mutex<Option<broadcast::Sender<AudioStartupResult>>>,
}

impl<B: BluetoothCollaborator, P: PlayerProcess> AudioStartupMachine<B, P> {
    pub fn new(bluetooth: Arc<B>, player: Arc<P>, lock_path: PathBuf, status_path: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            bluetooth,
            player,
            lock_path,
            status_path,
            state: parking_lot::Mutex::new(AudioSessionState::Off),
            lock: parking_lot::Mutex::new(None),
            inflight: parking_lot::Mutex::new(None),
        })
    }

    pub fn state(&self) -> AudioSessionState {
        self.state.lock().clone()
    }

    /// Request audio start. Concurrent callers arriving while a startup is
    /// already in flight are coalesced onto the same outcome (invariant 11).
    pub async fn start(&self, trigger_source: &str) -> AudioStartupResult {
        if let Some(mut rx) = self.join_inflight() {
            return rx.recv().await.unwrap_or_else(|_| AudioStartupResult::Failed {
                reason: "coalesced_sender_dropped".into(),
                error: "in-flight startup task ended without a result".into(),
            });
        }

        let result = tokio::time::timeout(OVERALL_BUDGET, self.run_start(trigger_source))
            .await
            .unwrap_or_else(|_| AudioStartupResult::Failed {
                reason: "overall_timeout".into(),
                error: "audio startup exceeded the 90s budget".into(),
            });
        self.write_status();
        self.finish_inflight(result.clone());
        result
    }

    fn join_inflight(&self) -> Option<broadcast::Receiver<AudioStartupResult>> {
        let mut guard = self.inflight.lock();
        if let Some(tx) = guard.as_ref() {
            return Some(tx.subscribe());
        }
        let (tx, _rx) = broadcast::channel(1);
        *guard = Some(tx);
        None
    }

    fn finish_inflight(&self, result: AudioStartupResult) {
        if let Some(tx) = self.inflight.lock().take() {
            let _ = tx.send(result);
        }
    }

    async fn run_start(&self, trigger_source: &str) -> AudioStartupResult {
        if self.player.is_running() {
            tracing::info!(trigger_source, "audio player already running, skipping");
            *self.state.lock() = AudioSessionState::Running;
            return AudioStartupResult::Skipped { reason: "already_running".into() };
        }

        *self.state.lock() = AudioSessionState::StartingConnectingBt;
        let status = match self.bluetooth.status().await {
            Ok(s) => s,
            Err(e) => return self.fail("bt_failed", e.to_string()),
        };

        let path = if status.connected && status.sink_ready {
            AudioStartupPath::Fast
        } else {
            match self.bluetooth.connect(BT_CONNECT_BUDGET).await {
                Ok(s) if s.connected && s.sink_ready => AudioStartupPath::Slow,
                Ok(_) => return self.fail("bt_failed", "sink not ready after connect".into()),
                Err(e) => return self.fail("bt_failed", e.to_string()),
            }
        };

        *self.state.lock() = AudioSessionState::StartingLaunching;
        if let Err(e) = self.acquire_lock() {
            return self.fail("lock_unavailable", e.to_string());
        }
        if let Err(e) = self.player.launch().await {
            self.release_lock();
            return self.fail("launch_failed", e.to_string());
        }

        *self.state.lock() = AudioSessionState::Running;
        AudioStartupResult::Success { path }
    }

    fn fail(&self, reason: &str, error: String) -> AudioStartupResult {
        *self.state.lock() = AudioSessionState::Failed { reason: reason.to_string() };
        AudioStartupResult::Failed { reason: reason.to_string(), error }
    }

    /// Stops the player and returns within [`STOP_BOUND`] regardless of
    /// whether the underlying process has actually exited by then.
    pub async fn stop(&self) -> Result<(), AudioError> {
        *self.state.lock() = AudioSessionState::Stopping;
        let stop = self.player.stop();
        let _ = tokio::time::timeout(STOP_BOUND, stop).await;
        self.release_lock();
        *self.state.lock() = AudioSessionState::Off;
        self.write_status();
        Ok(())
    }

    fn acquire_lock(&self) -> Result<(), AudioError> {
        let mut guard = self.lock.lock();
        if guard.is_some() {
            return Ok(());
        }
        *guard = Some(PlayerLock::try_acquire(&self.lock_path)?);
        Ok(())
    }

    fn release_lock(&self) {
        self.lock.lock().take();
    }

    fn write_status(&self) {
        let state = self.state.lock().clone();
        match serde_json::to_string(&state) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.status_path, json) {
                    tracing::warn!(error = %e, "failed to write audio status file");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize audio status"),
        }
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
