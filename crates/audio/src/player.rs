// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The player process collaborator: the audio player daemon's own
//! internals are out of scope, so this is a FIFO and process-table peer
//! only, covering launch, a command FIFO, and a bounded stop.

use crate::error::AudioError;
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[async_trait]
pub trait PlayerProcess: Send + Sync + 'static {
    /// Right-of-way check: an OS-level scan, independent of the lock file.
    fn is_running(&self) -> bool;

    async fn launch(&self) -> Result<(), AudioError>;

    /// Must return within 1s regardless of whether the player has actually
    /// exited by then.
    async fn stop(&self) -> Result<(), AudioError>;
}

/// Scans the OS process table for `process_name` and signals start/stop by
/// writing command lines to a write-only control FIFO that the actual
/// player wrapper daemon reads.
pub struct FifoPlayerProcess {
    process_name: String,
    control_fifo: PathBuf,
}

impl FifoPlayerProcess {
    pub fn new(process_name: impl Into<String>, control_fifo: impl Into<PathBuf>) -> Self {
        Self { process_name: process_name.into(), control_fifo: control_fifo.into() }
    }

    fn write_control(fifo: &std::path::Path, command: &str) -> Result<(), AudioError> {
        let mut handle = std::fs::OpenOptions::new().write(true).open(fifo)?;
        writeln!(handle, "{command}")?;
        Ok(())
    }
}

#[async_trait]
impl PlayerProcess for FifoPlayerProcess {
    fn is_running(&self) -> bool {
        let system = sysinfo::System::new_all();
        system.processes().values().any(|p| p.name().to_string_lossy().contains(&self.process_name))
    }

    async fn launch(&self) -> Result<(), AudioError> {
        let fifo = self.control_fifo.clone();
        tokio::task::spawn_blocking(move || Self::write_control(&fifo, "start"))
            .await
            .map_err(|e| AudioError::LaunchFailed(e.to_string()))??;
        Ok(())
    }

    async fn stop(&self) -> Result<(), AudioError> {
        let fifo = self.control_fifo.clone();
        let write = tokio::task::spawn_blocking(move || Self::write_control(&fifo, "stop"));
        match tokio::time::timeout(Duration::from_secs(1), write).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(AudioError::StopFailed(e.to_string())),
            Err(_) => Err(AudioError::StopFailed("stop signal write exceeded 1s bound".into())),
        }
    }
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod tests;
