// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon's wired-up dependency graph: one `AppState` per running
//! process, generic over the same collaborator traits the component
//! crates define, so a test can swap in fakes at every seam exactly as the
//! component crates' own tests do.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duskline_audio::{AudioStartupMachine, BluetoothCollaborator, BluetoothctlCollaborator, FifoPlayerProcess, PlayerProcess};
use duskline_core::{AudioStartupResult, Clock, SystemClock};
use duskline_gateway::{FrameSender, SerialFrameSender, ShadeCommandGateway};
use duskline_scenes::SceneRegistry;
use duskline_scheduler::{AudioStartRequester, HttpSunDataSource, SceneScheduler, SunDataSource, WakeUpOrchestrator};
use duskline_serial::SerialTransport;
use std::sync::Arc;

use duskline_core::ShadeRegistry;

/// Adapts a concrete [`AudioStartupMachine`] to the scheduler's narrow
/// `AudioStartRequester` seam, so `duskline-scheduler` never has to depend
/// on `duskline-audio` directly.
pub struct AudioRequesterAdapter<B: BluetoothCollaborator, P: PlayerProcess> {
    machine: Arc<AudioStartupMachine<B, P>>,
}

impl<B: BluetoothCollaborator, P: PlayerProcess> AudioRequesterAdapter<B, P> {
    pub fn new(machine: Arc<AudioStartupMachine<B, P>>) -> Self {
        Self { machine }
    }
}

#[async_trait]
impl<B: BluetoothCollaborator, P: PlayerProcess> AudioStartRequester for AudioRequesterAdapter<B, P> {
    async fn request_start(&self, trigger_source: &str) -> Result<(), String> {
        match self.machine.start(trigger_source).await {
            AudioStartupResult::Success { .. } | AudioStartupResult::Skipped { .. } => Ok(()),
            AudioStartupResult::Failed { reason, error } => Err(format!("{reason}: {error}")),
        }
    }
}

pub struct AppState<S: FrameSender, C: Clock, D: SunDataSource, A: AudioStartRequester> {
    pub gateway: Arc<ShadeCommandGateway<S, C>>,
    pub scheduler: Arc<SceneScheduler<S, C, D>>,
    pub wakeup: Arc<WakeUpOrchestrator<S, C, A>>,
    pub transport: Arc<SerialTransport>,
    pub shades: Arc<ShadeRegistry>,
    pub scenes: Arc<SceneRegistry>,
    pub started_at: DateTime<Utc>,
    pub clock: C,
}

/// The process's real collaborators: a live serial port, the real
/// sunrise/sunset HTTP API, a real system clock, and the audio machine
/// wired through [`AudioRequesterAdapter`].
pub type ConcreteAudioMachine = AudioStartupMachine<BluetoothctlCollaborator, FifoPlayerProcess>;
pub type ConcreteAudioRequester = AudioRequesterAdapter<BluetoothctlCollaborator, FifoPlayerProcess>;
pub type ConcreteState = AppState<SerialFrameSender, SystemClock, HttpSunDataSource, ConcreteAudioRequester>;
