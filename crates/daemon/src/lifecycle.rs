// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup: acquire the single-instance lock first, then build every
//! collaborator and wire the concrete `AppState`.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use duskline_audio::{AudioStartupMachine, BluetoothctlCollaborator, FifoPlayerProcess};
use duskline_config::{ConfigSchema, ConfigStore};
use duskline_core::{Clock, Shade, ShadeRegistry, SystemClock};
use duskline_gateway::{RetryEngine, SerialFrameSender, ShadeCommandGateway};
use duskline_scenes::SceneRegistry;
use duskline_scheduler::{CachingSunOracle, HttpSunDataSource, SceneScheduler, WakeUpOrchestrator};
use duskline_serial::{SerialTransport, TokioSerialPortFactory};
use fs2::FileExt;
use thiserror::Error;
use tracing::{info, warn};

use crate::env;
use crate::state::{AudioRequesterAdapter, ConcreteState};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine state directory")]
    NoStateDir,

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to acquire daemon lock: another instance already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] duskline_config::ConfigError),

    #[error("scene registry error: {0}")]
    Scene(#[from] duskline_scenes::SceneError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Holds the process-lifetime state directory lock; dropping this releases
/// it, so it must stay alive for the process's duration.
pub struct LockGuard {
    #[allow(dead_code)]
    file: File,
}

fn acquire_lock(path: &PathBuf) -> Result<LockGuard, LifecycleError> {
    let file = std::fs::OpenOptions::new().create(true).write(true).truncate(false).open(path)?;
    file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;
    let mut file = file;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(LockGuard { file })
}

/// Acquire the lock, load the configuration and scene documents, and wire
/// every collaborator into a running [`ConcreteState`]. Lock acquisition
/// happens before any other directory or file I/O so a second instance
/// fails fast instead of racing the first over shared state.
pub async fn startup() -> Result<(LockGuard, Arc<ConcreteState>), LifecycleError> {
    let state_dir = env::state_dir()?;
    std::fs::create_dir_all(&state_dir)?;
    let lock = acquire_lock(&state_dir.join("daemon.pid"))?;

    let config_dir = env::config_dir()?;
    std::fs::create_dir_all(&config_dir)?;
    let logs_dir = state_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)?;

    let config = Arc::new(ConfigStore::load(config_dir.join("config.json"))?);
    let shades: Vec<Shade> = config.get("shades").unwrap_or_default();
    let shades = Arc::new(ShadeRegistry::new(shades));
    let scenes = Arc::new(SceneRegistry::load(config_dir.join("scenes.json"), &shades)?);

    let allow_list = env::serial_allow_list();
    let transport = Arc::new(SerialTransport::new(allow_list, Arc::new(TokioSerialPortFactory::default())));
    if let Err(e) = transport.reconnect().await {
        warn!(error = %e, "no serial port available at startup, will retry on first command");
    }

    let clock = SystemClock;
    let frame_sender = Arc::new(SerialFrameSender::new(transport.clone()));
    let retry = RetryEngine::new(frame_sender, clock);
    let gateway = Arc::new(ShadeCommandGateway::new(shades.clone(), scenes.clone(), retry));

    let location = ConfigSchema::new(&config).location()?;
    let sun_source = HttpSunDataSource::new(env::sun_api_base(), location.lat, location.lon);
    let sun = Arc::new(CachingSunOracle::new(sun_source, location.lat, location.lon));
    let scheduler = SceneScheduler::new(gateway.clone(), config.clone(), sun, clock);

    let bluetooth = Arc::new(BluetoothctlCollaborator::new(env::bluetooth_mac()));
    let player = Arc::new(FifoPlayerProcess::new(env::audio_process_name(), state_dir.join("audio.fifo")));
    let audio_machine =
        AudioStartupMachine::new(bluetooth, player, state_dir.join("audio.lock"), state_dir.join("audio.status"));
    let audio_requester = Arc::new(AudioRequesterAdapter::new(audio_machine));
    let wakeup = WakeUpOrchestrator::new(gateway.clone(), config.clone(), clock, audio_requester);

    info!(shades = shades.all().count(), scenes = scenes.list().len(), "daemon collaborators wired");

    let state = Arc::new(ConcreteState {
        gateway,
        scheduler,
        wakeup,
        transport,
        shades,
        scenes,
        started_at: clock.now_utc(),
        clock,
    });

    Ok((lock, state))
}
