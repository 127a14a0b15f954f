// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

/// HTTP listen address (`LISTEN_ADDR`), default `0.0.0.0:8080`.
pub fn listen_addr() -> String {
    std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string())
}

/// Directory holding `config.json` and `scenes.json` (`CONFIG_DIR`).
pub fn config_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoConfigDir)?;
    Ok(PathBuf::from(home).join(".config/duskline"))
}

/// `tracing_subscriber::EnvFilter` directive (`LOG_LEVEL`), default `info`.
pub fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// Resolve the state directory: `DUSKLINE_STATE_DIR` > `XDG_STATE_HOME/duskline`
/// > `~/.local/state/duskline`. Logs and the audio lock/status/FIFO files
/// live under here.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("DUSKLINE_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("duskline"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/duskline"))
}

/// Comma-separated candidate serial device paths (`DUSKLINE_SERIAL_ALLOWLIST`).
pub fn serial_allow_list() -> Vec<String> {
    std::env::var("DUSKLINE_SERIAL_ALLOWLIST")
        .ok()
        .map(|raw| raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
        .unwrap_or_default()
}

/// Bluetooth peer MAC address the audio machine connects to (`DUSKLINE_BLUETOOTH_MAC`).
pub fn bluetooth_mac() -> String {
    std::env::var("DUSKLINE_BLUETOOTH_MAC").unwrap_or_default()
}

/// Process name the audio machine scans for (`DUSKLINE_AUDIO_PROCESS_NAME`).
pub fn audio_process_name() -> String {
    std::env::var("DUSKLINE_AUDIO_PROCESS_NAME").unwrap_or_else(|_| "mpd".to_string())
}

/// Base URL for the sunrise/sunset HTTP collaborator (`DUSKLINE_SUN_API_BASE`).
pub fn sun_api_base() -> String {
    std::env::var("DUSKLINE_SUN_API_BASE").unwrap_or_else(|_| "https://api.sunrise-sunset.org".to_string())
}
