// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup: a non-blocking file appender under the state
//! directory's `logs/` plus an `EnvFilter` honoring `LOG_LEVEL`.

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::lifecycle::LifecycleError;

/// Initialize the global subscriber. The returned guard must be held for
/// the process's lifetime — dropping it stops the background flush thread.
pub fn init(logs_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    std::fs::create_dir_all(logs_dir)?;
    let file_appender = tracing_appender::rolling::daily(logs_dir, "daemon.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(crate::env::log_level()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    Ok(guard)
}
