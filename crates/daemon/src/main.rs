// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duskline Daemon
//!
//! Background process that owns the serial transport, the scene scheduler,
//! the wake-up orchestrator, and the audio startup machine, fronted by an
//! HTTP API.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use duskline_daemon::{env, http, lifecycle, logging};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let state_dir = env::state_dir()?;
    let _log_guard = logging::init(&state_dir.join("logs"))?;

    info!("starting duskline daemon");

    let (lock, state) = match lifecycle::startup().await {
        Ok(result) => result,
        Err(lifecycle::LifecycleError::LockFailed(_)) => {
            eprintln!("duskline-daemon is already running");
            std::process::exit(1);
        }
        Err(e) => {
            error!(error = %e, "failed to start daemon");
            return Err(Box::new(e));
        }
    };

    let addr = env::listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    let app = http::router(state.clone());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
                _ = sigint.recv() => info!("received SIGINT, shutting down"),
            }
        })
        .await?;

    state.scheduler.shutdown();
    drop(lock);
    Ok(())
}
