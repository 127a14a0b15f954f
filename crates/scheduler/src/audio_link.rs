// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wake-up orchestrator's only dependency on the audio subsystem: a
//! narrow collaborator trait, so this crate does not need to depend on
//! `duskline-audio` directly (mirrors the `FrameSender` narrowing of
//! `SerialTransport` in `duskline-gateway`). `duskline-audio`'s
//! `AudioStartupMachine` is adapted to this trait at the daemon's wiring
//! site.

use async_trait::async_trait;

/// Best-effort audio start request: failure never aborts the wake-up
/// sequence.
#[async_trait]
pub trait AudioStartRequester: Send + Sync + 'static {
    async fn request_start(&self, trigger_source: &str) -> Result<(), String>;
}
