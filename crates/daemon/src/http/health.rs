// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Envelope;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use duskline_core::Clock;
use duskline_gateway::FrameSender;
use duskline_scheduler::{AudioStartRequester, SunDataSource};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
    arduino_connected: bool,
    uptime_s: i64,
    started_at: DateTime<Utc>,
    serial_port: Option<String>,
    serial_last_ok_at: Option<DateTime<Utc>>,
    scheduler_job_count: usize,
}

pub async fn health<S, C, D, A>(State(state): State<Arc<AppState<S, C, D, A>>>) -> Json<Envelope<HealthBody>>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let transport_status = state.transport.status().await;
    let scheduler_status = state.scheduler.status();
    let uptime_s = (state.clock.now_utc() - state.started_at).num_seconds();
    Envelope::ok(HealthBody {
        status: "ok",
        arduino_connected: transport_status.connected,
        uptime_s,
        started_at: state.started_at,
        serial_port: transport_status.port,
        serial_last_ok_at: transport_status.last_ok_at,
        scheduler_job_count: scheduler_status.job_count,
    })
}
