// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DaemonError, Envelope};
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
pub struct TransportStatusBody {
    connected: bool,
    port: Option<String>,
    last_ok_at: Option<DateTime<Utc>>,
}

pub async fn reconnect<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
) -> Result<Json<Envelope<TransportStatusBody>>, DaemonError>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let status = state.transport.reconnect().await?;
    Ok(Envelope::ok(TransportStatusBody {
        connected: status.connected,
        port: status.port,
        last_ok_at: status.last_ok_at,
    }))
}
