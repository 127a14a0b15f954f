// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Envelope;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use duskline_core::{Clock, RetryMetrics, RetryTaskSnapshot};
use duskline_gateway::FrameSender;
use duskline_scheduler::{AudioStartRequester, SunDataSource};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ActiveRetriesBody {
    tasks: Vec<RetryTaskSnapshot>,
    metrics: RetryMetrics,
}

#[derive(Debug, Serialize)]
pub struct CancelledBody {
    cancelled: usize,
}

pub async fn list_active<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
) -> Json<Envelope<ActiveRetriesBody>>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let (tasks, metrics) = state.gateway.list_active();
    Envelope::ok(ActiveRetriesBody { tasks, metrics })
}

pub async fn cancel_all<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
) -> Json<Envelope<CancelledBody>>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let cancelled = state.gateway.cancel_all().await;
    Envelope::ok(CancelledBody { cancelled })
}
