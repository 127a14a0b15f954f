// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DaemonError, Envelope};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use chrono::NaiveTime;
use duskline_core::{Clock, TaskId, ValidationError};
use duskline_gateway::FrameSender;
use duskline_scheduler::{AudioStartRequester, SchedulerStatus, SunDataSource, WakeUpSetResult, WakeUpStatus};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct WakeUpTimeBody {
    time: String,
}

#[derive(Debug, Deserialize)]
pub struct TriggerBody {
    scene_name: String,
}

pub async fn status<S, C, D, A>(State(state): State<Arc<AppState<S, C, D, A>>>) -> Json<Envelope<SchedulerStatus>>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    Envelope::ok(state.scheduler.status())
}

pub async fn set_wake_up<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
    Json(body): Json<WakeUpTimeBody>,
) -> Result<Json<Envelope<WakeUpSetResult>>, DaemonError>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let time = NaiveTime::parse_from_str(&body.time, "%H:%M")
        .map_err(|_| ValidationError::MalformedTime(body.time.clone()))?;
    let result = state.wakeup.set(time)?;
    Ok(Envelope::ok(result))
}

pub async fn disable_wake_up<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
) -> Result<Json<Envelope<WakeUpStatus>>, DaemonError>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    Ok(Envelope::ok(state.wakeup.disable()?))
}

pub async fn wake_up_status<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
) -> Result<Json<Envelope<WakeUpStatus>>, DaemonError>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    Ok(Envelope::ok(state.wakeup.status()?))
}

/// Fires a scene directly through the gateway, deliberately bypassing
/// `SceneScheduler::fire_scene`'s home/away gate.
pub async fn trigger<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
    Json(body): Json<TriggerBody>,
) -> Result<Json<Envelope<Vec<TaskId>>>, DaemonError>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let task_ids = state.gateway.execute_scene(&body.scene_name).await?;
    Ok(Envelope::ok(task_ids))
}
