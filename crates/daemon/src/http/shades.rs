// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DaemonError, Envelope};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use duskline_core::{Clock, Shade, ShadeAction, ShadeId, TaskId, ValidationError};
use duskline_gateway::FrameSender;
use duskline_scheduler::{AudioStartRequester, SunDataSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ShadeCommandBody {
    action: String,
}

#[derive(Debug, Serialize)]
pub struct TaskIdBody {
    task_id: TaskId,
}

pub async fn list_shades<S, C, D, A>(State(state): State<Arc<AppState<S, C, D, A>>>) -> Json<Envelope<Vec<Shade>>>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    Envelope::ok(state.shades.all().cloned().collect())
}

pub async fn command<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
    Path(id): Path<u32>,
    Json(body): Json<ShadeCommandBody>,
) -> Result<Json<Envelope<TaskIdBody>>, DaemonError>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let action =
        ShadeAction::parse(&body.action).ok_or_else(|| ValidationError::UnknownAction(body.action.clone()))?;
    let task_id = state.gateway.command(ShadeId(id), action).await?;
    Ok(Envelope::ok(TaskIdBody { task_id }))
}
