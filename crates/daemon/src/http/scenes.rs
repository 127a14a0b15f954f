// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{DaemonError, Envelope};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use duskline_core::{Clock, Scene, TaskId};
use duskline_gateway::FrameSender;
use duskline_scheduler::{AudioStartRequester, SunDataSource};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct TaskIdsBody {
    task_ids: Vec<TaskId>,
}

pub async fn list_scenes<S, C, D, A>(State(state): State<Arc<AppState<S, C, D, A>>>) -> Json<Envelope<Vec<Scene>>>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    Envelope::ok(state.scenes.list())
}

pub async fn execute<S, C, D, A>(
    State(state): State<Arc<AppState<S, C, D, A>>>,
    Path(name): Path<String>,
) -> Result<Json<Envelope<TaskIdsBody>>, DaemonError>
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    let task_ids = state.gateway.execute_scene(&name).await?;
    Ok(Envelope::ok(TaskIdsBody { task_ids }))
}
