// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP surface: every route is a thin adapter over
//! `duskline-gateway`/`duskline-scheduler`, mapping typed errors onto the
//! `{success, data, error}` envelope. `TraceLayer` logs every request;
//! `TimeoutLayer` bounds every handler to 5s. No `CatchPanicLayer` —
//! handlers return `Result`, they never panic.

mod arduino;
mod error;
mod health;
mod retries;
mod scenes;
mod shades;

pub mod scheduler;

pub use error::DaemonError;

use crate::state::AppState;
use axum::error_handling::HandleErrorLayer;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{BoxError, Json, Router};
use duskline_core::{ApiError, Clock};
use duskline_gateway::FrameSender;
use duskline_scheduler::{AudioStartRequester, SunDataSource};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

const HANDLER_TIMEOUT: Duration = Duration::from_secs(5);

/// The response body every handler returns.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data: Some(data), error: None })
    }
}

impl IntoResponse for Envelope<()> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

async fn handle_timeout(_err: BoxError) -> Response {
    let body = Json(Envelope::<()> {
        success: false,
        data: None,
        error: Some(ApiError::new("timeout", "handler exceeded its 5s bound")),
    });
    (StatusCode::GATEWAY_TIMEOUT, body).into_response()
}

pub fn router<S, C, D, A>(state: Arc<AppState<S, C, D, A>>) -> Router
where
    S: FrameSender,
    C: Clock,
    D: SunDataSource,
    A: AudioStartRequester,
{
    Router::new()
        .route("/shades", get(shades::list_shades))
        .route("/shades/:id/command", post(shades::command))
        .route("/scenes", get(scenes::list_scenes))
        .route("/scenes/:name/execute", post(scenes::execute))
        .route("/retries", get(retries::list_active))
        .route("/retries/all", delete(retries::cancel_all))
        .route("/health", get(health::health))
        .route("/arduino/reconnect", post(arduino::reconnect))
        .route("/scheduler/status", get(scheduler::status))
        .route("/scheduler/wake-up", post(scheduler::set_wake_up).delete(scheduler::disable_wake_up))
        .route("/scheduler/wake-up/status", get(scheduler::wake_up_status))
        .route("/scheduler/trigger", post(scheduler::trigger))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(HANDLER_TIMEOUT),
        )
        .with_state(state)
}
