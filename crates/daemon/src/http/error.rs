// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps every component crate's typed error onto the `{success, data,
//! error}` envelope, each with an appropriate HTTP status.

use super::Envelope;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use duskline_audio::AudioError;
use duskline_config::ConfigError;
use duskline_core::ApiError;
use duskline_gateway::GatewayError;
use duskline_scenes::SceneError;
use duskline_scheduler::SchedulerError;
use duskline_serial::SerialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Validation(#[from] duskline_core::ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serial(#[from] SerialError),
}

impl DaemonError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            DaemonError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DaemonError::Gateway(GatewayError::UnknownShade(_) | GatewayError::UnknownGroup(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            DaemonError::Gateway(GatewayError::Scene(e)) | DaemonError::Scene(e) => scene_status_and_code(e),
            DaemonError::Scheduler(SchedulerError::MalformedTime(_)) => (StatusCode::BAD_REQUEST, "validation_error"),
            DaemonError::Scheduler(SchedulerError::UnknownSchedule(_)) => {
                (StatusCode::NOT_FOUND, "validation_error")
            }
            DaemonError::Scheduler(SchedulerError::Gateway(e)) => {
                DaemonError::Gateway(clone_gateway(e)).status_and_code()
            }
            DaemonError::Scheduler(SchedulerError::Config(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            DaemonError::Audio(_) => (StatusCode::BAD_GATEWAY, "audio_startup_failed"),
            DaemonError::Config(ConfigError::ProtectedKey) => (StatusCode::FORBIDDEN, "protected_key"),
            DaemonError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            DaemonError::Serial(_) => (StatusCode::BAD_GATEWAY, "serial_error"),
        }
    }
}

fn scene_status_and_code(e: &SceneError) -> (StatusCode, &'static str) {
    match e {
        SceneError::NotFound(_) => (StatusCode::NOT_FOUND, "scene_not_found"),
        SceneError::Invalid(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_scene"),
        SceneError::Io(_) | SceneError::Json(_) => (StatusCode::INTERNAL_SERVER_ERROR, "scene_error"),
    }
}

/// `SchedulerError::Gateway` wraps a `GatewayError` we no longer own by
/// value once matched by reference; this rebuilds an owned copy purely to
/// reuse `status_and_code`'s single source of truth for gateway errors.
fn clone_gateway(e: &GatewayError) -> GatewayError {
    match e {
        GatewayError::UnknownShade(id) => GatewayError::UnknownShade(*id),
        GatewayError::UnknownGroup(g) => GatewayError::UnknownGroup(g.clone()),
        GatewayError::Scene(s) => GatewayError::Scene(clone_scene(s)),
    }
}

fn clone_scene(e: &SceneError) -> SceneError {
    match e {
        SceneError::NotFound(n) => SceneError::NotFound(n.clone()),
        SceneError::Invalid(n) => SceneError::Invalid(n.clone()),
        SceneError::Io(io) => SceneError::Io(std::io::Error::new(io.kind(), io.to_string())),
        SceneError::Json(_) => SceneError::Invalid("scene document parse error".to_string()),
    }
}

impl IntoResponse for DaemonError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(Envelope::<()> { success: false, data: None, error: Some(ApiError::new(code, self.to_string())) });
        (status, body).into_response()
    }
}
