// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use duskline_core::ScheduleId;
use duskline_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("unknown schedule_id {0}")]
    UnknownSchedule(ScheduleId),

    #[error("malformed time '{0}', expected HH:MM")]
    MalformedTime(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Config(#[from] duskline_config::ConfigError),
}
