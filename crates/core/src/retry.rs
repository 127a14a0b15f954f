// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared retry-task vocabulary. The retry engine itself lives in
//! `duskline-gateway`; these are the cross-crate-visible types (HTTP
//! snapshots, metrics) that do not need the engine's internals.

use crate::action::ShadeAction;
use crate::id::{ShadeId, TaskId};
use serde::{Deserialize, Serialize};

/// Why a retry task reached a terminal state. A closed sum type in place
/// of ad-hoc cancel-reason strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryTerminalReason {
    Completed,
    /// A newer command for the same shade superseded this one.
    Superseded,
    /// The whole task exceeded `TASK_TIMEOUT` (60s).
    TaskTimeout,
    /// The zombie monitor force-cancelled a task older than 1h.
    ZombieReaped,
    /// Cancelled via `DELETE /retries/all` or a scene-level timeout.
    ExplicitCancel,
    /// All attempts were consumed without a successful acknowledgement, and
    /// the task was not cancelled or reaped.
    AttemptsExhausted,
}

crate::simple_display! {
    RetryTerminalReason {
        Completed => "completed",
        Superseded => "superseded",
        TaskTimeout => "task_timeout",
        ZombieReaped => "zombie_reaped",
        ExplicitCancel => "explicit_cancel",
        AttemptsExhausted => "attempts_exhausted",
    }
}

/// Read-only snapshot of a live task, as returned by `list_active()`/`GET /retries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryTaskSnapshot {
    pub task_id: TaskId,
    pub shade_id: ShadeId,
    pub action: ShadeAction,
    pub age_ms: u64,
    pub attempts_remaining: u32,
    pub suspicious: bool,
}

/// Cumulative counters exposed by the retry engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RetryMetrics {
    pub total_zombies_detected: u64,
    pub total_zombies_cleaned: u64,
    pub total_timeout_kills: u64,
    pub current_warnings: u64,
}
