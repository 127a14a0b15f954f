// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The body of a single retry task: attempt, back off, attempt again, all
//! racing against cancellation and a task-level deadline.

use super::{CommandTarget, TaskMap, ATTEMPT_TIMEOUT, TASK_TIMEOUT};
use crate::frame_sender::FrameSender;
use duskline_core::{RetryTerminalReason, ShadeAction, ShadeId, TaskId};
use parking_lot::Mutex as SyncMutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const BASE_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF: Duration = Duration::from_secs(4);

pub(super) struct RetryTaskCtx<S: FrameSender> {
    pub task_id: TaskId,
    pub shade_id: ShadeId,
    pub action: ShadeAction,
    pub target: CommandTarget,
    pub attempts: u32,
    pub attempts_remaining: Arc<AtomicU32>,
    pub cancel: CancellationToken,
    pub cancel_reason: Arc<SyncMutex<RetryTerminalReason>>,
    pub sender: Arc<S>,
    pub metrics: Arc<super::Metrics>,
    pub tasks: TaskMap,
    pub done_tx: oneshot::Sender<()>,
}

fn backoff_for(attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(6);
    let millis = BASE_BACKOFF_MS.saturating_mul(1u64 << shift);
    Duration::from_millis(millis).min(MAX_BACKOFF)
}

async fn run_attempts<S: FrameSender>(ctx: &RetryTaskCtx<S>) -> RetryTerminalReason {
    for attempt in 1..=ctx.attempts {
        if ctx.cancel.is_cancelled() {
            return *ctx.cancel_reason.lock();
        }

        let send_fut = match &ctx.target {
            CommandTarget::Single => {
                ctx.sender.send_single(ctx.shade_id, ctx.action, ATTEMPT_TIMEOUT)
            }
            CommandTarget::Group(group) => {
                ctx.sender.send_group(group, ctx.action, ATTEMPT_TIMEOUT)
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => return *ctx.cancel_reason.lock(),
            result = send_fut => {
                match result {
                    Ok(()) => return RetryTerminalReason::Completed,
                    Err(error) => {
                        warn!(shade_id = %ctx.shade_id, attempt, %error, "retry attempt failed");
                        ctx.attempts_remaining.fetch_sub(1, Ordering::SeqCst);
                    }
                }
            }
        }

        if attempt < ctx.attempts {
            tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => return *ctx.cancel_reason.lock(),
                _ = tokio::time::sleep(backoff_for(attempt)) => {}
            }
        }
    }
    RetryTerminalReason::AttemptsExhausted
}

pub(super) async fn run<S: FrameSender>(ctx: RetryTaskCtx<S>) {
    let reason = match tokio::time::timeout(TASK_TIMEOUT, run_attempts(&ctx)).await {
        Ok(reason) => reason,
        Err(_) => {
            ctx.metrics
                .total_timeout_kills
                .fetch_add(1, Ordering::SeqCst);
            RetryTerminalReason::TaskTimeout
        }
    };

    info!(
        shade_id = %ctx.shade_id,
        task_id = %ctx.task_id,
        %reason,
        "retry task finished"
    );

    {
        let mut map = ctx.tasks.lock();
        if let Some(current) = map.get(&ctx.shade_id) {
            if current.task_id == ctx.task_id {
                map.remove(&ctx.shade_id);
            }
        }
    }

    let _ = ctx.done_tx.send(());
}
