// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Latest-command-wins retry engine: at most one live task per shade, each
//! bounded by a per-attempt and a task-level timeout, with a background
//! sweep that reaps tasks stuck well past their expected lifetime.

mod task;
mod zombie;

use crate::frame_sender::FrameSender;
use duskline_core::{
    Clock, RetryMetrics, RetryTaskSnapshot, RetryTerminalReason, ShadeAction, ShadeId, TaskId,
};
use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub(crate) const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
pub(crate) const TASK_TIMEOUT: Duration = Duration::from_secs(60);
const ZOMBIE_SUSPICION_AGE: Duration = Duration::from_secs(5 * 60);
const ZOMBIE_KILL_AGE: Duration = Duration::from_secs(60 * 60);
const ZOMBIE_TICK: Duration = Duration::from_secs(60);
const SUPERSEDE_TEARDOWN_BOUND: Duration = Duration::from_millis(500);

/// What a retry task sends on the wire, replayed identically on every
/// attempt. A group target fans a single firmware-side group move out to
/// every member shade's own task rather than introducing a second key space
/// in the live-task map (see the gateway crate's grounding notes).
#[derive(Debug, Clone)]
pub enum CommandTarget {
    Single,
    Group(String),
}

#[derive(Default)]
struct Metrics {
    total_zombies_detected: AtomicU64,
    total_zombies_cleaned: AtomicU64,
    total_timeout_kills: AtomicU64,
    current_warnings: AtomicU64,
}

impl Metrics {
    fn snapshot(&self) -> RetryMetrics {
        RetryMetrics {
            total_zombies_detected: self.total_zombies_detected.load(Ordering::SeqCst),
            total_zombies_cleaned: self.total_zombies_cleaned.load(Ordering::SeqCst),
            total_timeout_kills: self.total_timeout_kills.load(Ordering::SeqCst),
            current_warnings: self.current_warnings.load(Ordering::SeqCst),
        }
    }
}

struct LiveTask {
    task_id: TaskId,
    action: ShadeAction,
    issued_at: chrono::DateTime<chrono::Utc>,
    attempts_remaining: Arc<AtomicU32>,
    suspicious: Arc<AtomicBool>,
    cancel: CancellationToken,
    cancel_reason: Arc<SyncMutex<RetryTerminalReason>>,
    done_rx: oneshot::Receiver<()>,
}

type TaskMap = Arc<SyncMutex<HashMap<ShadeId, LiveTask>>>;

pub struct RetryEngine<S: FrameSender, C: Clock> {
    sender: Arc<S>,
    clock: C,
    tasks: TaskMap,
    metrics: Arc<Metrics>,
    zombie_cancel: CancellationToken,
}

impl<S: FrameSender, C: Clock> RetryEngine<S, C> {
    pub fn new(sender: Arc<S>, clock: C) -> Arc<Self> {
        let tasks: TaskMap = Arc::new(SyncMutex::new(HashMap::new()));
        let metrics = Arc::new(Metrics::default());
        let zombie_cancel = CancellationToken::new();

        tokio::spawn(zombie::run(
            tasks.clone(),
            metrics.clone(),
            clock.clone(),
            zombie_cancel.clone(),
            ZOMBIE_TICK,
            ZOMBIE_SUSPICION_AGE,
            ZOMBIE_KILL_AGE,
        ));

        Arc::new(Self { sender, clock, tasks, metrics, zombie_cancel })
    }

    /// Stop the background zombie sweep. Call during graceful shutdown;
    /// in-flight retry tasks are left to finish on their own.
    pub fn shutdown(&self) {
        self.zombie_cancel.cancel();
    }

    /// Submit a command for `shade_id`. Any existing live task for the same
    /// shade is cancelled and its teardown awaited (bounded) before this
    /// call returns — the map swap itself happens under the lock, the
    /// teardown wait happens outside it.
    pub async fn submit(
        &self,
        shade_id: ShadeId,
        action: ShadeAction,
        target: CommandTarget,
        attempts: u32,
    ) -> TaskId {
        let task_id = TaskId::generate();
        let cancel = CancellationToken::new();
        let cancel_reason = Arc::new(SyncMutex::new(RetryTerminalReason::Superseded));
        let attempts_remaining = Arc::new(AtomicU32::new(attempts));
        let suspicious = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = oneshot::channel();
        let issued_at = self.clock.now_utc();

        let ctx = task::RetryTaskCtx {
            task_id: task_id.clone(),
            shade_id,
            action,
            target,
            attempts,
            attempts_remaining: attempts_remaining.clone(),
            cancel: cancel.clone(),
            cancel_reason: cancel_reason.clone(),
            sender: self.sender.clone(),
            metrics: self.metrics.clone(),
            tasks: self.tasks.clone(),
            done_tx,
        };
        tokio::spawn(task::run(ctx));

        let entry = LiveTask {
            task_id: task_id.clone(),
            action,
            issued_at,
            attempts_remaining,
            suspicious,
            cancel,
            cancel_reason,
            done_rx,
        };

        let prior = {
            let mut map = self.tasks.lock();
            map.insert(shade_id, entry)
        };

        if let Some(prior) = prior {
            prior.cancel.cancel();
            let _ = tokio::time::timeout(SUPERSEDE_TEARDOWN_BOUND, prior.done_rx).await;
        }

        task_id
    }

    /// Cancel the live task for `shade_id`, if any. Returns `true` if a task
    /// was cancelled.
    pub async fn cancel(&self, shade_id: ShadeId) -> bool {
        let removed = {
            let mut map = self.tasks.lock();
            map.remove(&shade_id)
        };
        let Some(task) = removed else {
            return false;
        };
        *task.cancel_reason.lock() = RetryTerminalReason::ExplicitCancel;
        task.cancel.cancel();
        let _ = tokio::time::timeout(SUPERSEDE_TEARDOWN_BOUND, task.done_rx).await;
        true
    }

    /// Cancel every live task. Returns the number cancelled.
    pub async fn cancel_all(&self) -> usize {
        let removed: Vec<LiveTask> = {
            let mut map = self.tasks.lock();
            map.drain().map(|(_, task)| task).collect()
        };
        let count = removed.len();
        let waits = removed.into_iter().map(|task| async move {
            *task.cancel_reason.lock() = RetryTerminalReason::ExplicitCancel;
            task.cancel.cancel();
            let _ = tokio::time::timeout(SUPERSEDE_TEARDOWN_BOUND, task.done_rx).await;
        });
        futures_join_all(waits).await;
        debug!(count, "cancelled all live retry tasks");
        count
    }

    /// Read-only snapshot of every live task plus cumulative counters.
    pub fn snapshot(&self) -> (Vec<RetryTaskSnapshot>, RetryMetrics) {
        let now = self.clock.now_utc();
        let map = self.tasks.lock();
        let tasks = map
            .iter()
            .map(|(shade_id, task)| RetryTaskSnapshot {
                task_id: task.task_id.clone(),
                shade_id: *shade_id,
                action: task.action,
                age_ms: now
                    .signed_duration_since(task.issued_at)
                    .num_milliseconds()
                    .max(0) as u64,
                attempts_remaining: task.attempts_remaining.load(Ordering::SeqCst),
                suspicious: task.suspicious.load(Ordering::SeqCst),
            })
            .collect();
        (tasks, self.metrics.snapshot())
    }
}

/// Small local stand-in for `futures::future::join_all` so the crate does
/// not need to pull in the whole `futures` package for one call site.
async fn futures_join_all<F: std::future::Future<Output = ()> + Send + 'static>(
    iter: impl IntoIterator<Item = F>,
) {
    let mut handles = Vec::new();
    for fut in iter {
        handles.push(tokio::spawn(fut));
    }
    for handle in handles {
        let _ = handle.await;
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
