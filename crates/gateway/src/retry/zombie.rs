// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background sweep over live tasks: flag ones stuck well past their
//! expected lifetime, kill the ones stuck far longer than that.

use super::{Metrics, TaskMap};
use duskline_core::{Clock, RetryTerminalReason};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[allow(clippy::too_many_arguments)]
pub(super) async fn run<C: Clock>(
    tasks: TaskMap,
    metrics: Arc<Metrics>,
    clock: C,
    cancel: CancellationToken,
    tick: Duration,
    suspicion_age: Duration,
    kill_age: Duration,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = interval.tick() => {}
        }
        sweep_once(&tasks, &metrics, &clock, suspicion_age, kill_age);
    }
}

fn sweep_once<C: Clock>(
    tasks: &TaskMap,
    metrics: &Arc<Metrics>,
    clock: &C,
    suspicion_age: Duration,
    kill_age: Duration,
) {
    let now = clock.now_utc();
    let mut warnings = 0u64;
    let mut killed = Vec::new();

    {
        let mut map = tasks.lock();
        let stale: Vec<_> = map
            .iter()
            .filter_map(|(shade_id, task)| {
                let age = now
                    .signed_duration_since(task.issued_at)
                    .to_std()
                    .unwrap_or_default();
                if age >= kill_age {
                    Some(*shade_id)
                } else {
                    None
                }
            })
            .collect();

        for shade_id in stale {
            if let Some(task) = map.remove(&shade_id) {
                *task.cancel_reason.lock() = RetryTerminalReason::ZombieReaped;
                task.cancel.cancel();
                killed.push(shade_id);
            }
        }

        for (shade_id, task) in map.iter() {
            let age = now
                .signed_duration_since(task.issued_at)
                .to_std()
                .unwrap_or_default();
            if age >= suspicion_age {
                if !task.suspicious.swap(true, Ordering::SeqCst) {
                    metrics.total_zombies_detected.fetch_add(1, Ordering::SeqCst);
                    warn!(%shade_id, age_secs = age.as_secs(), "retry task flagged suspicious");
                }
                warnings += 1;
            }
        }
    }

    if !killed.is_empty() {
        metrics
            .total_zombies_cleaned
            .fetch_add(killed.len() as u64, Ordering::SeqCst);
        for shade_id in killed {
            warn!(%shade_id, "retry task reaped as zombie");
        }
    }
    metrics.current_warnings.store(warnings, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use duskline_core::{FakeClock, RetryTerminalReason, ShadeAction, ShadeId, TaskId};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU32};
    use tokio::sync::oneshot;

    fn make_task(task_id: &str, issued_at: chrono::DateTime<chrono::Utc>) -> super::super::LiveTask {
        let (_tx, rx) = oneshot::channel();
        super::super::LiveTask {
            task_id: TaskId::from(task_id),
            action: ShadeAction::Down,
            issued_at,
            attempts_remaining: Arc::new(AtomicU32::new(3)),
            suspicious: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
            cancel_reason: Arc::new(parking_lot::Mutex::new(RetryTerminalReason::Superseded)),
            done_rx: rx,
        }
    }

    #[test]
    fn flags_suspicious_past_suspicion_age() {
        let clock = FakeClock::new(chrono::Utc::now());
        let tasks: TaskMap = Arc::new(parking_lot::Mutex::new(HashMap::new()));
        tasks.lock().insert(ShadeId(1), make_task("t1", clock.now_utc()));
        let metrics = Arc::new(Metrics::default());

        clock.advance(chrono::Duration::seconds(301));
        sweep_once(&tasks, &metrics, &clock, Duration::from_secs(300), Duration::from_secs(3600));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_zombies_detected, 1);
        assert_eq!(snapshot.current_warnings, 1);
        assert!(tasks.lock().get(&ShadeId(1)).unwrap().suspicious.load(Ordering::SeqCst));
    }

    #[test]
    fn kills_past_kill_age() {
        let clock = FakeClock::new(chrono::Utc::now());
        let tasks: TaskMap = Arc::new(parking_lot::Mutex::new(HashMap::new()));
        tasks.lock().insert(ShadeId(2), make_task("t2", clock.now_utc()));
        let metrics = Arc::new(Metrics::default());

        clock.advance(chrono::Duration::seconds(3601));
        sweep_once(&tasks, &metrics, &clock, Duration::from_secs(300), Duration::from_secs(3600));

        assert!(tasks.lock().get(&ShadeId(2)).is_none());
        assert_eq!(metrics.snapshot().total_zombies_cleaned, 1);
    }

    #[test]
    fn leaves_fresh_tasks_untouched() {
        let clock = FakeClock::new(chrono::Utc::now());
        let tasks: TaskMap = Arc::new(parking_lot::Mutex::new(HashMap::new()));
        tasks.lock().insert(ShadeId(3), make_task("t3", clock.now_utc()));
        let metrics = Arc::new(Metrics::default());

        clock.advance(chrono::Duration::seconds(5));
        sweep_once(&tasks, &metrics, &clock, Duration::from_secs(300), Duration::from_secs(3600));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_zombies_detected, 0);
        assert_eq!(snapshot.current_warnings, 0);
        assert!(tasks.lock().contains_key(&ShadeId(3)));
    }
}
