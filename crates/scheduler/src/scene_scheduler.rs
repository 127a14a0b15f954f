// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daily scene scheduler: materializes `good_afternoon`, `good_evening`,
//! and `good_night` as one-shot timers every local midnight
//! (and at startup), running missed-schedule recovery before arming each
//! job for its next instant. `rise_n_shine`/`good_morning` are owned by
//! [`crate::wakeup::WakeUpOrchestrator`] and are never touched here.

use crate::jobs::{decide, nominal_fire_utc, DailyTrigger, FireDecision};
use crate::sun::{CachingSunOracle, SunDataSource};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use duskline_config::{ConfigSchema, ConfigStore};
use duskline_core::{Clock, GoodNightTiming, SunAnchor};
use duskline_gateway::{FrameSender, ShadeCommandGateway};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MIDNIGHT_MATERIALIZE_HOUR: u32 = 0;
const MIDNIGHT_MATERIALIZE_MINUTE: u32 = 5;

/// A point-in-time view of the scheduler's armed jobs, for `GET
/// /scheduler/status`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchedulerStatus {
    pub job_count: usize,
    pub next_fires: Vec<(String, DateTime<Utc>)>,
    pub home_away_blocked_today: bool,
}

pub struct SceneScheduler<S: FrameSender, C: Clock, D: SunDataSource> {
    gateway: Arc<ShadeCommandGateway<S, C>>,
    config: Arc<ConfigStore>,
    sun: Arc<CachingSunOracle<D>>,
    clock: C,
    jobs: parking_lot::Mutex<HashMap<&'static str, (CancellationToken, DateTime<Utc>)>>,
    materialize_cancel: CancellationToken,
}

impl<S: FrameSender, C: Clock, D: SunDataSource> SceneScheduler<S, C, D> {
    pub fn new(
        gateway: Arc<ShadeCommandGateway<S, C>>,
        config: Arc<ConfigStore>,
        sun: Arc<CachingSunOracle<D>>,
        clock: C,
    ) -> Arc<Self> {
        let this = Arc::new(Self {
            gateway,
            config,
            sun,
            clock,
            jobs: parking_lot::Mutex::new(HashMap::new()),
            materialize_cancel: CancellationToken::new(),
        });
        let driver = this.clone();
        tokio::spawn(async move { driver.run_midnight_loop().await });
        this
    }

    pub fn shutdown(&self) {
        self.materialize_cancel.cancel();
        for (_, (cancel, _)) in self.jobs.lock().drain() {
            cancel.cancel();
        }
    }

    fn schema(&self) -> ConfigSchema<'_> {
        ConfigSchema::new(&self.config)
    }

    fn timezone(&self) -> Option<Tz> {
        self.schema().location().ok()?.timezone.parse().ok()
    }

    async fn run_midnight_loop(self: Arc<Self>) {
        self.materialize().await;
        loop {
            let Some(tz) = self.timezone() else {
                tracing::error!("scheduler idle: no valid location.timezone configured");
                return;
            };
            let wait = duration_until_next_materialize(&self.clock, tz);
            tokio::select! {
                _ = self.materialize_cancel.cancelled() => return,
                _ = tokio::time::sleep(wait) => {}
            }
            self.materialize().await;
        }
    }

    /// Clear and rebuild the three daily jobs: recompute sun events,
    /// re-read scene timing config, run missed-schedule recovery, and arm
    /// each job for its next fire instant.
    pub async fn materialize(&self) {
        let Some(tz) = self.timezone() else {
            tracing::error!("cannot materialize schedule: invalid or missing location.timezone");
            return;
        };
        let scenes_timing = match self.schema().scenes_timing() {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "cannot materialize schedule: missing scene timing config");
                return;
            }
        };

        for (_, (cancel, _)) in self.jobs.lock().drain() {
            cancel.cancel();
        }

        let now = self.clock.now_utc();
        let today_date = now.with_timezone(&tz).date_naive();
        let tomorrow_date = today_date + chrono::Duration::days(1);
        let today_lookup = self.sun.lookup(today_date, tz, now).await;
        let tomorrow_lookup = self.sun.lookup(tomorrow_date, tz, now).await;

        let triggers: [(&'static str, DailyTrigger); 3] = [
            ("good_afternoon", DailyTrigger::FixedLocalTime(scenes_timing.good_afternoon_time)),
            (
                "good_evening",
                DailyTrigger::SunRelative {
                    anchor: SunAnchor::Sunset,
                    offset_minutes: scenes_timing.good_evening_offset_minutes,
                },
            ),
            ("good_night", DailyTrigger::good_night(scenes_timing.good_night_timing)),
        ];

        let good_night_on_civil_twilight = scenes_timing.good_night_timing == GoodNightTiming::CivilTwilightEnd;

        for (name, trigger) in triggers {
            let today_instant = if name == "good_night" && good_night_on_civil_twilight && today_lookup.fell_back {
                tracing::warn!(date = %today_date, "good_night anchor falling back to sunset + 30m");
                CachingSunOracle::<D>::sunset_plus_thirty(today_lookup.events)
            } else {
                nominal_fire_utc(trigger, tz, today_date, today_lookup.events)
            };
            let tomorrow_instant =
                if name == "good_night" && good_night_on_civil_twilight && tomorrow_lookup.fell_back {
                    tracing::warn!(date = %tomorrow_date, "good_night anchor falling back to sunset + 30m");
                    CachingSunOracle::<D>::sunset_plus_thirty(tomorrow_lookup.events)
                } else {
                    nominal_fire_utc(trigger, tz, tomorrow_date, tomorrow_lookup.events)
                };
            let last = self.schema().scene_last_executed(name);

            match decide(today_instant, tomorrow_instant, now, last) {
                FireDecision::RecoverNow { scheduled_for } => {
                    tracing::info!(scene = name, scheduled_for = %scheduled_for, "recovering missed schedule");
                    self.spawn_fire(name, tz, now);
                    self.arm(name, tomorrow_instant, tz);
                }
                FireDecision::ArmFor(at) => self.arm(name, at, tz),
            }
        }
    }

    /// Arm `name` to fire at `at`, tracked in the job table so a later
    /// `materialize()` or `shutdown()` can cancel it before it runs.
    fn arm(&self, name: &'static str, at: DateTime<Utc>, tz: Tz) {
        let cancel = CancellationToken::new();
        self.jobs.lock().insert(name, (cancel.clone(), at));
        let gateway = self.gateway.clone();
        let config = self.config.clone();
        let clock = self.clock.clone();
        let wait = (at - clock.now_utc()).to_std().unwrap_or(Duration::ZERO);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(wait) => {
                    fire_scene(&gateway, &config, &clock, tz, name).await;
                }
            }
        });
    }

    /// Fire `name` immediately in its own task (missed-schedule recovery),
    /// untracked in the job table since it completes almost instantly.
    fn spawn_fire(&self, name: &'static str, tz: Tz, _now: DateTime<Utc>) {
        let gateway = self.gateway.clone();
        let config = self.config.clone();
        let clock = self.clock.clone();
        tokio::spawn(async move { fire_scene(&gateway, &config, &clock, tz, name).await });
    }

    pub fn status(&self) -> SchedulerStatus {
        let jobs = self.jobs.lock();
        let next_fires = jobs.iter().map(|(name, (_, at))| (name.to_string(), *at)).collect();
        let home_away_blocked_today = self
            .timezone()
            .and_then(|tz| self.schema().home_away().ok().map(|c| (tz, c)))
            .map(|(tz, c)| c.blocks_scheduled_execution(self.clock.now_in(tz).date_naive()))
            .unwrap_or(false);
        SchedulerStatus { job_count: jobs.len(), next_fires, home_away_blocked_today }
    }
}

/// Executes `scene_name` through the gateway unless the home/away gate
/// blocks it, and records the fire so a restart's missed-schedule recovery
/// can tell it already ran.
async fn fire_scene<S: FrameSender, C: Clock>(
    gateway: &Arc<ShadeCommandGateway<S, C>>,
    config: &Arc<ConfigStore>,
    clock: &C,
    tz: Tz,
    scene_name: &str,
) {
    let schema = ConfigSchema::new(config);
    let today = clock.now_in(tz).date_naive();
    let blocked = schema.home_away().map(|c| c.blocks_scheduled_execution(today)).unwrap_or(false);
    if blocked {
        tracing::info!(scene = scene_name, event = "HomeAwayBlocked", "scheduled scene skipped by home/away gate");
        return;
    }
    match gateway.execute_scene(scene_name).await {
        Ok(task_ids) => {
            tracing::info!(scene = scene_name, accepted = task_ids.len(), "scheduled scene fired");
            if let Err(e) = schema.set_scene_last_executed(scene_name, clock.now_utc()) {
                tracing::warn!(scene = scene_name, error = %e, "failed to persist last-executed timestamp");
            }
        }
        Err(e) => tracing::warn!(scene = scene_name, error = %e, "scheduled scene execution failed"),
    }
}

fn duration_until_next_materialize<C: Clock>(clock: &C, tz: Tz) -> Duration {
    let now_local = clock.now_in(tz);
    let Some(naive_midnight) =
        now_local.date_naive().and_hms_opt(MIDNIGHT_MATERIALIZE_HOUR, MIDNIGHT_MATERIALIZE_MINUTE, 0)
    else {
        return Duration::from_secs(60);
    };
    let today_target = tz.from_local_datetime(&naive_midnight).single();
    let target = match today_target {
        Some(t) if t > now_local => t,
        Some(t) => t + chrono::Duration::days(1),
        None => now_local + chrono::Duration::days(1),
    };
    (target.with_timezone(&Utc) - clock.now_utc()).to_std().unwrap_or(Duration::from_secs(60))
}

#[cfg(test)]
#[path = "scene_scheduler_tests.rs"]
mod tests;
