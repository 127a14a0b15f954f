// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wake-up orchestrator: `Disarmed -> Armed(time) -> Firing ->
//! Disarmed`. A single cancellation token stands in for "armed or
//! firing"; `disable()` cancels it regardless of which phase is in flight.

use crate::audio_link::AudioStartRequester;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use duskline_config::{ConfigSchema, ConfigStore};
use duskline_core::Clock;
use duskline_gateway::{FrameSender, ShadeCommandGateway};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::SchedulerError;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WakeUpSetResult {
    pub enabled: bool,
    pub next_fire_local: DateTime<Tz>,
    pub next_fire_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WakeUpStatus {
    pub enabled: bool,
    pub time: NaiveTime,
    pub last_triggered: Option<DateTime<Utc>>,
    /// Formatted in the configured IANA zone regardless of system clock.
    pub next_wake_up_datetime: Option<DateTime<Tz>>,
}

pub struct WakeUpOrchestrator<S: FrameSender, C: Clock, A: AudioStartRequester> {
    gateway: Arc<ShadeCommandGateway<S, C>>,
    config: Arc<ConfigStore>,
    clock: C,
    audio: Arc<A>,
    armed: parking_lot::Mutex<Option<CancellationToken>>,
}

impl<S: FrameSender, C: Clock, A: AudioStartRequester> WakeUpOrchestrator<S, C, A> {
    pub fn new(gateway: Arc<ShadeCommandGateway<S, C>>, config: Arc<ConfigStore>, clock: C, audio: Arc<A>) -> Arc<Self> {
        let this = Arc::new(Self { gateway, config, clock, audio, armed: parking_lot::Mutex::new(None) });
        if let Ok(existing) = this.schema().wake_up() {
            if existing.enabled {
                this.arm_for_time(existing.time);
            }
        }
        this
    }

    fn schema(&self) -> ConfigSchema<'_> {
        ConfigSchema::new(&self.config)
    }

    fn timezone(&self) -> Result<Tz, SchedulerError> {
        let tz_name = self.schema().location().map_err(SchedulerError::Config)?.timezone;
        tz_name.parse().map_err(|_| SchedulerError::MalformedTime(tz_name))
    }

    /// Arm a new wake-up time, cancelling any previously armed/firing cycle.
    pub fn set(&self, time: NaiveTime) -> Result<WakeUpSetResult, SchedulerError> {
        self.cancel_armed();
        self.schema().set_wake_up_time(time)?;
        self.schema().set_wake_up_enabled(true)?;
        let (next_local, next_utc) = self.arm_for_time(time)?;
        Ok(WakeUpSetResult { enabled: true, next_fire_local: next_local, next_fire_utc: next_utc })
    }

    pub fn disable(&self) -> Result<WakeUpStatus, SchedulerError> {
        self.cancel_armed();
        self.schema().set_wake_up_enabled(false)?;
        self.status()
    }

    pub fn status(&self) -> Result<WakeUpStatus, SchedulerError> {
        let wake_up = self.schema().wake_up().map_err(SchedulerError::Config)?;
        let next_wake_up_datetime = if wake_up.enabled {
            self.timezone().ok().and_then(|tz| next_fire_after(&self.clock, tz, wake_up.time).ok())
        } else {
            None
        };
        Ok(WakeUpStatus {
            enabled: wake_up.enabled,
            time: wake_up.time,
            last_triggered: wake_up.last_triggered,
            next_wake_up_datetime,
        })
    }

    fn cancel_armed(&self) {
        if let Some(cancel) = self.armed.lock().take() {
            cancel.cancel();
        }
    }

    fn arm_for_time(&self, time: NaiveTime) -> Result<(DateTime<Tz>, DateTime<Utc>), SchedulerError> {
        let tz = self.timezone()?;
        let next_local = next_fire_after(&self.clock, tz, time)?;
        let next_utc = next_local.with_timezone(&Utc);

        let cancel = CancellationToken::new();
        *self.armed.lock() = Some(cancel.clone());

        let gateway = self.gateway.clone();
        let config = self.config.clone();
        let clock = self.clock.clone();
        let audio = self.audio.clone();
        let wait = (next_utc - clock.now_utc()).to_std().unwrap_or(Duration::ZERO);

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(wait) => {}
            }
            fire(gateway, config, clock, audio, tz, cancel).await;
        });

        Ok((next_local, next_utc))
    }
}

fn next_fire_after<C: Clock>(clock: &C, tz: Tz, time: NaiveTime) -> Result<DateTime<Tz>, SchedulerError> {
    let now_local = clock.now_in(tz);
    let today = now_local.date_naive();
    let Some(naive) = today.and_time(time).and_local_timezone(tz).single().or_else(|| {
        today.and_time(time).and_local_timezone(tz).earliest()
    }) else {
        return Err(SchedulerError::MalformedTime(time.to_string()));
    };
    if naive > now_local {
        Ok(naive)
    } else {
        let tomorrow = today + chrono::Duration::days(1);
        let Some(tomorrow_naive) = tomorrow.and_time(time).and_local_timezone(tz).single() else {
            return Err(SchedulerError::MalformedTime(time.to_string()));
        };
        Ok(tomorrow_naive)
    }
}

/// The six-step fire sequence. `cancel` continues to be observed during
/// the post-`rise_n_shine` delay, so an explicit `disable()`
/// mid-sequence skips `good_morning` but still records the fire.
async fn fire<S: FrameSender, C: Clock, A: AudioStartRequester>(
    gateway: Arc<ShadeCommandGateway<S, C>>,
    config: Arc<ConfigStore>,
    clock: C,
    audio: Arc<A>,
    tz: Tz,
    cancel: CancellationToken,
) {
    let schema = ConfigSchema::new(&config);
    let today = clock.now_in(tz).date_naive();
    let away_blocked = schema.home_away().map(|c| c.blocks_scheduled_execution(today)).unwrap_or(false);

    if away_blocked {
        tracing::info!(event = "HomeAwayBlocked", "wake-up suppressed by home/away gate; auto-disabling regardless");
    } else {
        if let Err(e) = gateway.execute_scene("rise_n_shine").await {
            tracing::warn!(error = %e, "rise_n_shine failed to launch");
        }

        let music_enabled = schema.music().map(|m| m.enabled_for_morning).unwrap_or(false);
        if music_enabled {
            if let Err(e) = audio.request_start("wake_up").await {
                tracing::warn!(error = %e, "audio start request failed, continuing wake-up sequence");
            }
        }

        let delay_minutes = schema.wake_up().map(|w| w.good_morning_delay_minutes).unwrap_or(15);
        let delay = Duration::from_secs((delay_minutes.max(0) as u64) * 60);
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("wake-up disabled during good_morning delay, skipping good_morning");
            }
            _ = tokio::time::sleep(delay) => {
                if let Err(e) = gateway.execute_scene("good_morning").await {
                    tracing::warn!(error = %e, "good_morning failed to launch");
                }
            }
        }
    }

    if let Err(e) = schema.set_wake_up_last_triggered(clock.now_utc()) {
        tracing::warn!(error = %e, "failed to persist wake_up.last_triggered");
    }
    if let Err(e) = schema.set_wake_up_enabled(false) {
        tracing::warn!(error = %e, "failed to persist wake_up.enabled=false");
    }
}

#[cfg(test)]
#[path = "wakeup_tests.rs"]
mod tests;
