// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::sun::{SunError, SunEvents};
use async_trait::async_trait;
use duskline_core::{FakeClock, Shade, ShadeAction, ShadeId, ShadeRegistry, ShadeType};
use duskline_scenes::SceneRegistry;
use duskline_serial::SerialError;
use std::sync::atomic::{AtomicU32, Ordering};

struct CountingSender {
    calls: AtomicU32,
}

impl CountingSender {
    fn new() -> Self {
        Self { calls: AtomicU32::new(0) }
    }
    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSender for CountingSender {
    async fn send_single(&self, _shade_id: ShadeId, _action: ShadeAction, _timeout: Duration) -> Result<(), SerialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn send_group(&self, _group: &str, _action: ShadeAction, _timeout: Duration) -> Result<(), SerialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FixedSunSource {
    events: SunEvents,
}

#[async_trait]
impl SunDataSource for FixedSunSource {
    async fn fetch(&self, _date: chrono::NaiveDate, _tz: Tz) -> Result<SunEvents, SunError> {
        Ok(self.events)
    }
}

struct FlakySunSource {
    events: SunEvents,
    fail: Arc<std::sync::atomic::AtomicBool>,
}

#[async_trait]
impl SunDataSource for FlakySunSource {
    async fn fetch(&self, _date: chrono::NaiveDate, _tz: Tz) -> Result<SunEvents, SunError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(SunError::UpstreamUnavailable("simulated outage".into()))
        } else {
            Ok(self.events)
        }
    }
}

fn shades() -> Arc<ShadeRegistry> {
    Arc::new(ShadeRegistry::new(vec![Shade {
        id: ShadeId(1),
        name: "Living Room".into(),
        room: "living_room".into(),
        kind: ShadeType::Solar,
        group: None,
    }]))
}

fn scenes(dir: &std::path::Path) -> Arc<SceneRegistry> {
    let path = dir.join("scenes.json");
    std::fs::write(
        &path,
        r#"[
            {"name":"good_afternoon","steps":[{"shade_id":1,"action":"down","delay_ms_before":0}],"retry_count":0,"timeout_seconds":30},
            {"name":"good_evening","steps":[{"shade_id":1,"action":"down","delay_ms_before":0}],"retry_count":0,"timeout_seconds":30},
            {"name":"good_night","steps":[{"shade_id":1,"action":"down","delay_ms_before":0}],"retry_count":0,"timeout_seconds":30}
        ]"#,
    )
    .unwrap();
    Arc::new(SceneRegistry::load(path, &shades()).unwrap())
}

fn write_config(dir: &std::path::Path, away: bool) -> Arc<ConfigStore> {
    let path = dir.join("config.json");
    let doc = serde_json::json!({
        "location": {"timezone": "America/Denver", "lat": 39.7, "lon": -104.9},
        "scenes": {
            "good_afternoon_time": "13:00:00",
            "good_evening_offset_minutes": -30,
            "good_night_timing": "sunset_plus_offset"
        },
        "home_away": {"status": if away { "away" } else { "home" }, "away_periods": []},
        "wake_up": {"enabled": false, "time": "06:30:00", "good_morning_delay_minutes": 15},
        "music": {"enabled_for_morning": false, "enabled_for_evening": false},
    });
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    Arc::new(ConfigStore::load(path).unwrap())
}

fn write_config_civil_twilight(dir: &std::path::Path) -> Arc<ConfigStore> {
    let path = dir.join("config.json");
    let doc = serde_json::json!({
        "location": {"timezone": "America/Denver", "lat": 39.7, "lon": -104.9},
        "scenes": {
            "good_afternoon_time": "13:00:00",
            "good_evening_offset_minutes": -30,
            "good_night_timing": "civil_twilight_end"
        },
        "home_away": {"status": "home", "away_periods": []},
        "wake_up": {"enabled": false, "time": "06:30:00", "good_morning_delay_minutes": 15},
        "music": {"enabled_for_morning": false, "enabled_for_evening": false},
    });
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    Arc::new(ConfigStore::load(path).unwrap())
}

fn scheduler(
    dir: &std::path::Path,
    now: DateTime<Utc>,
    away: bool,
) -> (Arc<SceneScheduler<CountingSender, FakeClock, FixedSunSource>>, Arc<CountingSender>) {
    let sender = Arc::new(CountingSender::new());
    let clock = FakeClock::new(now);
    let retry = duskline_gateway::RetryEngine::new(sender.clone(), clock.clone());
    let config = write_config(dir, away);
    let gateway = Arc::new(ShadeCommandGateway::new(shades(), scenes(dir), retry));
    let events = SunEvents {
        sunrise: now - chrono::Duration::hours(4),
        sunset: now + chrono::Duration::hours(4),
        civil_twilight_end: now + chrono::Duration::hours(5),
    };
    let sun = Arc::new(CachingSunOracle::new(FixedSunSource { events }, 39.7, -104.9));
    let sched = SceneScheduler::new(gateway, config, sun, clock);
    (sched, sender)
}

#[tokio::test(start_paused = true)]
async fn materialize_arms_all_three_daily_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let now = chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 8, 0, 0).unwrap().with_timezone(&Utc);
    let (sched, _sender) = scheduler(dir.path(), now, false);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let status = sched.status();
    assert_eq!(status.job_count, 3);
}

#[tokio::test(start_paused = true)]
async fn materialize_replaces_jobs_without_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let now = chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 8, 0, 0).unwrap().with_timezone(&Utc);
    let (sched, _sender) = scheduler(dir.path(), now, false);
    sched.materialize().await;
    sched.materialize().await;
    assert_eq!(sched.status().job_count, 3);
}

#[tokio::test(start_paused = true)]
async fn missed_schedule_fires_once_on_startup_within_grace() {
    let dir = tempfile::tempdir().unwrap();
    // good_afternoon_time is 13:00 local; start the clock 5 minutes after.
    let now = chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 13, 5, 0).unwrap().with_timezone(&Utc);
    let (sched, sender) = scheduler(dir.path(), now, false);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(sender.call_count() >= 1);
    let status = sched.status();
    assert_eq!(status.job_count, 3);
}

#[tokio::test(start_paused = true)]
async fn away_gate_blocks_scheduled_fire() {
    let dir = tempfile::tempdir().unwrap();
    let now = chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 13, 5, 0).unwrap().with_timezone(&Utc);
    let (sched, sender) = scheduler(dir.path(), now, true);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(sender.call_count(), 0);
    assert!(sched.status().home_away_blocked_today);
}

#[tokio::test(start_paused = true)]
async fn good_night_falls_back_to_sunset_plus_thirty_on_outage() {
    let dir = tempfile::tempdir().unwrap();
    let now = chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 8, 0, 0).unwrap().with_timezone(&Utc);
    let events = SunEvents {
        sunrise: now - chrono::Duration::hours(4),
        sunset: now + chrono::Duration::hours(4),
        civil_twilight_end: now + chrono::Duration::hours(5),
    };
    let fail = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let source = FlakySunSource { events, fail: fail.clone() };
    let sun = Arc::new(CachingSunOracle::new(source, 39.7, -104.9));
    let sender = Arc::new(CountingSender::new());
    let clock = FakeClock::new(now);
    let retry = duskline_gateway::RetryEngine::new(sender.clone(), clock.clone());
    let config = write_config_civil_twilight(dir.path());
    let gateway = Arc::new(ShadeCommandGateway::new(shades(), scenes(dir.path()), retry));
    let sched = SceneScheduler::new(gateway, config, sun.clone(), clock);

    sched.materialize().await;
    let good_night_live = sched.status().next_fires.into_iter().find(|(n, _)| n.as_str() == "good_night").unwrap().1;
    assert_eq!(good_night_live, events.civil_twilight_end);

    fail.store(true, Ordering::SeqCst);
    sched.materialize().await;
    let good_night_fallback = sched.status().next_fires.into_iter().find(|(n, _)| n.as_str() == "good_night").unwrap().1;
    assert_eq!(good_night_fallback, events.sunset + chrono::Duration::minutes(30));
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_all_armed_jobs() {
    let dir = tempfile::tempdir().unwrap();
    let now = chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 8, 0, 0).unwrap().with_timezone(&Utc);
    let (sched, sender) = scheduler(dir.path(), now, false);
    tokio::time::sleep(Duration::from_millis(10)).await;
    sched.shutdown();
    tokio::time::sleep(Duration::from_secs(3600 * 24)).await;
    assert_eq!(sender.call_count(), 0);
}
