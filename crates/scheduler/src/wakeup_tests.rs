// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use duskline_core::{FakeClock, Shade, ShadeAction, ShadeId, ShadeRegistry, ShadeType};
use duskline_scenes::SceneRegistry;
use duskline_serial::SerialError;
use std::sync::atomic::{AtomicU32, Ordering};

struct AlwaysOkSender {
    calls: AtomicU32,
}

impl AlwaysOkSender {
    fn new() -> Self {
        Self { calls: AtomicU32::new(0) }
    }
    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameSender for AlwaysOkSender {
    async fn send_single(&self, _shade_id: ShadeId, _action: ShadeAction, _timeout: Duration) -> Result<(), SerialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn send_group(&self, _group: &str, _action: ShadeAction, _timeout: Duration) -> Result<(), SerialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct CountingAudio {
    starts: AtomicU32,
}

impl CountingAudio {
    fn new() -> Self {
        Self { starts: AtomicU32::new(0) }
    }
}

#[async_trait]
impl AudioStartRequester for CountingAudio {
    async fn request_start(&self, _trigger_source: &str) -> Result<(), String> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn shades() -> Arc<ShadeRegistry> {
    Arc::new(ShadeRegistry::new(vec![Shade {
        id: ShadeId(1),
        name: "Bedroom".into(),
        room: "bedroom".into(),
        kind: ShadeType::Privacy,
        group: None,
    }]))
}

fn scenes(dir: &std::path::Path) -> Arc<SceneRegistry> {
    let path = dir.join("scenes.json");
    std::fs::write(
        &path,
        r#"[
            {"name":"rise_n_shine","steps":[{"shade_id":1,"action":"up","delay_ms_before":0}],"retry_count":0,"timeout_seconds":30},
            {"name":"good_morning","steps":[{"shade_id":1,"action":"up","delay_ms_before":0}],"retry_count":0,"timeout_seconds":30}
        ]"#,
    )
    .unwrap();
    Arc::new(SceneRegistry::load(path, &shades()).unwrap())
}

fn write_config(dir: &std::path::Path, enabled_for_morning: bool, away: bool) -> Arc<ConfigStore> {
    let path = dir.join("config.json");
    let doc = serde_json::json!({
        "location": {"timezone": "America/Denver", "lat": 39.7, "lon": -104.9},
        "wake_up": {"enabled": false, "time": "06:30:00", "good_morning_delay_minutes": 0},
        "home_away": {"status": if away { "away" } else { "home" }, "away_periods": []},
        "music": {"enabled_for_morning": enabled_for_morning, "enabled_for_evening": false},
    });
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
    Arc::new(ConfigStore::load(path).unwrap())
}

fn orchestrator(
    dir: &std::path::Path,
    enabled_for_morning: bool,
    away: bool,
) -> (Arc<WakeUpOrchestrator<AlwaysOkSender, FakeClock, CountingAudio>>, Arc<AlwaysOkSender>, Arc<CountingAudio>) {
    let sender = Arc::new(AlwaysOkSender::new());
    let clock = FakeClock::new(chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 6, 0, 0).unwrap().with_timezone(&Utc));
    let retry = duskline_gateway::RetryEngine::new(sender.clone(), clock.clone());
    let config = write_config(dir, enabled_for_morning, away);
    let gateway = Arc::new(ShadeCommandGateway::new(shades(), scenes(dir), retry));
    let audio = Arc::new(CountingAudio::new());
    let orch = WakeUpOrchestrator::new(gateway, config, clock, audio.clone());
    (orch, sender, audio)
}

#[tokio::test(start_paused = true)]
async fn set_arms_for_today_when_time_is_still_ahead() {
    let dir = tempfile::tempdir().unwrap();
    let (orch, _sender, _audio) = orchestrator(dir.path(), false, false);
    let result = orch.set(NaiveTime::from_hms_opt(9, 0, 0).unwrap()).unwrap();
    assert!(result.enabled);
    assert_eq!(result.next_fire_local.date_naive(), chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 27, 0, 0, 0).unwrap().date_naive());
}

#[tokio::test(start_paused = true)]
async fn set_arms_for_tomorrow_when_time_already_passed() {
    let dir = tempfile::tempdir().unwrap();
    let (orch, _sender, _audio) = orchestrator(dir.path(), false, false);
    let result = orch.set(NaiveTime::from_hms_opt(3, 0, 0).unwrap()).unwrap();
    assert_eq!(result.next_fire_local.date_naive(), chrono_tz::America::Denver.with_ymd_and_hms(2026, 7, 28, 0, 0, 0).unwrap().date_naive());
}

#[tokio::test(start_paused = true)]
async fn full_fire_sequence_runs_both_scenes_and_auto_disables() {
    let dir = tempfile::tempdir().unwrap();
    let (orch, sender, audio) = orchestrator(dir.path(), true, false);
    orch.set(NaiveTime::from_hms_opt(6, 1, 0).unwrap()).unwrap();

    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(sender.call_count(), 2);
    assert_eq!(audio.starts.load(Ordering::SeqCst), 1);
    let status = orch.status().unwrap();
    assert!(!status.enabled);
    assert!(status.last_triggered.is_some());
}

#[tokio::test(start_paused = true)]
async fn away_gate_skips_scenes_but_still_auto_disables() {
    let dir = tempfile::tempdir().unwrap();
    let (orch, sender, audio) = orchestrator(dir.path(), true, true);
    orch.set(NaiveTime::from_hms_opt(6, 1, 0).unwrap()).unwrap();

    tokio::time::sleep(Duration::from_secs(120)).await;

    assert_eq!(sender.call_count(), 0);
    assert_eq!(audio.starts.load(Ordering::SeqCst), 0);
    let status = orch.status().unwrap();
    assert!(!status.enabled);
    assert!(status.last_triggered.is_some());
}

#[tokio::test(start_paused = true)]
async fn disable_cancels_armed_alarm_before_it_fires() {
    let dir = tempfile::tempdir().unwrap();
    let (orch, sender, _audio) = orchestrator(dir.path(), true, false);
    orch.set(NaiveTime::from_hms_opt(9, 0, 0).unwrap()).unwrap();
    orch.disable().unwrap();

    tokio::time::sleep(Duration::from_secs(3600 * 4)).await;

    assert_eq!(sender.call_count(), 0);
}
