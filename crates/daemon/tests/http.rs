// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use duskline_config::ConfigStore;
use duskline_core::{Clock, FakeClock, Shade, ShadeId, ShadeRegistry, ShadeType};
use duskline_daemon::http;
use duskline_daemon::state::AppState;
use duskline_gateway::{RetryEngine, SerialFrameSender, ShadeCommandGateway};
use duskline_scenes::SceneRegistry;
use duskline_scheduler::{AudioStartRequester, CachingSunOracle, SceneScheduler, SunDataSource, SunError, SunEvents, WakeUpOrchestrator};
use duskline_serial::link::fake::{FakeBehavior, FakePortFactory};
use duskline_serial::SerialTransport;
use std::sync::Arc;
use tower::ServiceExt;

struct FixedSun;

#[async_trait]
impl SunDataSource for FixedSun {
    async fn fetch(&self, _date: NaiveDate, _tz: Tz) -> Result<SunEvents, SunError> {
        let now = Utc::now();
        Ok(SunEvents { sunrise: now, sunset: now, civil_twilight_end: now })
    }
}

struct AlwaysOkAudio;

#[async_trait]
impl AudioStartRequester for AlwaysOkAudio {
    async fn request_start(&self, _trigger_source: &str) -> Result<(), String> {
        Ok(())
    }
}

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("config.json");
    std::fs::write(
        &path,
        r#"{
            "location": {"timezone": "UTC", "lat": 40.0, "lon": -74.0},
            "scenes": {
                "good_afternoon_time": "13:00:00",
                "good_evening_offset_minutes": 0,
                "good_night_timing": "civil_twilight_end"
            },
            "wake_up": {"enabled": false, "time": "07:00:00", "good_morning_delay_minutes": 15},
            "home_away": {"status": "home"},
            "music": {"enabled_for_morning": false, "enabled_for_evening": false},
            "shades": []
        }"#,
    )
    .unwrap();
    path
}

fn write_scenes(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("scenes.json");
    std::fs::write(
        &path,
        r#"[{"name":"good_night","steps":[{"shade_id":1,"action":"down","delay_ms_before":0}],"retry_count":1,"timeout_seconds":30}]"#,
    )
    .unwrap();
    path
}

fn build_router() -> (axum::Router, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = Arc::new(ConfigStore::load(write_config(dir.path())).unwrap());
    let shades = Arc::new(ShadeRegistry::new(vec![Shade {
        id: ShadeId(1),
        name: "Living".into(),
        room: "living".into(),
        kind: ShadeType::Privacy,
        group: Some("living".into()),
    }]));
    let scenes = Arc::new(SceneRegistry::load(write_scenes(dir.path()), &shades).unwrap());

    let factory = Arc::new(FakePortFactory::new(FakeBehavior::Ack(b"OK".to_vec())));
    let transport = Arc::new(SerialTransport::new(vec!["/dev/ttyFAKE0".to_string()], factory));
    let frame_sender = Arc::new(SerialFrameSender::new(transport.clone()));
    let clock = FakeClock::new(Utc::now());
    let retry = RetryEngine::new(frame_sender, clock.clone());
    let gateway = Arc::new(ShadeCommandGateway::new(shades.clone(), scenes.clone(), retry));

    let sun = Arc::new(CachingSunOracle::new(FixedSun, 40.0, -74.0));
    let scheduler = SceneScheduler::new(gateway.clone(), config.clone(), sun, clock.clone());
    let wakeup = WakeUpOrchestrator::new(gateway.clone(), config.clone(), clock.clone(), Arc::new(AlwaysOkAudio));

    let state = Arc::new(AppState {
        gateway,
        scheduler,
        wakeup,
        transport,
        shades,
        scenes,
        started_at: clock.now_utc(),
        clock,
    });
    (http::router(state), dir.into_path())
}

#[tokio::test]
async fn health_returns_envelope() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert!(json["data"]["arduino_connected"].as_bool().unwrap());
    assert!(json["data"]["uptime_s"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn list_shades_returns_configured_shade() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(Request::builder().uri("/shades").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"][0]["name"], "Living");
}

#[tokio::test]
async fn command_on_unknown_shade_maps_to_validation_error() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shades/99/command")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"action":"up"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn command_on_known_shade_accepts() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shades/1/command")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"action":"up"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["data"]["task_id"].as_str().is_some());
}

#[tokio::test]
async fn scheduler_status_returns_job_count() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(Request::builder().uri("/scheduler/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn set_wake_up_with_malformed_time_is_rejected() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scheduler/wake-up")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"time":"not-a-time"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_scene_execute_returns_404() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scenes/nonexistent/execute")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn set_wake_up_with_valid_time_arms_orchestrator() {
    let (router, _dir) = build_router();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/scheduler/wake-up")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"time":"06:30"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["enabled"], true);
}
