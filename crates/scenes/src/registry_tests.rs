// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use duskline_core::{Shade, ShadeId, ShadeType};

fn shades() -> ShadeRegistry {
    ShadeRegistry::new(vec![Shade {
        id: ShadeId(1),
        name: "Living Room".to_string(),
        room: "living".to_string(),
        kind: ShadeType::Privacy,
        group: Some("living".to_string()),
    }])
}

fn write_doc(dir: &std::path::Path, json: &str) -> PathBuf {
    let path = dir.join("scenes.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn loads_valid_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        dir.path(),
        r#"[{"name":"good_night","steps":[{"shade_id":1,"action":"down","delay_ms_before":0}],"retry_count":2,"timeout_seconds":60}]"#,
    );
    let reg = SceneRegistry::load(path, &shades()).unwrap();
    let scene = reg.get("good_night").unwrap();
    assert_eq!(scene.steps.len(), 1);
}

#[test]
fn unknown_scene_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(dir.path(), "[]");
    let reg = SceneRegistry::load(path, &shades()).unwrap();
    assert!(matches!(reg.get("nope"), Err(SceneError::NotFound(_))));
}

#[test]
fn rejects_unknown_shade_reference() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        dir.path(),
        r#"[{"name":"bad","steps":[{"shade_id":99,"action":"up","delay_ms_before":0}],"retry_count":0,"timeout_seconds":10}]"#,
    );
    let err = SceneRegistry::load(path, &shades()).unwrap_err();
    assert!(matches!(err, SceneError::Invalid(_)));
}

#[test]
fn rejects_retry_count_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        dir.path(),
        r#"[{"name":"bad","steps":[],"retry_count":9,"timeout_seconds":10}]"#,
    );
    let err = SceneRegistry::load(path, &shades()).unwrap_err();
    assert!(matches!(err, SceneError::Invalid(_)));
}

#[test]
fn reload_swaps_without_losing_prior_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_doc(
        dir.path(),
        r#"[{"name":"good_night","steps":[],"retry_count":0,"timeout_seconds":10}]"#,
    );
    let reg = SceneRegistry::load(&path, &shades()).unwrap();
    std::fs::write(&path, r#"[{"name":"bad","steps":[{"shade_id":99,"action":"up","delay_ms_before":0}],"retry_count":0,"timeout_seconds":10}]"#).unwrap();
    assert!(reg.reload(&shades()).is_err());
    // Previous scene is still present — reload failed atomically.
    assert!(reg.get("good_night").is_ok());
}
