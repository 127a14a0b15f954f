// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scene registry: loads scene definitions at startup and on explicit
//! reload, validating referential integrity against the shade registry.
//! Reload is a side-build-then-swap, never an in-place mutation.

use crate::error::SceneError;
use duskline_core::{Scene, ShadeRegistry};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct SceneRegistry {
    path: PathBuf,
    scenes: RwLock<HashMap<String, Scene>>,
}

impl SceneRegistry {
    pub fn load(path: impl Into<PathBuf>, shades: &ShadeRegistry) -> Result<Self, SceneError> {
        let path = path.into();
        let scenes = load_and_validate(&path, shades)?;
        info!(count = scenes.len(), "loaded scene registry");
        Ok(Self { path, scenes: RwLock::new(scenes) })
    }

    /// Re-read the document from disk and atomically swap the in-memory
    /// map. On validation failure the previous registry is left untouched
    /// and the error is returned.
    pub fn reload(&self, shades: &ShadeRegistry) -> Result<(), SceneError> {
        let fresh = load_and_validate(&self.path, shades)?;
        *self.scenes.write() = fresh;
        info!("scene registry reloaded");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Scene, SceneError> {
        self.scenes.read().get(name).cloned().ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    pub fn list(&self) -> Vec<Scene> {
        self.scenes.read().values().cloned().collect()
    }
}

fn load_and_validate(path: &Path, shades: &ShadeRegistry) -> Result<HashMap<String, Scene>, SceneError> {
    let raw = std::fs::read_to_string(path)?;
    let scenes: Vec<Scene> = serde_json::from_str(&raw)?;
    for scene in &scenes {
        scene.validate(|id| shades.contains(id)).map_err(SceneError::Invalid)?;
    }
    Ok(scenes.into_iter().map(|s| (s.name.clone(), s)).collect())
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
