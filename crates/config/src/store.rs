// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single JSON configuration document with atomic rename-over writes and
//! rotated backups.

use crate::error::ConfigError;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const MAX_BAK_FILES: u32 = 3;

/// Dotted key that writers outside the core must never touch directly.
const PROTECTED_KEY: &str = "wake_up.last_triggered";

pub struct ConfigStore {
    path: PathBuf,
    doc: RwLock<Value>,
}

impl ConfigStore {
    /// Load the document from `path`, or start from an empty object if the
    /// file does not exist yet (first run).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let doc = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            Value::Object(serde_json::Map::new())
        };
        Ok(Self { path, doc: RwLock::new(doc) })
    }

    /// Read a dotted key (`"location.timezone"`) and deserialize it as `T`.
    pub fn get<T: DeserializeOwned>(&self, dotted_key: &str) -> Result<T, ConfigError> {
        let doc = self.doc.read();
        let value = navigate(&doc, dotted_key).ok_or_else(|| ConfigError::MissingKey(dotted_key.to_string()))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn get_opt<T: DeserializeOwned>(&self, dotted_key: &str) -> Option<T> {
        self.get(dotted_key).ok()
    }

    /// Write a dotted key from any externally-reachable writer (the UI).
    /// Refuses to touch [`PROTECTED_KEY`].
    pub fn set<T: Serialize>(&self, dotted_key: &str, value: &T) -> Result<(), ConfigError> {
        if dotted_key == PROTECTED_KEY {
            return Err(ConfigError::ProtectedKey);
        }
        self.set_unchecked(dotted_key, value)
    }

    /// Privileged write available only to core components (the wake-up
    /// orchestrator setting `last_triggered` on fire).
    pub fn set_unchecked<T: Serialize>(&self, dotted_key: &str, value: &T) -> Result<(), ConfigError> {
        let json = serde_json::to_value(value)?;
        {
            let mut doc = self.doc.write();
            set_path(&mut doc, dotted_key, json);
        }
        self.persist()
    }

    /// Atomic rename-over write with up to `MAX_BAK_FILES` rotated backups.
    fn persist(&self) -> Result<(), ConfigError> {
        let doc = self.doc.read();
        let serialized = serde_json::to_string_pretty(&*doc)?;
        drop(doc);

        if self.path.exists() {
            rotate_backups(&self.path);
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serialized)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Reload from disk, discarding in-memory edits. Used after an external
    /// edit to the configuration file (e.g. manual operator edit).
    pub fn reload(&self) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(&self.path)?;
        let fresh: Value = serde_json::from_str(&raw)?;
        *self.doc.write() = fresh;
        info!(path = %self.path.display(), "configuration reloaded from disk");
        Ok(())
    }
}

fn rotate_backups(path: &Path) {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        if let Err(e) = fs::remove_file(&oldest) {
            warn!(error = %e, path = %oldest.display(), "failed to remove oldest config backup");
        }
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    if let Err(e) = fs::copy(path, bak(1)) {
        warn!(error = %e, "failed to rotate config backup");
    }
}

fn navigate<'a>(doc: &'a Value, dotted_key: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in dotted_key.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn set_path(doc: &mut Value, dotted_key: &str, value: Value) {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = doc;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(serde_json::Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        current = map.entry(segment.to_string()).or_insert_with(|| Value::Object(serde_json::Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(serde_json::Map::new());
    }
    if let Value::Object(map) = current {
        map.insert(last.to_string(), value);
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
