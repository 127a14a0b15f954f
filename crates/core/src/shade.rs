// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shade registry: identity, naming, and grouping.
//!
//! Shades are persistent, read-mostly, and defined in a config-time
//! registry — never created or destroyed at runtime.

use crate::id::ShadeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeType {
    Privacy,
    Solar,
    Blackout,
    Dimming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shade {
    pub id: ShadeId,
    pub name: String,
    pub room: String,
    #[serde(rename = "type")]
    pub kind: ShadeType,
    #[serde(default)]
    pub group: Option<String>,
}

/// Read-only, config-loaded set of known shades.
#[derive(Debug, Clone, Default)]
pub struct ShadeRegistry {
    by_id: HashMap<ShadeId, Shade>,
}

impl ShadeRegistry {
    pub fn new(shades: Vec<Shade>) -> Self {
        Self { by_id: shades.into_iter().map(|s| (s.id, s)).collect() }
    }

    pub fn get(&self, id: ShadeId) -> Option<&Shade> {
        self.by_id.get(&id)
    }

    pub fn contains(&self, id: ShadeId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Shade> {
        self.by_id.values()
    }

    /// Every shade that is a member of `group`, in ascending id order —
    /// used to fan out `scene:<group>,<u|d|s>` wire frames.
    pub fn in_group(&self, group: &str) -> Vec<ShadeId> {
        let mut ids: Vec<ShadeId> = self
            .by_id
            .values()
            .filter(|s| s.group.as_deref() == Some(group))
            .map(|s| s.id)
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
#[path = "shade_tests.rs"]
mod tests;
