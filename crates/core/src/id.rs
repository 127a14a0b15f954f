// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes used throughout the core.

use serde::{Deserialize, Serialize};

/// Identity of a shade (`shade_id`). A plain positive integer — shades are
/// defined at config time and never created/destroyed at runtime, so there
/// is no need for an opaque generated id here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShadeId(pub u32);

impl std::fmt::Display for ShadeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ShadeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

crate::define_id! {
    /// Unique identifier for a retry task, generated on command acceptance.
    pub struct TaskId;
}

impl TaskId {
    /// Generate a fresh, unique task id.
    pub fn generate() -> Self {
        Self(nanoid::nanoid!(10))
    }
}

crate::define_id! {
    /// Unique identifier for a schedule entry (`schedule_id`).
    pub struct ScheduleId;
}

crate::define_id! {
    /// Name of a scene. Not generated — taken verbatim from the scene document.
    pub struct SceneName;
}
