// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scene definitions: an ordered sequence of shade actions with
//! inter-command delays and a per-scene retry budget. Immutable after load.

use crate::action::ShadeAction;
use crate::id::ShadeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStep {
    pub shade_id: ShadeId,
    pub action: ShadeAction,
    /// Delay before this step is issued, measured from the prior step's
    /// acceptance.
    #[serde(default)]
    pub delay_ms_before: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub name: String,
    pub steps: Vec<SceneStep>,
    #[serde(default = "default_retry_count")]
    pub retry_count: u8,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_retry_count() -> u8 {
    2
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Scene {
    /// Validate referential integrity and bounds: every `shade_id` exists,
    /// delays are non-negative (`u64`, trivially true — kept as an
    /// explicit check for a future signed-delay format), `retry_count` is
    /// within `[0, 5]`.
    pub fn validate(&self, known_shades: impl Fn(ShadeId) -> bool) -> Result<(), String> {
        if self.retry_count > 5 {
            return Err(format!(
                "scene '{}': retry_count {} out of range [0, 5]",
                self.name, self.retry_count
            ));
        }
        for step in &self.steps {
            if !known_shades(step.shade_id) {
                return Err(format!(
                    "scene '{}': unknown shade_id {}",
                    self.name, step.shade_id
                ));
            }
        }
        Ok(())
    }
}
