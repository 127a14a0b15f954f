// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shade command actions.

use serde::{Deserialize, Serialize};

/// `action` in `(shade_id, action)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadeAction {
    Up,
    Down,
    Stop,
}

crate::simple_display! {
    ShadeAction {
        Up => "up",
        Down => "down",
        Stop => "stop",
    }
}

impl ShadeAction {
    /// The single ASCII letter used in the serial line protocol:
    /// `u<id>` / `d<id>` / `s<id>`.
    pub fn wire_letter(self) -> char {
        match self {
            ShadeAction::Up => 'u',
            ShadeAction::Down => 'd',
            ShadeAction::Stop => 's',
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }
}
