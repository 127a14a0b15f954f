// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The ASCII line protocol to the firmware. Frames are opaque to the
//! transport layer; encoding the shade-specific bit patterns is this
//! gateway-facing module's job, not the transport's.

use duskline_core::{ShadeAction, ShadeId};

/// `u<id>` / `d<id>` / `s<id>`.
pub fn single(shade_id: ShadeId, action: ShadeAction) -> String {
    format!("{}{}", action.wire_letter(), shade_id.0)
}

/// `scene:<group>,<u|d|s>`.
pub fn group(group: &str, action: ShadeAction) -> String {
    format!("scene:{group},{}", action.wire_letter())
}
