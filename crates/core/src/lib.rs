// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain types shared by every duskline crate: ids, the `Clock`
//! abstraction, shade/scene/schedule/retry/audio vocabulary, the
//! configuration schema, and the cross-crate error envelope.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

#[macro_use]
mod macros;

pub mod action;
pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod retry;
pub mod scene;
pub mod schedule;
pub mod shade;

pub use action::ShadeAction;
pub use audio::{AudioSessionState, AudioStartupPath, AudioStartupResult, BluetoothStatus};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    AwayPeriod, GoodNightTiming, HomeAwayConfig, HomeAwayStatus, LocationConfig, MusicConfig,
    ScenesConfig, WakeUpConfig,
};
pub use error::{ApiError, ValidationError};
pub use id::{ScheduleId, SceneName, ShadeId, TaskId};
pub use retry::{RetryMetrics, RetryTaskSnapshot, RetryTerminalReason};
pub use scene::{Scene, SceneStep};
pub use schedule::{DaysOfWeek, ScheduleEntry, SunAnchor};
pub use shade::{Shade, ShadeRegistry, ShadeType};
