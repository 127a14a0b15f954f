// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule entries: a closed sum type of tagged variants rather than
//! dynamic dispatch.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SunAnchor {
    Sunrise,
    Sunset,
    CivilTwilightEnd,
}

/// Bitset over Mon..Sun, following `chrono::Weekday::num_days_from_monday`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaysOfWeek(pub u8);

impl DaysOfWeek {
    pub const ALL: DaysOfWeek = DaysOfWeek(0b0111_1111);

    pub fn contains(&self, day: chrono::Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ScheduleEntry {
    FixedTime {
        id: crate::id::ScheduleId,
        scene_name: String,
        time: NaiveTime,
        days: DaysOfWeek,
        #[serde(default)]
        last_executed_at: Option<DateTime<Utc>>,
    },
    SunRelative {
        id: crate::id::ScheduleId,
        scene_name: String,
        anchor: SunAnchor,
        offset_minutes: i32,
        days: DaysOfWeek,
        #[serde(default)]
        last_executed_at: Option<DateTime<Utc>>,
    },
    WakeUp {
        id: crate::id::ScheduleId,
        time: NaiveTime,
        enabled: bool,
        #[serde(default)]
        last_triggered_at: Option<DateTime<Utc>>,
    },
}

impl ScheduleEntry {
    pub fn id(&self) -> &crate::id::ScheduleId {
        match self {
            ScheduleEntry::FixedTime { id, .. }
            | ScheduleEntry::SunRelative { id, .. }
            | ScheduleEntry::WakeUp { id, .. } => id,
        }
    }

    pub fn last_executed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            ScheduleEntry::FixedTime { last_executed_at, .. }
            | ScheduleEntry::SunRelative { last_executed_at, .. } => *last_executed_at,
            ScheduleEntry::WakeUp { last_triggered_at, .. } => *last_triggered_at,
        }
    }
}
