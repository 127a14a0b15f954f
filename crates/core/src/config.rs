// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed views over the configuration document's dotted keys.
//! `duskline-config` owns reading/writing the underlying JSON; these types
//! are the shared schema every component deserializes into.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub timezone: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoodNightTiming {
    CivilTwilightEnd,
    SunsetPlusOffset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenesConfig {
    pub good_afternoon_time: NaiveTime,
    pub good_evening_offset_minutes: i32,
    pub good_night_timing: GoodNightTiming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeUpConfig {
    pub enabled: bool,
    pub time: NaiveTime,
    pub good_morning_delay_minutes: i64,
    #[serde(default)]
    pub last_triggered: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeAwayStatus {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwayPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AwayPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeAwayConfig {
    pub status: HomeAwayStatus,
    #[serde(default)]
    pub away_periods: Vec<AwayPeriod>,
}

impl HomeAwayConfig {
    /// The away gate predicate: scheduled fires are skipped when status is
    /// away, or today falls within any inclusive away period.
    pub fn blocks_scheduled_execution(&self, today: NaiveDate) -> bool {
        self.status == HomeAwayStatus::Away
            || self.away_periods.iter().any(|p| p.contains(today))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicConfig {
    pub enabled_for_morning: bool,
    pub enabled_for_evening: bool,
}
