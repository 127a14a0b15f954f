// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed accessors for every dotted key in the configuration document, over
//! a [`ConfigStore`](crate::store::ConfigStore).

use crate::error::ConfigError;
use crate::store::ConfigStore;
use chrono::{DateTime, Utc};
use duskline_core::{HomeAwayConfig, LocationConfig, MusicConfig, ScenesConfig, WakeUpConfig};

pub struct ConfigSchema<'a> {
    store: &'a ConfigStore,
}

impl<'a> ConfigSchema<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    pub fn location(&self) -> Result<LocationConfig, ConfigError> {
        Ok(LocationConfig {
            timezone: self.store.get("location.timezone")?,
            lat: self.store.get("location.lat")?,
            lon: self.store.get("location.lon")?,
        })
    }

    pub fn scenes_timing(&self) -> Result<ScenesConfig, ConfigError> {
        Ok(ScenesConfig {
            good_afternoon_time: self.store.get("scenes.good_afternoon_time")?,
            good_evening_offset_minutes: self.store.get("scenes.good_evening_offset_minutes")?,
            good_night_timing: self.store.get("scenes.good_night_timing")?,
        })
    }

    pub fn wake_up(&self) -> Result<WakeUpConfig, ConfigError> {
        Ok(WakeUpConfig {
            enabled: self.store.get("wake_up.enabled")?,
            time: self.store.get("wake_up.time")?,
            good_morning_delay_minutes: self.store.get("wake_up.good_morning_delay_minutes")?,
            last_triggered: self.store.get_opt("wake_up.last_triggered"),
        })
    }

    pub fn set_wake_up_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        self.store.set("wake_up.enabled", &enabled)
    }

    pub fn set_wake_up_time(&self, time: chrono::NaiveTime) -> Result<(), ConfigError> {
        self.store.set("wake_up.time", &time)
    }

    /// Only the wake-up orchestrator calls this; external writers must
    /// never touch this key.
    pub fn set_wake_up_last_triggered(&self, at: DateTime<Utc>) -> Result<(), ConfigError> {
        self.store.set_unchecked("wake_up.last_triggered", &at)
    }

    pub fn home_away(&self) -> Result<HomeAwayConfig, ConfigError> {
        Ok(HomeAwayConfig {
            status: self.store.get("home_away.status")?,
            away_periods: self.store.get_opt("home_away.away_periods").unwrap_or_default(),
        })
    }

    pub fn music(&self) -> Result<MusicConfig, ConfigError> {
        Ok(MusicConfig {
            enabled_for_morning: self.store.get("music.enabled_for_morning")?,
            enabled_for_evening: self.store.get("music.enabled_for_evening")?,
        })
    }

    /// Last time a given daily scene job actually fired, persisted so
    /// missed-schedule recovery survives a process restart. Internal
    /// bookkeeping only; not part of the externally-documented key list.
    pub fn scene_last_executed(&self, scene_name: &str) -> Option<DateTime<Utc>> {
        self.store.get_opt(&format!("scheduler.last_executed.{scene_name}"))
    }

    pub fn set_scene_last_executed(&self, scene_name: &str, at: DateTime<Utc>) -> Result<(), ConfigError> {
        self.store.set_unchecked(&format!("scheduler.last_executed.{scene_name}"), &at)
    }
}
