// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure next-fire computation for the three daily scene jobs, including the
//! missed-schedule recovery decision.

use crate::sun::SunEvents;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use duskline_core::{GoodNightTiming, SunAnchor};

pub const GRACE_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy)]
pub enum DailyTrigger {
    FixedLocalTime(NaiveTime),
    SunRelative { anchor: SunAnchor, offset_minutes: i32 },
}

impl DailyTrigger {
    pub fn good_night(timing: GoodNightTiming) -> Self {
        match timing {
            GoodNightTiming::CivilTwilightEnd => {
                DailyTrigger::SunRelative { anchor: SunAnchor::CivilTwilightEnd, offset_minutes: 0 }
            }
            GoodNightTiming::SunsetPlusOffset => {
                DailyTrigger::SunRelative { anchor: SunAnchor::Sunset, offset_minutes: 30 }
            }
        }
    }
}

fn anchor_instant(anchor: SunAnchor, events: SunEvents) -> DateTime<Utc> {
    match anchor {
        SunAnchor::Sunrise => events.sunrise,
        SunAnchor::Sunset => events.sunset,
        SunAnchor::CivilTwilightEnd => events.civil_twilight_end,
    }
}

/// The nominal fire instant for `trigger` on the local calendar `date`,
/// given that date's sun events (ignored for `FixedLocalTime`).
pub fn nominal_fire_utc(trigger: DailyTrigger, tz: Tz, date: NaiveDate, events: SunEvents) -> DateTime<Utc> {
    match trigger {
        DailyTrigger::FixedLocalTime(time) => {
            let naive = date.and_time(time);
            let local = tz.from_local_datetime(&naive).single().unwrap_or_else(|| tz.from_utc_datetime(&naive));
            local.with_timezone(&Utc)
        }
        DailyTrigger::SunRelative { anchor, offset_minutes } => {
            anchor_instant(anchor, events) + chrono::Duration::minutes(i64::from(offset_minutes))
        }
    }
}

/// Decision for materializing one daily job: either it should fire right
/// now as a missed-schedule recovery, or it should be armed for a future
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDecision {
    RecoverNow { scheduled_for: DateTime<Utc> },
    ArmFor(DateTime<Utc>),
}

/// Combines today's nominal instant with the recovery-grace window to
/// decide whether a job should fire immediately (a missed schedule), or be
/// armed for a future instant (today if still ahead, else tomorrow's
/// nominal instant).
pub fn decide(
    today_instant: DateTime<Utc>,
    tomorrow_instant: DateTime<Utc>,
    now: DateTime<Utc>,
    last_executed_at: Option<DateTime<Utc>>,
) -> FireDecision {
    if today_instant > now {
        return FireDecision::ArmFor(today_instant);
    }
    let grace_start = now - chrono::Duration::minutes(GRACE_MINUTES);
    let already_ran = last_executed_at.is_some_and(|t| t >= today_instant);
    if today_instant > grace_start && !already_ran {
        return FireDecision::RecoverNow { scheduled_for: today_instant };
    }
    FireDecision::ArmFor(tomorrow_instant)
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
