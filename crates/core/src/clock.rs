// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! The configuration store, logger, clock, and sun oracle are passed as
//! explicit dependencies to each component — this is the only supported
//! substitution point for tests (see design notes).

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A clock that provides the current instant in UTC.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current local wall-clock time in the given IANA zone.
    fn now_in(&self, tz: Tz) -> chrono::DateTime<Tz> {
        self.now_utc().with_timezone(&tz)
    }
}

/// Real system clock.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for deterministic tests. Stores epoch milliseconds in an
/// `AtomicI64` behind an `Arc` so clones observe the same advancing clock.
#[derive(Clone)]
pub struct FakeClock {
    epoch_ms: Arc<AtomicI64>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { epoch_ms: Arc::new(AtomicI64::new(start.timestamp_millis())) }
    }

    pub fn advance(&self, duration: chrono::Duration) {
        self.epoch_ms.fetch_add(duration.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.epoch_ms.store(at.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.epoch_ms.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
