// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sun event data for a given local date: sunrise, sunset, and civil
//! twilight end, each expressed as a UTC instant. The live source is an
//! HTTP weather collaborator; a caching layer provides the fallback chain
//! on outage (cache, then pure astronomical calculation).

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use std::collections::HashMap;
use thiserror::Error;

/// Today's (or any date's) computed sun instants, all in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvents {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub civil_twilight_end: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SunError {
    #[error("upstream sun data source unavailable: {0}")]
    UpstreamUnavailable(String),
}

/// The external sunrise/sunset data collaborator. Raw weather fetching is
/// out of scope; only this data contract lives here.
#[async_trait]
pub trait SunDataSource: Send + Sync + 'static {
    async fn fetch(&self, date: NaiveDate, tz: Tz) -> Result<SunEvents, SunError>;
}

/// Queries a configurable sunrise/sunset HTTP endpoint
/// (`location.sun_api_base`), bound to one fixed lat/lon at construction.
pub struct HttpSunDataSource {
    client: reqwest::Client,
    base_url: String,
    lat: f64,
    lon: f64,
}

impl HttpSunDataSource {
    pub fn new(base_url: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self { client: reqwest::Client::new(), base_url: base_url.into(), lat, lon }
    }
}

#[derive(serde::Deserialize)]
struct SunResponse {
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
    civil_twilight_end: DateTime<Utc>,
}

#[async_trait]
impl SunDataSource for HttpSunDataSource {
    async fn fetch(&self, date: NaiveDate, _tz: Tz) -> Result<SunEvents, SunError> {
        let url = format!("{}/sun", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("date", date.to_string()), ("lat", self.lat.to_string()), ("lon", self.lon.to_string())])
            .send()
            .await
            .map_err(|e| SunError::UpstreamUnavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(SunError::UpstreamUnavailable(format!("status {}", resp.status())));
        }
        let parsed: SunResponse =
            resp.json().await.map_err(|e| SunError::UpstreamUnavailable(e.to_string()))?;
        Ok(SunEvents {
            sunrise: parsed.sunrise,
            sunset: parsed.sunset,
            civil_twilight_end: parsed.civil_twilight_end,
        })
    }
}

const CACHE_MAX_AGE_DAYS: i64 = 7;

struct CacheEntry {
    events: SunEvents,
    cached_at: DateTime<Utc>,
}

/// The result of resolving sun events for one date, plus whether the live
/// source had to be bypassed in favor of the cache or astronomical
/// fallback.
#[derive(Debug, Clone, Copy)]
pub struct SunLookup {
    pub events: SunEvents,
    pub fell_back: bool,
}

/// Wraps a [`SunDataSource`] with a last-known-good cache and an
/// astronomical-calculation fallback (design decision OQ-1) for the case
/// where both the live fetch and the cache are unavailable. Location
/// (lat/lon) is fixed for the oracle's lifetime, matching the assumption
/// that `location.lat`/`location.lon` change rarely and a reconfiguration
/// rebuilds the oracle rather than mutating it in place.
pub struct CachingSunOracle<S: SunDataSource> {
    source: S,
    lat: f64,
    lon: f64,
    cache: Mutex<HashMap<NaiveDate, CacheEntry>>,
}

impl<S: SunDataSource> CachingSunOracle<S> {
    pub fn new(source: S, lat: f64, lon: f64) -> Self {
        Self { source, lat, lon, cache: Mutex::new(HashMap::new()) }
    }

    /// Resolve sun events for `date`, in order: live fetch, cache entry no
    /// older than [`CACHE_MAX_AGE_DAYS`], pure astronomical fallback.
    /// Reports which tier answered the call, since `civil_twilight_end`
    /// carried by a fallback tier is stale and callers anchored on it
    /// (`good_night_timing = civil_twilight_end`) need to route around it.
    pub async fn lookup(&self, date: NaiveDate, tz: Tz, now: DateTime<Utc>) -> SunLookup {
        match self.source.fetch(date, tz).await {
            Ok(events) => {
                self.cache.lock().insert(date, CacheEntry { events, cached_at: now });
                SunLookup { events, fell_back: false }
            }
            Err(e) => {
                tracing::warn!(error = %e, %date, "sun data source unavailable, falling back");
                if let Some(events) = self.cached_if_fresh(date, now) {
                    return SunLookup { events, fell_back: true };
                }
                tracing::warn!(%date, "no fresh cache entry, falling back to astronomical calculation");
                SunLookup { events: self.astronomical_sun_events(date), fell_back: true }
            }
        }
    }

    /// Resolve sun events for `date`, discarding fallback provenance.
    pub async fn sun_events(&self, date: NaiveDate, tz: Tz, now: DateTime<Utc>) -> SunEvents {
        self.lookup(date, tz, now).await.events
    }

    /// The `good_night_timing` fallback specifically: sunset + 30 minutes,
    /// used when `good_night_timing = sunset_plus_offset` or when civil
    /// twilight data itself is unavailable for the date.
    pub async fn good_night_fallback(&self, date: NaiveDate, tz: Tz, now: DateTime<Utc>) -> DateTime<Utc> {
        let events = self.sun_events(date, tz, now).await;
        Self::sunset_plus_thirty(events)
    }

    /// Sunset + 30 minutes for an already-resolved `events` value — the
    /// approximation used whenever civil twilight end data itself can't be
    /// trusted (stale cache entry, astronomical fallback).
    pub fn sunset_plus_thirty(events: SunEvents) -> DateTime<Utc> {
        events.sunset + chrono::Duration::minutes(30)
    }

    fn cached_if_fresh(&self, date: NaiveDate, now: DateTime<Utc>) -> Option<SunEvents> {
        let cache = self.cache.lock();
        let entry = cache.get(&date)?;
        if (now - entry.cached_at).num_days() <= CACHE_MAX_AGE_DAYS {
            Some(entry.events)
        } else {
            None
        }
    }

    /// Pure astronomical sunrise/sunset calculation (OQ-1's last resort).
    /// Civil twilight end is approximated as sunset + 30 minutes, since the
    /// `sunrise` crate exposes only the sunrise/sunset pair.
    fn astronomical_sun_events(&self, date: NaiveDate) -> SunEvents {
        let (sunrise_ts, sunset_ts) =
            sunrise::sunrise_sunset(self.lat, self.lon, date.year(), date.month(), date.day());
        let sunrise = DateTime::from_timestamp(sunrise_ts, 0).unwrap_or(Utc::now());
        let sunset = DateTime::from_timestamp(sunset_ts, 0).unwrap_or(Utc::now());
        SunEvents { sunrise, sunset, civil_twilight_end: sunset + chrono::Duration::minutes(30) }
    }
}

#[cfg(test)]
#[path = "sun_tests.rs"]
mod tests;
