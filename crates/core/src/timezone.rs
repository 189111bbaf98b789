//! [`AlarmTimeZone`] — an IANA timezone wrapper answering offset and
//! local wall-clock questions for the occurrence calculator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AlarmError;

/// A resolved IANA timezone (e.g. `America/Los_Angeles`).
///
/// Holds no per-alarm state; a single instance can be shared read-only
/// across any number of alarm evaluations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmTimeZone {
    tz: Tz,
}

impl AlarmTimeZone {
    /// Resolve a timezone identifier against the IANA database.
    ///
    /// Matching is case-insensitive but exact: `"america/los_angeles"`
    /// resolves, `"America/Los"` does not. Fails with
    /// [`AlarmError::InvalidTimezone`] if no identifier matches.
    pub fn resolve(identifier: &str) -> Result<Self, AlarmError> {
        chrono_tz::TZ_VARIANTS
            .iter()
            .find(|tz| tz.name().eq_ignore_ascii_case(identifier))
            .map(|&tz| Self { tz })
            .ok_or_else(|| AlarmError::InvalidTimezone(identifier.to_string()))
    }

    /// Resolve the host's configured timezone.
    pub fn system_default() -> Result<Self, AlarmError> {
        let id = iana_time_zone::get_timezone()
            .map_err(|e| AlarmError::NoSystemTimezone(e.to_string()))?;
        Self::resolve(&id).map_err(|_| AlarmError::NoSystemTimezone(id))
    }

    /// Non-failing probe: does `identifier` name a known timezone?
    pub fn is_valid(identifier: &str) -> bool {
        Self::resolve(identifier).is_ok()
    }

    /// The canonical tzdb identifier (canonical casing, regardless of
    /// how the zone was resolved).
    pub fn id(&self) -> &'static str {
        self.tz.name()
    }

    /// Signed offset from UTC in effect at `now`.
    ///
    /// Differs across DST boundaries and may be non-whole-hour
    /// (e.g. Asia/Kathmandu is UTC+05:45).
    pub fn utc_offset_at(&self, now: DateTime<Utc>) -> Duration {
        let secs = self
            .tz
            .offset_from_utc_datetime(&now.naive_utc())
            .fix()
            .local_minus_utc();
        Duration::seconds(secs as i64)
    }

    /// The local wall-clock date-time at `now`, as a naive (zone-less)
    /// value: `now + utc_offset_at(now)`.
    pub fn current_local_at(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.naive_utc() + self.utc_offset_at(now)
    }

    /// Map a local wall-clock date-time back to a UTC instant using the
    /// offset in effect at `now`.
    ///
    /// This is an approximation: if a DST transition falls between `now`
    /// and the resulting instant, the offset at the target differs from
    /// the one used here and the result is shifted by the transition
    /// delta. The fix would be to iterate to a fixed point (resolve the
    /// offset at the candidate, reconstruct, repeat until stable).
    pub fn local_to_instant_at(&self, local: NaiveDateTime, now: DateTime<Utc>) -> DateTime<Utc> {
        Utc.from_utc_datetime(&(local - self.utc_offset_at(now)))
    }
}

impl fmt::Display for AlarmTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for AlarmTimeZone {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

impl Serialize for AlarmTimeZone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for AlarmTimeZone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Self::resolve(&id).map_err(serde::de::Error::custom)
    }
}
