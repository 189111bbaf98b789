//! [`Alarm`] — a local time-of-day, an optional weekday set, and an
//! opaque properties bag.

use std::collections::HashMap;

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use crate::occurrence;
use crate::timezone::AlarmTimeZone;

/// A recurring or one-time alarm.
///
/// The weekday set is kept deduplicated: assigning a collection replaces
/// the previous set wholesale, collapsing duplicates while preserving
/// first-seen order. An empty set means a one-time alarm whose
/// occurrence search ignores weekdays entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alarm {
    /// Local wall-clock time of day the alarm fires at.
    pub local_time: NaiveTime,
    #[serde(default, deserialize_with = "deserialize_weekdays")]
    weekdays: Vec<Weekday>,
    /// Caller-owned key/value bag; never read by the calculator.
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,
}

impl Alarm {
    /// A one-time alarm at `local_time`.
    pub fn new(local_time: NaiveTime) -> Self {
        Self {
            local_time,
            weekdays: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// A recurring alarm firing on the given weekdays.
    pub fn with_weekdays(local_time: NaiveTime, days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut alarm = Self::new(local_time);
        alarm.set_weekdays(days);
        alarm
    }

    /// The deduplicated weekday set.
    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    /// Replace the weekday set, collapsing duplicates.
    pub fn set_weekdays(&mut self, days: impl IntoIterator<Item = Weekday>) {
        self.weekdays = dedup_weekdays(days);
    }

    /// True when the weekday set is empty.
    pub fn is_one_time(&self) -> bool {
        self.weekdays.is_empty()
    }

    /// The next instant this alarm fires in `tz`, strictly after now.
    pub fn next_occurrence(&self, tz: &AlarmTimeZone) -> DateTime<Utc> {
        self.next_occurrence_at(tz, Utc::now())
    }

    /// Deterministic variant of [`next_occurrence`](Self::next_occurrence)
    /// with an injected `now`.
    pub fn next_occurrence_at(&self, tz: &AlarmTimeZone, now: DateTime<Utc>) -> DateTime<Utc> {
        occurrence::next_alarm_occurrence_at(tz, self, now)
    }

    /// The most recent instant this alarm fired in `tz`, at or before now.
    pub fn last_occurrence(&self, tz: &AlarmTimeZone) -> DateTime<Utc> {
        self.last_occurrence_at(tz, Utc::now())
    }

    /// Deterministic variant of [`last_occurrence`](Self::last_occurrence)
    /// with an injected `now`.
    pub fn last_occurrence_at(&self, tz: &AlarmTimeZone, now: DateTime<Utc>) -> DateTime<Utc> {
        occurrence::last_alarm_occurrence_at(tz, self, now)
    }
}

fn dedup_weekdays(days: impl IntoIterator<Item = Weekday>) -> Vec<Weekday> {
    let mut out = Vec::new();
    for day in days {
        if !out.contains(&day) {
            out.push(day);
        }
    }
    out
}

fn deserialize_weekdays<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
    Ok(dedup_weekdays(Vec::<Weekday>::deserialize(deserializer)?))
}
