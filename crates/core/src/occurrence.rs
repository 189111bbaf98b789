//! Next/last occurrence calculation.
//!
//! All functions are pure over `(timezone, local time, now)`: `now` is
//! read once by the caller and threaded through, so a single evaluation
//! never sees two different clocks. Candidates are built from the UTC
//! offset in effect at `now` and stepped in whole 24h increments; a DST
//! transition inside the search window therefore shifts the fired
//! wall-clock time by the transition delta (see
//! [`AlarmTimeZone::local_to_instant_at`] for the same caveat).

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};
use tracing::debug;

use crate::alarm::Alarm;
use crate::timezone::AlarmTimeZone;

/// The next instant at which the local wall-clock in `tz` reads
/// `local_time`, strictly after `now`.
///
/// An exact time-of-day match counts as already passed: the result is
/// then 24h out.
pub fn next_occurrence_at(
    tz: &AlarmTimeZone,
    local_time: NaiveTime,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let current = tz.current_local_at(now).time();
    let delta = local_time.signed_duration_since(current);
    if current < local_time {
        now + delta
    } else {
        now + delta + Duration::days(1)
    }
}

/// The next instant at which the local wall-clock in `tz` reads
/// `local_time` on the given local weekday.
///
/// Starts from the unconstrained candidate and steps forward in whole
/// days until the weekday matches; the walk never needs more than six
/// steps.
pub fn next_weekday_occurrence_at(
    tz: &AlarmTimeZone,
    local_time: NaiveTime,
    weekday: Weekday,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let mut candidate = next_occurrence_at(tz, local_time, now);
    for _ in 0..6 {
        if tz.current_local_at(candidate).weekday() == weekday {
            break;
        }
        candidate += Duration::days(1);
    }
    candidate
}

/// The next firing instant of `alarm` in `tz`.
///
/// An empty weekday set falls through to the unconstrained search;
/// otherwise the earliest per-weekday candidate wins.
pub fn next_alarm_occurrence_at(
    tz: &AlarmTimeZone,
    alarm: &Alarm,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let next = alarm
        .weekdays()
        .iter()
        .map(|&day| next_weekday_occurrence_at(tz, alarm.local_time, day, now))
        .min()
        .unwrap_or_else(|| next_occurrence_at(tz, alarm.local_time, now));
    debug!(timezone = %tz, local_time = %alarm.local_time, next = %next, "next occurrence");
    next
}

/// The most recent instant at which the local wall-clock in `tz` read
/// `local_time`, at or before `now`.
///
/// The mirror of [`next_occurrence_at`]: an exact time-of-day match
/// counts as already passed, so the result is then `now` itself.
pub fn last_occurrence_at(
    tz: &AlarmTimeZone,
    local_time: NaiveTime,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let current = tz.current_local_at(now).time();
    let delta = current.signed_duration_since(local_time);
    if current >= local_time {
        now - delta
    } else {
        now - delta - Duration::days(1)
    }
}

/// The most recent instant at which the local wall-clock in `tz` read
/// `local_time` on the given local weekday.
pub fn last_weekday_occurrence_at(
    tz: &AlarmTimeZone,
    local_time: NaiveTime,
    weekday: Weekday,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let mut candidate = last_occurrence_at(tz, local_time, now);
    for _ in 0..6 {
        if tz.current_local_at(candidate).weekday() == weekday {
            break;
        }
        candidate -= Duration::days(1);
    }
    candidate
}

/// The most recent firing instant of `alarm` in `tz`.
///
/// The mirror of [`next_alarm_occurrence_at`], except the reduction over
/// per-weekday candidates takes the **latest** one: the most recent past
/// firing, not the oldest.
pub fn last_alarm_occurrence_at(
    tz: &AlarmTimeZone,
    alarm: &Alarm,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let last = alarm
        .weekdays()
        .iter()
        .map(|&day| last_weekday_occurrence_at(tz, alarm.local_time, day, now))
        .max()
        .unwrap_or_else(|| last_occurrence_at(tz, alarm.local_time, now));
    debug!(timezone = %tz, local_time = %alarm.local_time, last = %last, "last occurrence");
    last
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn la() -> AlarmTimeZone {
        AlarmTimeZone::resolve("America/Los_Angeles").unwrap()
    }

    /// Wednesday 2026-08-12 19:00 UTC = Wednesday 12:00 PDT. August sits
    /// well clear of the DST transitions on both sides.
    fn wednesday_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 12, 19, 0, 0).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    // -- unconstrained next ------------------------------------------------

    #[test]
    fn next_later_today() {
        let now = wednesday_noon();
        // Local 18:00 is six hours ahead of local noon.
        assert_eq!(next_occurrence_at(&la(), at(18, 0, 0), now), now + Duration::hours(6));
    }

    #[test]
    fn next_rolls_over_midnight() {
        let now = wednesday_noon();
        // Local 06:00 already passed today, so tomorrow: 18h out.
        assert_eq!(next_occurrence_at(&la(), at(6, 0, 0), now), now + Duration::hours(18));
    }

    #[test]
    fn next_is_strictly_future_on_exact_match() {
        let now = wednesday_noon();
        let next = next_occurrence_at(&la(), at(12, 0, 0), now);
        assert_eq!(next, now + Duration::days(1));
        assert!(next > now);
    }

    #[test]
    fn next_is_strictly_future_one_second_before_and_after() {
        let now = wednesday_noon();
        let before = next_occurrence_at(&la(), at(12, 0, 1), now);
        let after = next_occurrence_at(&la(), at(11, 59, 59), now);
        assert_eq!(before, now + Duration::seconds(1));
        assert_eq!(after, now + Duration::days(1) - Duration::seconds(1));
    }

    #[test]
    fn next_in_non_whole_hour_zone() {
        let tz = AlarmTimeZone::resolve("Asia/Kathmandu").unwrap();
        let now = Utc.with_ymd_and_hms(2026, 8, 12, 6, 0, 0).unwrap(); // 11:45 local
        assert_eq!(
            next_occurrence_at(&tz, at(12, 0, 0), now),
            now + Duration::minutes(15)
        );
    }

    // -- unconstrained last ------------------------------------------------

    #[test]
    fn last_earlier_today() {
        let now = wednesday_noon();
        assert_eq!(last_occurrence_at(&la(), at(8, 0, 0), now), now - Duration::hours(4));
    }

    #[test]
    fn last_rolls_back_to_yesterday() {
        let now = wednesday_noon();
        assert_eq!(last_occurrence_at(&la(), at(15, 0, 0), now), now - Duration::hours(21));
    }

    #[test]
    fn last_on_exact_match_is_now() {
        let now = wednesday_noon();
        assert_eq!(last_occurrence_at(&la(), at(12, 0, 0), now), now);
    }

    #[test]
    fn next_and_last_are_a_day_apart() {
        let now = wednesday_noon();
        for time in [at(0, 0, 0), at(6, 30, 15), at(12, 0, 0), at(23, 59, 59)] {
            let next = next_occurrence_at(&la(), time, now);
            let last = last_occurrence_at(&la(), time, now);
            assert!(next > now);
            assert!(last <= now);
            assert_eq!(next - last, Duration::days(1));
        }
    }

    // -- weekday-constrained next ------------------------------------------

    #[test]
    fn next_weekday_later_this_week() {
        let now = wednesday_noon();
        // Saturday 18:00 local is 3 days past Wednesday 18:00 local.
        let next = next_weekday_occurrence_at(&la(), at(18, 0, 0), Weekday::Sat, now);
        assert_eq!(next, now + Duration::hours(6) + Duration::days(3));
    }

    #[test]
    fn next_weekday_four_days_and_six_hours_out() {
        let now = wednesday_noon();
        // Sunday 18:00 local: exactly now + 4d6h.
        let next = next_weekday_occurrence_at(&la(), at(18, 0, 0), Weekday::Sun, now);
        assert_eq!(next, now + Duration::days(4) + Duration::hours(6));
    }

    #[test]
    fn next_weekday_zero_steps_when_base_matches() {
        let now = wednesday_noon();
        let next = next_weekday_occurrence_at(&la(), at(18, 0, 0), Weekday::Wed, now);
        assert_eq!(next, now + Duration::hours(6));
    }

    #[test]
    fn next_weekday_wraps_almost_a_full_week() {
        let now = wednesday_noon();
        // 06:00 already passed, so the base lands on Thursday; reaching
        // Wednesday again takes the full six steps.
        let next = next_weekday_occurrence_at(&la(), at(6, 0, 0), Weekday::Wed, now);
        assert_eq!(next, now + Duration::hours(18) + Duration::days(6));
    }

    // -- weekday-constrained last ------------------------------------------

    #[test]
    fn last_weekday_today() {
        let now = wednesday_noon();
        let last = last_weekday_occurrence_at(&la(), at(8, 0, 0), Weekday::Wed, now);
        assert_eq!(last, now - Duration::hours(4));
    }

    #[test]
    fn last_weekday_wraps_backward() {
        let now = wednesday_noon();
        // Base lands on Wednesday 08:00; the previous Thursday is six
        // steps back.
        let last = last_weekday_occurrence_at(&la(), at(8, 0, 0), Weekday::Thu, now);
        assert_eq!(last, now - Duration::hours(4) - Duration::days(6));
    }

    // -- alarm-level reductions --------------------------------------------

    #[test]
    fn one_time_alarm_ignores_weekday_search() {
        let now = wednesday_noon();
        let alarm = Alarm::new(at(18, 0, 0));
        assert_eq!(
            next_alarm_occurrence_at(&la(), &alarm, now),
            next_occurrence_at(&la(), at(18, 0, 0), now)
        );
        assert_eq!(
            last_alarm_occurrence_at(&la(), &alarm, now),
            last_occurrence_at(&la(), at(18, 0, 0), now)
        );
    }

    #[test]
    fn next_takes_earliest_weekday_candidate() {
        let now = wednesday_noon();
        let alarm = Alarm::with_weekdays(at(18, 0, 0), [Weekday::Sat, Weekday::Fri]);
        let fri = next_weekday_occurrence_at(&la(), at(18, 0, 0), Weekday::Fri, now);
        let sat = next_weekday_occurrence_at(&la(), at(18, 0, 0), Weekday::Sat, now);
        assert!(fri < sat);
        assert_eq!(next_alarm_occurrence_at(&la(), &alarm, now), fri);
    }

    #[test]
    fn last_takes_latest_weekday_candidate() {
        let now = wednesday_noon();
        let alarm = Alarm::with_weekdays(at(8, 0, 0), [Weekday::Mon, Weekday::Tue]);
        let mon = last_weekday_occurrence_at(&la(), at(8, 0, 0), Weekday::Mon, now);
        let tue = last_weekday_occurrence_at(&la(), at(8, 0, 0), Weekday::Tue, now);
        assert!(tue > mon);
        assert_eq!(last_alarm_occurrence_at(&la(), &alarm, now), tue);
    }

    #[test]
    fn reductions_mirror_each_other() {
        let now = wednesday_noon();
        let alarm = Alarm::with_weekdays(at(18, 0, 0), [Weekday::Mon, Weekday::Thu]);
        let next = next_alarm_occurrence_at(&la(), &alarm, now);
        let last = last_alarm_occurrence_at(&la(), &alarm, now);
        assert!(next > now);
        assert!(last <= now);
        // Nearest upcoming is Thursday 18:00, most recent past is Monday
        // 18:00: three days apart around Wednesday noon.
        assert_eq!(next, now + Duration::hours(30));
        assert_eq!(last, now - Duration::hours(42));
    }

    #[test]
    fn weekday_is_evaluated_in_local_calendar() {
        let now = wednesday_noon();
        // Wednesday 22:00 PDT is already Thursday 05:00 UTC; the local
        // weekday is the one that counts.
        let next = next_weekday_occurrence_at(&la(), at(22, 0, 0), Weekday::Wed, now);
        assert_eq!(next, now + Duration::hours(10));
        assert_eq!(next.weekday(), Weekday::Thu); // UTC calendar disagrees
    }
}
