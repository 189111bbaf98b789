//! CLI input parsing helpers for alarm times and weekday lists.

use chrono::{NaiveTime, Weekday};

/// Parse a local time-of-day: `"HH:MM:SS"` (with optional fraction) or
/// `"HH:MM"`. Returns `None` if the string is unparseable.
pub fn parse_local_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Parse a comma-separated weekday list: names ("mon,tuesday,FRI") or
/// numbers with Sunday as 0 ("0,2,6"). An empty string is an empty list
/// (a one-time alarm). Returns `None` on any unrecognized entry.
///
/// Duplicates are passed through; `Alarm::set_weekdays` collapses them.
pub fn parse_weekdays(s: &str) -> Option<Vec<Weekday>> {
    let s = s.trim();
    if s.is_empty() {
        return Some(Vec::new());
    }

    s.split(',')
        .map(|part| {
            let part = part.trim();
            if let Ok(day) = part.parse::<Weekday>() {
                return Some(day);
            }
            match part {
                "0" => Some(Weekday::Sun),
                "1" => Some(Weekday::Mon),
                "2" => Some(Weekday::Tue),
                "3" => Some(Weekday::Wed),
                "4" => Some(Weekday::Thu),
                "5" => Some(Weekday::Fri),
                "6" => Some(Weekday::Sat),
                _ => None,
            }
        })
        .collect()
}
