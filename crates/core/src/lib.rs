//! Timezone-aware alarm occurrence calculation.
//!
//! This crate computes the absolute UTC instants at which an alarm,
//! defined by a local wall-clock time and an optional weekday set,
//! fires in an IANA timezone:
//! - [`AlarmTimeZone`] wraps a timezone identifier and answers offset
//!   and local-time questions.
//! - [`Alarm`] holds the local time-of-day, the deduplicated weekday
//!   set, and an opaque properties bag.
//! - [`occurrence`] walks the calendar forward or backward to find the
//!   next and last occurrence instants.

pub mod alarm;
pub mod error;
pub mod occurrence;
pub mod timezone;

pub use alarm::Alarm;
pub use error::AlarmError;
pub use timezone::AlarmTimeZone;
