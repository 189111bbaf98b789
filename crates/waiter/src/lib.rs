//! Single-shot alarm waiting on top of `wecker-core`.
//!
//! [`schedule`] computes the next occurrence of an alarm, sleeps until
//! that instant on a background tokio task, and invokes a callback
//! exactly once. The returned [`AlarmHandle`] cancels the wait — via
//! [`cancel`](AlarmHandle::cancel), or implicitly on drop — with the
//! guarantee that a cancellation strictly before the target instant
//! means the callback never runs.
//!
//! Recurrence is the caller's job: re-invoke [`schedule`] after each
//! firing (see the `alarm-worker` binary for the loop).

pub mod handle;
pub mod parse;

pub use handle::{schedule, AlarmHandle};
pub use parse::{parse_local_time, parse_weekdays};
