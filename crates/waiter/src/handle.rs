//! [`schedule`] and the cancellable [`AlarmHandle`].

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use wecker_core::{Alarm, AlarmTimeZone};

/// A scheduled single-shot alarm wait.
///
/// Dropping the handle cancels the wait; call
/// [`detach`](AlarmHandle::detach) to let the alarm fire unattended.
pub struct AlarmHandle {
    token: CancellationToken,
    guard: Option<DropGuard>,
    task: JoinHandle<bool>,
}

/// Compute the alarm's next occurrence and spawn a task that sleeps
/// until then, then invokes `callback` exactly once.
///
/// A target at or before now (clock skew) is treated as a zero wait and
/// fires immediately. Cancellation strictly before the target instant
/// guarantees the callback never runs.
pub fn schedule<F>(alarm: &Alarm, tz: &AlarmTimeZone, callback: F) -> AlarmHandle
where
    F: FnOnce() + Send + 'static,
{
    let now = Utc::now();
    let target = alarm.next_occurrence_at(tz, now);
    let wait = (target - now).to_std().unwrap_or(Duration::ZERO);
    debug!(
        timezone = %tz,
        target = %target,
        wait_secs = wait.as_secs_f64(),
        "alarm scheduled"
    );

    let token = CancellationToken::new();
    let task_token = token.clone();
    let task = tokio::spawn(async move {
        tokio::select! {
            // Prefer cancellation when both branches are ready: by then
            // the target instant has arrived and either outcome is valid,
            // but a pending cancel request should win.
            biased;
            _ = task_token.cancelled() => {
                debug!(target = %target, "alarm cancelled before firing");
                false
            }
            _ = tokio::time::sleep(wait) => {
                info!(target = %target, "alarm fired");
                callback();
                true
            }
        }
    });

    AlarmHandle {
        guard: Some(token.clone().drop_guard()),
        token,
        task,
    }
}

impl AlarmHandle {
    /// Cancel the wait. Before the alarm fires this guarantees the
    /// callback never runs; afterwards it is a no-op.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Let the alarm fire even after this handle is gone, returning the
    /// underlying task for callers that still want to await it.
    pub fn detach(mut self) -> JoinHandle<bool> {
        if let Some(guard) = self.guard.take() {
            guard.disarm();
        }
        self.task
    }

    /// Wait for the alarm to resolve. Returns `true` if the callback
    /// fired, `false` if the wait was cancelled first.
    pub async fn join(mut self) -> bool {
        // The drop guard stays armed until after the task completes, so
        // joining never cancels a pending wait.
        match (&mut self.task).await {
            Ok(fired) => fired,
            Err(e) => {
                warn!(error = %e, "alarm task failed");
                false
            }
        }
    }
}
