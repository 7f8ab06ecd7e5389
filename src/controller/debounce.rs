use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Single cancellable deadline for the search input quiet period.
///
/// Arming replaces any previous deadline, so at most one firing is pending.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancels the pending deadline and schedules a new one.
    pub fn rearm(&mut self) {
        self.cancel();
        self.deadline = Some(Instant::now() + self.delay);
    }

    /// Returns `true` when a pending deadline was dropped.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the deadline once it has fired.
    pub fn fire(&mut self) {
        self.deadline = None;
    }
}

/// Completes at `deadline`, or never when there is none.
pub async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
