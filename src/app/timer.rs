//! Cancellable timer slot
//!
//! Every timed behavior (debounce, auto-dismiss, exit animation settle,
//! delayed navigation) owns one [`TimerSlot`]. At most one timeout is
//! pending per slot: scheduling again cancels the previous one.

use std::fmt;
use std::time::Duration;

use crate::input::Task;
use crate::platform::Host;

pub struct TimerSlot<H: Host> {
    pending: Option<H::Timer>,
}

impl<H: Host> Default for TimerSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> fmt::Debug for TimerSlot<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerSlot")
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl<H: Host> TimerSlot<H> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Schedules `task`, cancelling whatever was pending
    pub fn schedule(&mut self, host: &mut H, delay: Duration, task: Task<H::Node>) {
        self.cancel(host);
        self.pending = Some(host.set_timeout(delay, task));
    }

    /// Cancels the pending timeout, if any
    pub fn cancel(&mut self, host: &mut H) {
        if let Some(timer) = self.pending.take() {
            host.clear_timeout(timer);
        }
    }

    /// Marks the pending timeout as delivered
    ///
    /// # Returns
    /// false when nothing was pending, meaning the delivery is stale and
    /// must be ignored
    pub fn fired(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
