//! When status observations happen.
//!
//! The supervisor only asks an observer to start and stop; a push-based
//! implementation can replace the interval without touching the core.

use std::time::Duration;

use ctl_logging::{ctl_debug, ctl_trace};
use syncctl_core::Msg;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::SupervisorHandle;

pub trait StatusObserver: Send {
    /// Begins delivering `Msg::PollTick`. A second call while started is a no-op.
    fn start(&mut self, handle: SupervisorHandle);

    /// Stops delivery immediately.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Sends a tick every `period`, the first one after one full period since
/// the supervisor fetches immediately on start.
pub struct IntervalObserver {
    period: Duration,
    cancel: Option<CancellationToken>,
}

impl IntervalObserver {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            cancel: None,
        }
    }
}

impl StatusObserver for IntervalObserver {
    fn start(&mut self, handle: SupervisorHandle) {
        if self.is_running() {
            return;
        }
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let period = self.period;
        ctl_debug!("poll timer started, period {:?}", period);
        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => {
                        ctl_trace!("poll timer tick");
                        if !handle.dispatch(Msg::PollTick) {
                            break;
                        }
                    }
                }
            }
        });
        self.cancel = Some(token);
    }

    fn stop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
            ctl_debug!("poll timer stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for IntervalObserver {
    fn drop(&mut self) {
        self.stop();
    }
}
