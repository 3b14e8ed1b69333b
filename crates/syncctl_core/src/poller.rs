//! Status poller bookkeeping.
//!
//! The timer itself lives in the engine; this tracks whether polling is
//! active and which `getStatus` request is outstanding. At most one request
//! is outstanding at any time, across stop/start pairs included.

use crate::RequestSeq;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusPoller {
    active: bool,
    last_issued: RequestSeq,
    in_flight: Option<RequestSeq>,
    repoll_requested: bool,
}

/// What to do with a `getStatus` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollVerdict {
    /// The response answers the outstanding request and should be applied.
    pub accepted: bool,
    /// A follow-up request to issue now.
    pub follow_up: Option<RequestSeq>,
}

impl StatusPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn in_flight(&self) -> Option<RequestSeq> {
        self.in_flight
    }

    /// Returns true when the poller was inactive and its timer must be started.
    pub fn activate(&mut self) -> bool {
        !std::mem::replace(&mut self.active, true)
    }

    /// Returns true when the poller was active and its timer must be stopped.
    /// An outstanding request is not cancelled.
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    /// Timer tick. Skipped (not queued) while a request is outstanding.
    pub fn on_tick(&mut self) -> Option<RequestSeq> {
        if !self.active || self.in_flight.is_some() {
            return None;
        }
        Some(self.issue())
    }

    /// Immediate observation, independent of the timer. If a request is
    /// already outstanding a follow-up is issued once it resolves.
    pub fn request_now(&mut self) -> Option<RequestSeq> {
        if self.in_flight.is_some() {
            self.repoll_requested = true;
            return None;
        }
        Some(self.issue())
    }

    pub fn on_response(&mut self, seq: RequestSeq) -> PollVerdict {
        let accepted = self.in_flight == Some(seq);
        if accepted {
            self.in_flight = None;
        }
        let follow_up = if self.repoll_requested && self.in_flight.is_none() {
            self.repoll_requested = false;
            Some(self.issue())
        } else {
            None
        };
        PollVerdict {
            accepted,
            follow_up,
        }
    }

    fn issue(&mut self) -> RequestSeq {
        self.last_issued += 1;
        self.in_flight = Some(self.last_issued);
        self.last_issued
    }
}
