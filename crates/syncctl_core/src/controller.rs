use crate::affordance::{affordances_for, affordances_unknown, Affordances};
use crate::{JobCommand, JobStatusSnapshot, SyncJobStatus};

/// Owns the last observed job status and the command currently on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobController {
    last_snapshot: Option<JobStatusSnapshot>,
    in_flight: Option<JobCommand>,
}

/// Difference between the previous and the newly observed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub previous: Option<SyncJobStatus>,
    pub changed: bool,
    pub run_finished: bool,
}

impl JobController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<SyncJobStatus> {
        self.last_snapshot.map(|snapshot| snapshot.status)
    }

    pub fn snapshot(&self) -> Option<JobStatusSnapshot> {
        self.last_snapshot
    }

    pub fn command_in_flight(&self) -> Option<JobCommand> {
        self.in_flight
    }

    /// Marks `command` as in flight. Returns false if another command is
    /// still outstanding; the caller must not issue it.
    pub fn begin(&mut self, command: JobCommand) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(command);
        true
    }

    pub fn finish(&mut self, command: JobCommand) {
        if self.in_flight == Some(command) {
            self.in_flight = None;
        }
    }

    /// Replaces the last observed snapshot.
    pub fn observe(&mut self, snapshot: JobStatusSnapshot) -> Observation {
        let previous = self.status();
        self.last_snapshot = Some(snapshot);
        Observation {
            previous,
            changed: previous != Some(snapshot.status),
            run_finished: previous.is_some_and(SyncJobStatus::is_active_run)
                && snapshot.status == SyncJobStatus::Idle,
        }
    }

    /// Affordances for the presentation layer. Every command control is
    /// disabled while a command is in flight.
    pub fn affordances(&self) -> Affordances {
        let base = match self.status() {
            Some(status) => affordances_for(status),
            None => affordances_unknown(),
        };
        if self.in_flight.is_some() {
            base.all_disabled()
        } else {
            base
        }
    }
}
