//! Sync controller core: pure state machine and view-model helpers.
pub mod affordance;
mod controller;
mod deletion;
mod effect;
mod msg;
mod poller;
mod state;
mod store;
mod types;
mod update;
mod view_model;

pub use affordance::{affordances_for, Affordances, ControlState};
pub use controller::{JobController, Observation};
pub use deletion::{BatchDeleteProgress, BatchPhase, DeletionCoordinator};
pub use effect::{Effect, Notification};
pub use msg::{DeletionOrigin, Msg};
pub use poller::StatusPoller;
pub use state::AppState;
pub use store::{PendingRecordStore, DEFAULT_PAGE_SIZE};
pub use types::{
    CommandAck, FailureClass, FileRecord, FileStatus, JobCommand, JobStatusSnapshot, Page,
    RecordId, RequestFailure, RequestSeq, SyncJobStatus,
};
pub use update::update;
pub use view_model::{AppViewModel, PageView};
