use crate::{
    BatchDeleteProgress, FileStatus, JobCommand, JobStatusSnapshot, RecordId, RequestFailure,
    RequestSeq,
};
use crate::msg::DeletionOrigin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartTimer,
    StopTimer,
    FetchStatus {
        seq: RequestSeq,
    },
    SendCommand(JobCommand),
    LoadPage {
        seq: RequestSeq,
        page_number: u32,
        page_size: u32,
    },
    ConfirmDeletion {
        id: RecordId,
        origin: DeletionOrigin,
    },
    Notify(Notification),
}

/// Outcomes reported to the presentation layer, successes and failures alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    StatusUpdated {
        snapshot: JobStatusSnapshot,
        changed: bool,
    },
    RunFinished,
    PollingFailed(RequestFailure),
    CommandAccepted {
        command: JobCommand,
        message: String,
    },
    CommandFailed {
        command: JobCommand,
        failure: RequestFailure,
    },
    PageLoaded {
        page_number: u32,
        total_pages: u32,
    },
    PageLoadFailed(RequestFailure),
    DeletionConfirmed(RecordId),
    DeletionFailed {
        id: RecordId,
        failure: RequestFailure,
    },
    /// The record is visible but not staged for deletion.
    DeletionRefused {
        id: RecordId,
        status: FileStatus,
    },
    BatchProgress(BatchDeleteProgress),
    BatchCompleted(BatchDeleteProgress),
    BatchRejected,
}
