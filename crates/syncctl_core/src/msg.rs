use crate::{
    CommandAck, FileRecord, JobCommand, JobStatusSnapshot, Page, RecordId, RequestFailure,
    RequestSeq,
};

/// Which deletion path issued a `confirmDeletion` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOrigin {
    Single,
    Batch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin periodic status observation.
    StartPolling,
    /// Stop periodic status observation. Outstanding requests are not cancelled.
    StopPolling,
    /// Poll timer fired.
    PollTick,
    /// A `getStatus` request resolved.
    StatusFetched {
        seq: RequestSeq,
        result: Result<JobStatusSnapshot, RequestFailure>,
    },
    /// User clicked start, pause/resume or stop.
    CommandClicked(JobCommand),
    /// A control command request resolved.
    CommandCompleted {
        command: JobCommand,
        result: Result<CommandAck, RequestFailure>,
    },
    /// User asked for a manual refresh of status and list.
    RefreshClicked,
    /// User navigated to a page.
    PageClicked(u32),
    /// A `listPending` request resolved.
    PageLoaded {
        seq: RequestSeq,
        result: Result<Page<FileRecord>, RequestFailure>,
    },
    /// User confirmed deletion of one record.
    ConfirmDeletionClicked(RecordId),
    /// User confirmed deletion of several records.
    BatchConfirmClicked(Vec<RecordId>),
    /// A `confirmDeletion` request resolved.
    DeletionCompleted {
        id: RecordId,
        origin: DeletionOrigin,
        result: Result<(), RequestFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
