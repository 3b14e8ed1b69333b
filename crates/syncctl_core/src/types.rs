use std::fmt;

/// Server-assigned, stable identifier of a file record.
pub type RecordId = u64;

/// Sequence number attached to an outstanding request.
pub type RequestSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncJobStatus {
    Idle,
    Running,
    Paused,
    Stopping,
}

impl SyncJobStatus {
    pub const ALL: [SyncJobStatus; 4] = [
        SyncJobStatus::Idle,
        SyncJobStatus::Running,
        SyncJobStatus::Paused,
        SyncJobStatus::Stopping,
    ];

    /// True for the states a finished run passes through right before `Idle`.
    pub fn is_active_run(self) -> bool {
        matches!(self, SyncJobStatus::Running | SyncJobStatus::Stopping)
    }
}

impl fmt::Display for SyncJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SyncJobStatus::Idle => "idle",
            SyncJobStatus::Running => "running",
            SyncJobStatus::Paused => "paused",
            SyncJobStatus::Stopping => "stopping",
        };
        f.write_str(text)
    }
}

/// One observation of the remote job, produced once per successful poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobStatusSnapshot {
    pub status: SyncJobStatus,
    pub total_pending_count: u64,
    pub processed_in_current_run: u64,
    pub failed_in_current_run: u64,
}

impl JobStatusSnapshot {
    pub fn with_status(status: SyncJobStatus) -> Self {
        Self {
            status,
            total_pending_count: 0,
            processed_in_current_run: 0,
            failed_in_current_run: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    PendingSync,
    PendingDeletion,
    Synced,
    Syncing,
    ErrorCopying,
    ErrorSyncing,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FileStatus::PendingSync => "pending sync",
            FileStatus::PendingDeletion => "pending deletion",
            FileStatus::Synced => "synced",
            FileStatus::Syncing => "syncing",
            FileStatus::ErrorCopying => "error copying",
            FileStatus::ErrorSyncing => "error syncing",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: RecordId,
    pub temp_filename: String,
    pub original_filename: String,
    pub relative_dir_path: String,
    pub size: u64,
    pub status: FileStatus,
}

impl FileRecord {
    pub fn is_deletable(&self) -> bool {
        self.status == FileStatus::PendingDeletion
    }
}

/// A server page. `page_number` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page_number: 1,
            page_size: page_size.max(1),
            total_pages: 0,
            total_elements: 0,
        }
    }

    /// Highest page number that may be displayed.
    pub fn last_displayable(&self) -> u32 {
        self.total_pages.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobCommand {
    Start,
    Pause,
    Resume,
    Stop,
}

impl JobCommand {
    /// Whether the command is legal from `status`.
    pub fn is_legal_from(self, status: SyncJobStatus) -> bool {
        match self {
            JobCommand::Start => status == SyncJobStatus::Idle,
            JobCommand::Pause => status == SyncJobStatus::Running,
            JobCommand::Resume => status == SyncJobStatus::Paused,
            JobCommand::Stop => matches!(status, SyncJobStatus::Running | SyncJobStatus::Paused),
        }
    }

    /// Commands after which the poller must be running.
    pub fn ensures_polling(self) -> bool {
        matches!(self, JobCommand::Start | JobCommand::Resume)
    }
}

impl fmt::Display for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            JobCommand::Start => "start",
            JobCommand::Pause => "pause",
            JobCommand::Resume => "resume",
            JobCommand::Stop => "stop",
        };
        f.write_str(text)
    }
}

/// Acknowledgement of a control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAck {
    pub message: String,
    pub new_status: Option<SyncJobStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Timeout, connection failure or 5xx. Safe for the user to retry.
    Transient,
    /// 4xx-equivalent. Never retried automatically.
    Rejection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub class: FailureClass,
    pub message: String,
}

impl RequestFailure {
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Transient,
            message: message.into(),
        }
    }

    pub fn rejection(message: impl Into<String>) -> Self {
        Self {
            class: FailureClass::Rejection,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            FailureClass::Transient => write!(f, "transient failure: {}", self.message),
            FailureClass::Rejection => write!(f, "rejected: {}", self.message),
        }
    }
}
