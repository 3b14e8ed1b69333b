//! JSON bodies exchanged with the sync server.

use serde::Deserialize;
use syncctl_core::{
    CommandAck, FileRecord, FileStatus, JobStatusSnapshot, Page, RecordId, SyncJobStatus,
};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub(crate) enum WireJobStatus {
    #[serde(alias = "IDLE")]
    Idle,
    #[serde(alias = "RUNNING")]
    Running,
    #[serde(alias = "PAUSED")]
    Paused,
    #[serde(alias = "STOPPING")]
    Stopping,
}

impl From<WireJobStatus> for SyncJobStatus {
    fn from(status: WireJobStatus) -> Self {
        match status {
            WireJobStatus::Idle => SyncJobStatus::Idle,
            WireJobStatus::Running => SyncJobStatus::Running,
            WireJobStatus::Paused => SyncJobStatus::Paused,
            WireJobStatus::Stopping => SyncJobStatus::Stopping,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusBody {
    status: WireJobStatus,
    #[serde(default)]
    total_pending_count: u64,
    #[serde(default)]
    processed_in_current_run: u64,
    #[serde(default)]
    failed_in_current_run: u64,
}

impl From<StatusBody> for JobStatusSnapshot {
    fn from(body: StatusBody) -> Self {
        JobStatusSnapshot {
            status: body.status.into(),
            total_pending_count: body.total_pending_count,
            processed_in_current_run: body.processed_in_current_run,
            failed_in_current_run: body.failed_in_current_run,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommandBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    new_status: Option<WireJobStatus>,
}

impl From<CommandBody> for CommandAck {
    fn from(body: CommandBody) -> Self {
        CommandAck {
            message: body.message,
            new_status: body.new_status.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub(crate) enum WireFileStatus {
    #[serde(alias = "PENDING_SYNC")]
    PendingSync,
    #[serde(alias = "PENDING_DELETION")]
    PendingDeletion,
    #[serde(alias = "SYNCED")]
    Synced,
    #[serde(alias = "SYNCING")]
    Syncing,
    #[serde(alias = "ERROR_COPYING")]
    ErrorCopying,
    #[serde(alias = "ERROR_SYNCING")]
    ErrorSyncing,
}

impl From<WireFileStatus> for FileStatus {
    fn from(status: WireFileStatus) -> Self {
        match status {
            WireFileStatus::PendingSync => FileStatus::PendingSync,
            WireFileStatus::PendingDeletion => FileStatus::PendingDeletion,
            WireFileStatus::Synced => FileStatus::Synced,
            WireFileStatus::Syncing => FileStatus::Syncing,
            WireFileStatus::ErrorCopying => FileStatus::ErrorCopying,
            WireFileStatus::ErrorSyncing => FileStatus::ErrorSyncing,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileRecordBody {
    id: RecordId,
    #[serde(default)]
    temp_filename: String,
    #[serde(default)]
    original_filename: String,
    #[serde(default)]
    relative_dir_path: String,
    #[serde(default)]
    size: u64,
    status: WireFileStatus,
}

impl From<FileRecordBody> for FileRecord {
    fn from(body: FileRecordBody) -> Self {
        FileRecord {
            id: body.id,
            temp_filename: body.temp_filename,
            original_filename: body.original_filename,
            relative_dir_path: body.relative_dir_path,
            size: body.size,
            status: body.status.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageBody {
    #[serde(default)]
    items: Vec<FileRecordBody>,
    page_number: u32,
    page_size: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_elements: u64,
}

impl From<PageBody> for Page<FileRecord> {
    fn from(body: PageBody) -> Self {
        Page {
            items: body.items.into_iter().map(Into::into).collect(),
            page_number: body.page_number.max(1),
            page_size: body.page_size.max(1),
            total_pages: body.total_pages,
            total_elements: body.total_elements,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    message: String,
}

/// Human-readable message from an error response body.
pub(crate) fn error_message(body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.message;
    }
    String::from_utf8_lossy(body).trim().to_string()
}
