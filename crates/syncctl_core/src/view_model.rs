use crate::affordance::Affordances;
use crate::deletion::BatchPhase;
use crate::{BatchDeleteProgress, FileRecord, JobCommand, JobStatusSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub snapshot: Option<JobStatusSnapshot>,
    pub affordances: Affordances,
    pub command_in_flight: Option<JobCommand>,
    pub polling: bool,
    pub page: PageView,
    pub batch_phase: BatchPhase,
    pub batch: Option<BatchDeleteProgress>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page_number: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub loading: bool,
    pub records: Vec<FileRecord>,
}
