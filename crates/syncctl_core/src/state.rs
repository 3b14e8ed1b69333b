use crate::controller::JobController;
use crate::deletion::DeletionCoordinator;
use crate::poller::StatusPoller;
use crate::store::PendingRecordStore;
use crate::view_model::{AppViewModel, PageView};

/// Everything the controller knows, owned in one place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) poller: StatusPoller,
    pub(crate) controller: JobController,
    pub(crate) store: PendingRecordStore,
    pub(crate) deletion: DeletionCoordinator,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            store: PendingRecordStore::new(page_size),
            ..Self::default()
        }
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    pub fn controller(&self) -> &JobController {
        &self.controller
    }

    pub fn store(&self) -> &PendingRecordStore {
        &self.store
    }

    pub fn deletion(&self) -> &DeletionCoordinator {
        &self.deletion
    }

    pub fn view(&self) -> AppViewModel {
        let page = self.store.page();
        AppViewModel {
            snapshot: self.controller.snapshot(),
            affordances: self.controller.affordances(),
            command_in_flight: self.controller.command_in_flight(),
            polling: self.poller.is_active(),
            page: PageView {
                page_number: page.page_number,
                total_pages: page.total_pages,
                total_elements: page.total_elements,
                loading: self.store.is_loading(),
                records: page.items.clone(),
            },
            batch_phase: self.deletion.phase(),
            batch: self.deletion.progress().cloned(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
