//! The currently displayed page of pending file records.

use crate::{FileRecord, Page, RecordId, RequestSeq};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub seq: RequestSeq,
    pub page_number: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page replaced the displayed one.
    Displayed,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
    /// The server answered with a page past the end; load the last one instead.
    Clamp(PageRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecordStore {
    page: Page<FileRecord>,
    page_size: u32,
    last_issued: RequestSeq,
    loading: Option<RequestSeq>,
}

impl Default for PendingRecordStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PendingRecordStore {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: Page::empty(page_size),
            page_size: page_size.max(1),
            last_issued: 0,
            loading: None,
        }
    }

    pub fn page(&self) -> &Page<FileRecord> {
        &self.page
    }

    pub fn current_page(&self) -> u32 {
        self.page.page_number
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn record(&self, id: RecordId) -> Option<&FileRecord> {
        self.page.items.iter().find(|record| record.id == id)
    }

    /// Issues a request for page `page_number` (1-based; 0 is treated as 1).
    pub fn request_page(&mut self, page_number: u32) -> PageRequest {
        self.last_issued += 1;
        self.loading = Some(self.last_issued);
        PageRequest {
            seq: self.last_issued,
            page_number: page_number.max(1),
            page_size: self.page_size,
        }
    }

    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        seq == self.last_issued
    }

    /// Replaces the displayed page wholesale with a loaded one.
    pub fn apply_loaded(&mut self, seq: RequestSeq, page: Page<FileRecord>) -> LoadOutcome {
        if !self.is_latest(seq) {
            return LoadOutcome::Stale;
        }
        self.loading = None;
        if page.page_number > page.last_displayable() {
            return LoadOutcome::Clamp(self.request_page(page.last_displayable()));
        }
        self.page = page;
        LoadOutcome::Displayed
    }

    /// Returns true if the response belonged to the latest request.
    pub fn apply_failed(&mut self, seq: RequestSeq) -> bool {
        if !self.is_latest(seq) {
            return false;
        }
        self.loading = None;
        true
    }

    /// Optimistically drops a record from the displayed page.
    pub fn remove(&mut self, id: RecordId) -> bool {
        let before = self.page.items.len();
        self.page.items.retain(|record| record.id != id);
        self.page.items.len() != before
    }

    /// Page to reload after a mutation removed records from the view: the
    /// previous page if this one is now empty, otherwise the same page.
    pub fn backfill_target(&self) -> u32 {
        let current = self.current_page();
        if self.page.items.is_empty() && current > 1 {
            current - 1
        } else {
            current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileStatus;

    fn record(id: RecordId) -> FileRecord {
        FileRecord {
            id,
            temp_filename: format!("tmp-{id}"),
            original_filename: format!("file-{id}.bin"),
            relative_dir_path: "docs".to_string(),
            size: 10,
            status: FileStatus::PendingDeletion,
        }
    }

    fn page(page_number: u32, total_pages: u32, ids: &[RecordId]) -> Page<FileRecord> {
        Page {
            items: ids.iter().copied().map(record).collect(),
            page_number,
            page_size: 2,
            total_pages,
            total_elements: u64::from(total_pages) * 2,
        }
    }

    fn loaded(p: Page<FileRecord>) -> PendingRecordStore {
        let mut store = PendingRecordStore::new(2);
        let req = store.request_page(p.page_number);
        assert_eq!(store.apply_loaded(req.seq, p), LoadOutcome::Displayed);
        store
    }

    #[test]
    fn emptied_last_page_backfills_to_previous() {
        let mut store = loaded(page(3, 3, &[7]));
        assert!(store.remove(7));
        assert_eq!(store.backfill_target(), 2);
    }

    #[test]
    fn emptied_first_page_reloads_itself() {
        let mut store = loaded(page(1, 1, &[7]));
        store.remove(7);
        assert_eq!(store.backfill_target(), 1);
    }

    #[test]
    fn partially_emptied_page_reloads_itself() {
        let mut store = loaded(page(2, 3, &[7, 8]));
        store.remove(7);
        assert_eq!(store.backfill_target(), 2);
    }

    #[test]
    fn only_latest_request_is_displayed() {
        let mut store = PendingRecordStore::new(2);
        let older = store.request_page(1);
        let newer = store.request_page(2);

        assert_eq!(store.apply_loaded(older.seq, page(1, 2, &[1])), LoadOutcome::Stale);
        assert_eq!(store.apply_loaded(newer.seq, page(2, 2, &[3])), LoadOutcome::Displayed);
        assert_eq!(store.current_page(), 2);
        assert!(!store.is_loading());
    }

    #[test]
    fn page_past_the_end_is_clamped() {
        let mut store = PendingRecordStore::new(2);
        let req = store.request_page(5);
        match store.apply_loaded(req.seq, page(5, 3, &[])) {
            LoadOutcome::Clamp(next) => assert_eq!(next.page_number, 3),
            other => panic!("expected clamp, got {other:?}"),
        }
        assert_eq!(store.current_page(), 1);
    }

    #[test]
    fn emptied_list_clamps_to_first_page() {
        let mut store = loaded(page(3, 3, &[5, 6]));
        let req = store.request_page(3);
        match store.apply_loaded(req.seq, page(3, 0, &[])) {
            LoadOutcome::Clamp(next) => assert_eq!(next.page_number, 1),
            other => panic!("expected clamp, got {other:?}"),
        }
        assert_eq!(store.current_page(), 3);
        assert!(store.is_loading());
    }

    #[test]
    fn page_zero_is_requested_as_first_page() {
        let mut store = PendingRecordStore::default();
        assert_eq!(store.request_page(0).page_number, 1);
        assert_eq!(store.request_page(0).page_size, DEFAULT_PAGE_SIZE);
    }
}
