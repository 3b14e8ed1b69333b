//! Two-phase deletion: single confirmations and sequential batch runs.

use std::collections::{BTreeSet, VecDeque};

use crate::RecordId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchDeleteProgress {
    pub total: usize,
    pub processed: usize,
    pub success: usize,
    pub fail: usize,
    pub status_text: String,
}

impl BatchDeleteProgress {
    fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            success: 0,
            fail: 0,
            status_text: format!("准备删除 {total} 个文件"),
        }
    }

    fn record(&mut self, succeeded: bool) {
        self.processed += 1;
        if succeeded {
            self.success += 1;
        } else {
            self.fail += 1;
        }
        self.status_text = format!(
            "正在删除 {}/{}，成功 {}，失败 {}",
            self.processed, self.total, self.success, self.fail
        );
    }

    fn complete(&mut self) {
        self.status_text = format!(
            "批量删除完成：共 {}，成功 {}，失败 {}",
            self.total, self.success, self.fail
        );
    }

    pub fn is_consistent(&self) -> bool {
        self.success + self.fail == self.processed && self.processed <= self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPhase {
    #[default]
    NotStarted,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BatchRun {
    remaining: VecDeque<RecordId>,
    current: RecordId,
    progress: BatchDeleteProgress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStart {
    /// Issue the confirmation for `first`.
    Started {
        first: RecordId,
        progress: BatchDeleteProgress,
    },
    /// Nothing to delete; the run completed immediately.
    Empty(BatchDeleteProgress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStep {
    Next {
        id: RecordId,
        progress: BatchDeleteProgress,
    },
    Completed(BatchDeleteProgress),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchAlreadyRunning;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeletionCoordinator {
    singles_in_flight: BTreeSet<RecordId>,
    active: Option<BatchRun>,
    last_completed: Option<BatchDeleteProgress>,
}

impl DeletionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> BatchPhase {
        match (&self.active, &self.last_completed) {
            (Some(_), _) => BatchPhase::Running,
            (None, Some(_)) => BatchPhase::Completed,
            (None, None) => BatchPhase::NotStarted,
        }
    }

    /// Progress of the running batch, or of the last completed one.
    pub fn progress(&self) -> Option<&BatchDeleteProgress> {
        self.active
            .as_ref()
            .map(|run| &run.progress)
            .or(self.last_completed.as_ref())
    }

    /// Returns false if a confirmation for `id` is already outstanding.
    pub fn begin_single(&mut self, id: RecordId) -> bool {
        self.singles_in_flight.insert(id)
    }

    pub fn finish_single(&mut self, id: RecordId) {
        self.singles_in_flight.remove(&id);
    }

    pub fn single_in_flight(&self, id: RecordId) -> bool {
        self.singles_in_flight.contains(&id)
    }

    /// Whether the running batch has `id` in flight or still queued.
    pub fn batch_includes(&self, id: RecordId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| run.current == id || run.remaining.contains(&id))
    }

    /// Starts a batch over `ids` in the given order. Duplicates are dropped.
    pub fn begin_batch(&mut self, ids: Vec<RecordId>) -> Result<BatchStart, BatchAlreadyRunning> {
        if self.active.is_some() {
            return Err(BatchAlreadyRunning);
        }
        let mut seen = BTreeSet::new();
        let mut remaining: VecDeque<RecordId> =
            ids.into_iter().filter(|id| seen.insert(*id)).collect();
        let mut progress = BatchDeleteProgress::new(remaining.len());

        let Some(first) = remaining.pop_front() else {
            progress.complete();
            self.last_completed = Some(progress.clone());
            return Ok(BatchStart::Empty(progress));
        };
        self.active = Some(BatchRun {
            remaining,
            current: first,
            progress: progress.clone(),
        });
        Ok(BatchStart::Started { first, progress })
    }

    /// Records the outcome for the item currently in flight. Returns `None`
    /// if `id` is not that item.
    pub fn record_batch_outcome(&mut self, id: RecordId, succeeded: bool) -> Option<BatchStep> {
        let run = self.active.as_mut().filter(|run| run.current == id)?;
        run.progress.record(succeeded);
        if let Some(next) = run.remaining.pop_front() {
            run.current = next;
            return Some(BatchStep::Next {
                id: next,
                progress: run.progress.clone(),
            });
        }

        let mut progress = self.active.take()?.progress;
        progress.complete();
        self.last_completed = Some(progress.clone());
        Some(BatchStep::Completed(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_batch(ids: Vec<RecordId>, failing: &[RecordId]) -> Vec<BatchDeleteProgress> {
        let mut coordinator = DeletionCoordinator::new();
        let mut seen = Vec::new();
        let mut current = match coordinator.begin_batch(ids).unwrap() {
            BatchStart::Started { first, .. } => first,
            BatchStart::Empty(progress) => return vec![progress],
        };
        loop {
            match coordinator
                .record_batch_outcome(current, !failing.contains(&current))
                .unwrap()
            {
                BatchStep::Next { id, progress } => {
                    seen.push(progress);
                    current = id;
                }
                BatchStep::Completed(progress) => {
                    seen.push(progress);
                    return seen;
                }
            }
        }
    }

    #[test]
    fn partial_failures_are_counted_not_fatal() {
        let steps = run_batch(vec![1, 2, 3, 4, 5], &[2, 4]);
        assert_eq!(steps.len(), 5);
        for (index, step) in steps.iter().enumerate() {
            assert!(step.is_consistent());
            assert_eq!(step.processed, index + 1);
        }
        let last = steps.last().unwrap();
        assert_eq!((last.total, last.success, last.fail), (5, 3, 2));
    }

    #[test]
    fn duplicate_ids_are_processed_once() {
        let steps = run_batch(vec![4, 4, 9], &[]);
        assert_eq!(steps.last().unwrap().total, 2);
    }

    #[test]
    fn empty_batch_completes_immediately() {
        let mut coordinator = DeletionCoordinator::new();
        match coordinator.begin_batch(Vec::new()).unwrap() {
            BatchStart::Empty(progress) => assert_eq!(progress.total, 0),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(coordinator.phase(), BatchPhase::Completed);
    }

    #[test]
    fn second_batch_is_rejected_while_running() {
        let mut coordinator = DeletionCoordinator::new();
        assert_eq!(coordinator.phase(), BatchPhase::NotStarted);
        coordinator.begin_batch(vec![1, 2]).unwrap();
        assert_eq!(coordinator.phase(), BatchPhase::Running);
        assert_eq!(coordinator.begin_batch(vec![3]), Err(BatchAlreadyRunning));
    }

    #[test]
    fn outcome_for_other_id_is_ignored() {
        let mut coordinator = DeletionCoordinator::new();
        coordinator.begin_batch(vec![1, 2]).unwrap();
        assert_eq!(coordinator.record_batch_outcome(2, true), None);
        assert_eq!(coordinator.progress().unwrap().processed, 0);
    }

    #[test]
    fn batch_membership_covers_current_and_queued_items() {
        let mut coordinator = DeletionCoordinator::new();
        assert!(!coordinator.batch_includes(1));
        coordinator.begin_batch(vec![1, 2]).unwrap();
        assert!(coordinator.batch_includes(1));
        assert!(coordinator.batch_includes(2));
        assert!(!coordinator.batch_includes(3));

        coordinator.record_batch_outcome(1, true).unwrap();
        assert!(!coordinator.batch_includes(1));
        coordinator.record_batch_outcome(2, true).unwrap();
        assert!(!coordinator.batch_includes(2));
    }

    #[test]
    fn single_confirmations_are_deduplicated() {
        let mut coordinator = DeletionCoordinator::new();
        assert!(coordinator.begin_single(3));
        assert!(!coordinator.begin_single(3));
        coordinator.finish_single(3);
        assert!(coordinator.begin_single(3));
    }
}
