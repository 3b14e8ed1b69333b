use ctl_logging::{ctl_debug, ctl_info, ctl_trace, ctl_warn};

use crate::deletion::{BatchStart, BatchStep};
use crate::store::{LoadOutcome, PageRequest};
use crate::{
    AppState, BatchPhase, DeletionOrigin, Effect, FileRecord, JobStatusSnapshot, Msg,
    Notification, Page, RecordId, RequestFailure, RequestSeq,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartPolling => {
            let mut effects = Vec::new();
            if state.poller.activate() {
                effects.push(Effect::StartTimer);
                effects.extend(poll_now(&mut state));
                state.mark_dirty();
            }
            effects
        }
        Msg::StopPolling => {
            if state.poller.deactivate() {
                state.mark_dirty();
                vec![Effect::StopTimer]
            } else {
                Vec::new()
            }
        }
        Msg::PollTick => match state.poller.on_tick() {
            Some(seq) => vec![Effect::FetchStatus { seq }],
            None => {
                ctl_trace!("poll tick skipped, request in flight or poller stopped");
                Vec::new()
            }
        },
        Msg::StatusFetched { seq, result } => status_fetched(&mut state, seq, result),
        Msg::CommandClicked(command) => {
            if !state.controller.begin(command) {
                ctl_debug!(
                    "{} ignored, {:?} still in flight",
                    command,
                    state.controller.command_in_flight()
                );
                return (state, Vec::new());
            }
            if let Some(status) = state.controller.status() {
                if !command.is_legal_from(status) {
                    ctl_warn!("{} issued while job is {}", command, status);
                }
            }
            state.mark_dirty();
            vec![Effect::SendCommand(command)]
        }
        Msg::CommandCompleted { command, result } => {
            state.controller.finish(command);
            state.mark_dirty();
            let mut effects = Vec::new();
            match result {
                Ok(ack) => {
                    ctl_info!("{} accepted: {}", command, ack.message);
                    effects.push(Effect::Notify(Notification::CommandAccepted {
                        command,
                        message: ack.message,
                    }));
                    if command.ensures_polling() && state.poller.activate() {
                        effects.push(Effect::StartTimer);
                    }
                }
                Err(failure) => {
                    ctl_warn!("{} failed: {}", command, failure);
                    effects.push(Effect::Notify(Notification::CommandFailed {
                        command,
                        failure,
                    }));
                }
            }
            effects.extend(poll_now(&mut state));
            effects
        }
        Msg::RefreshClicked => {
            let mut effects = Vec::new();
            if state.poller.activate() {
                effects.push(Effect::StartTimer);
            }
            effects.extend(poll_now(&mut state));
            let current = state.store.current_page();
            effects.push(load_page(state.store.request_page(current)));
            state.mark_dirty();
            effects
        }
        Msg::PageClicked(page_number) => {
            state.mark_dirty();
            vec![load_page(state.store.request_page(page_number))]
        }
        Msg::PageLoaded { seq, result } => page_loaded(&mut state, seq, result),
        Msg::ConfirmDeletionClicked(id) => {
            let refused = state
                .store
                .record(id)
                .filter(|record| !record.is_deletable())
                .map(|record| record.status);
            if let Some(status) = refused {
                ctl_warn!("record {} is {}, not staged for deletion", id, status);
                return (
                    state,
                    vec![Effect::Notify(Notification::DeletionRefused { id, status })],
                );
            }
            if state.deletion.batch_includes(id) {
                ctl_debug!("record {} is part of the running batch", id);
                return (state, Vec::new());
            }
            if !state.deletion.begin_single(id) {
                ctl_debug!("deletion of {} already in flight", id);
                return (state, Vec::new());
            }
            vec![Effect::ConfirmDeletion {
                id,
                origin: DeletionOrigin::Single,
            }]
        }
        Msg::BatchConfirmClicked(ids) => batch_requested(&mut state, ids),
        Msg::DeletionCompleted { id, origin, result } => match origin {
            DeletionOrigin::Single => single_deletion_completed(&mut state, id, result),
            DeletionOrigin::Batch => batch_item_completed(&mut state, id, result),
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn poll_now(state: &mut AppState) -> Option<Effect> {
    state
        .poller
        .request_now()
        .map(|seq| Effect::FetchStatus { seq })
}

fn load_page(request: PageRequest) -> Effect {
    Effect::LoadPage {
        seq: request.seq,
        page_number: request.page_number,
        page_size: request.page_size,
    }
}

fn status_fetched(
    state: &mut AppState,
    seq: RequestSeq,
    result: Result<JobStatusSnapshot, RequestFailure>,
) -> Vec<Effect> {
    let verdict = state.poller.on_response(seq);
    let mut effects = Vec::new();
    if !verdict.accepted {
        ctl_debug!("dropping status response {} that answers no outstanding request", seq);
    } else {
        match result {
            Ok(snapshot) => {
                let observation = state.controller.observe(snapshot);
                if observation.changed {
                    ctl_info!(
                        "job status {} -> {}",
                        observation
                            .previous
                            .map_or_else(|| "unknown".to_string(), |s| s.to_string()),
                        snapshot.status
                    );
                }
                state.mark_dirty();
                effects.push(Effect::Notify(Notification::StatusUpdated {
                    snapshot,
                    changed: observation.changed,
                }));
                if observation.run_finished {
                    effects.push(Effect::Notify(Notification::RunFinished));
                    let current = state.store.current_page();
                    effects.push(load_page(state.store.request_page(current)));
                }
            }
            Err(failure) => {
                ctl_warn!("status poll failed, polling stopped: {}", failure);
                effects.push(Effect::Notify(Notification::PollingFailed(failure)));
                if state.poller.deactivate() {
                    effects.push(Effect::StopTimer);
                }
                state.mark_dirty();
            }
        }
    }
    if let Some(seq) = verdict.follow_up {
        effects.push(Effect::FetchStatus { seq });
    }
    effects
}

fn page_loaded(
    state: &mut AppState,
    seq: RequestSeq,
    result: Result<Page<FileRecord>, RequestFailure>,
) -> Vec<Effect> {
    match result {
        Ok(page) => {
            let (page_number, total_pages) = (page.page_number, page.total_pages);
            match state.store.apply_loaded(seq, page) {
                LoadOutcome::Displayed => {
                    state.mark_dirty();
                    vec![Effect::Notify(Notification::PageLoaded {
                        page_number,
                        total_pages,
                    })]
                }
                LoadOutcome::Stale => {
                    ctl_debug!("dropping superseded page response {}", seq);
                    Vec::new()
                }
                LoadOutcome::Clamp(request) => {
                    ctl_debug!(
                        "page {} is past the end ({} pages), loading {}",
                        page_number,
                        total_pages,
                        request.page_number
                    );
                    vec![load_page(request)]
                }
            }
        }
        Err(failure) => {
            if !state.store.apply_failed(seq) {
                return Vec::new();
            }
            ctl_warn!("loading pending records failed: {}", failure);
            state.mark_dirty();
            vec![Effect::Notify(Notification::PageLoadFailed(failure))]
        }
    }
}

fn batch_requested(state: &mut AppState, ids: Vec<RecordId>) -> Vec<Effect> {
    if state.deletion.phase() == BatchPhase::Running {
        ctl_warn!("batch deletion refused, another batch is running");
        return vec![Effect::Notify(Notification::BatchRejected)];
    }
    let eligible: Vec<RecordId> = ids
        .into_iter()
        .filter(|id| match state.store.record(*id) {
            Some(record) if !record.is_deletable() => {
                ctl_debug!("batch skips {}: {}", id, record.status);
                false
            }
            _ if state.deletion.single_in_flight(*id) => {
                ctl_debug!("batch skips {}: confirmation already in flight", id);
                false
            }
            _ => true,
        })
        .collect();

    state.mark_dirty();
    match state.deletion.begin_batch(eligible) {
        Ok(BatchStart::Started { first, progress }) => {
            ctl_info!("batch deletion of {} records started", progress.total);
            vec![
                Effect::Notify(Notification::BatchProgress(progress)),
                Effect::ConfirmDeletion {
                    id: first,
                    origin: DeletionOrigin::Batch,
                },
            ]
        }
        Ok(BatchStart::Empty(progress)) => {
            vec![Effect::Notify(Notification::BatchCompleted(progress))]
        }
        Err(_) => vec![Effect::Notify(Notification::BatchRejected)],
    }
}

fn single_deletion_completed(
    state: &mut AppState,
    id: RecordId,
    result: Result<(), RequestFailure>,
) -> Vec<Effect> {
    state.deletion.finish_single(id);
    match result {
        Ok(()) => {
            state.store.remove(id);
            state.mark_dirty();
            let target = state.store.backfill_target();
            vec![
                Effect::Notify(Notification::DeletionConfirmed(id)),
                load_page(state.store.request_page(target)),
            ]
        }
        Err(failure) => {
            ctl_warn!("confirming deletion of {} failed: {}", id, failure);
            vec![Effect::Notify(Notification::DeletionFailed { id, failure })]
        }
    }
}

fn batch_item_completed(
    state: &mut AppState,
    id: RecordId,
    result: Result<(), RequestFailure>,
) -> Vec<Effect> {
    let succeeded = match result {
        Ok(()) => {
            state.store.remove(id);
            true
        }
        Err(failure) => {
            ctl_warn!("batch deletion of {} failed: {}", id, failure);
            false
        }
    };
    let Some(step) = state.deletion.record_batch_outcome(id, succeeded) else {
        ctl_warn!("deletion result for {} does not belong to the running batch", id);
        return Vec::new();
    };
    state.mark_dirty();
    match step {
        BatchStep::Next { id, progress } => vec![
            Effect::Notify(Notification::BatchProgress(progress)),
            Effect::ConfirmDeletion {
                id,
                origin: DeletionOrigin::Batch,
            },
        ],
        BatchStep::Completed(progress) => {
            ctl_info!("batch deletion finished: {}", progress.status_text);
            let target = state.store.backfill_target();
            vec![
                Effect::Notify(Notification::BatchProgress(progress.clone())),
                Effect::Notify(Notification::BatchCompleted(progress)),
                load_page(state.store.request_page(target)),
            ]
        }
    }
}
