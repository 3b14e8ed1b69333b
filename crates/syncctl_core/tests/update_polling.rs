use std::sync::Once;

use pretty_assertions::assert_eq;
use syncctl_core::{
    update, AppState, Effect, FileRecord, FileStatus, JobStatusSnapshot, Msg, Notification, Page,
    RequestFailure, SyncJobStatus,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ctl_logging::initialize_for_tests);
}

fn snapshot(status: SyncJobStatus) -> JobStatusSnapshot {
    JobStatusSnapshot {
        status,
        total_pending_count: 10,
        processed_in_current_run: 2,
        failed_in_current_run: 0,
    }
}

fn fetch_seq(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchStatus { seq } => Some(*seq),
            _ => None,
        })
        .expect("a FetchStatus effect")
}

fn page_loads(effects: &[Effect]) -> Vec<u32> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::LoadPage { page_number, .. } => Some(*page_number),
            _ => None,
        })
        .collect()
}

/// Starts polling and answers the immediate request with `status`.
fn observe(state: AppState, status: SyncJobStatus) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(state, Msg::PollTick);
    let seq = fetch_seq(&effects);
    update(
        state,
        Msg::StatusFetched {
            seq,
            result: Ok(snapshot(status)),
        },
    )
}

fn polling(status: SyncJobStatus) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::StartPolling);
    let seq = fetch_seq(&effects);
    let (state, _) = update(
        state,
        Msg::StatusFetched {
            seq,
            result: Ok(snapshot(status)),
        },
    );
    state
}

#[test]
fn start_polling_fetches_immediately() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::StartPolling);

    assert_eq!(effects, vec![Effect::StartTimer, Effect::FetchStatus { seq: 1 }]);
    assert!(state.view().polling);
}

#[test]
fn start_polling_twice_is_noop() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartPolling);
    let (_state, effects) = update(state, Msg::StartPolling);
    assert!(effects.is_empty());
}

#[test]
fn tick_does_not_overlap_outstanding_request() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartPolling);
    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::StatusFetched {
            seq: 1,
            result: Ok(snapshot(SyncJobStatus::Idle)),
        },
    );
    let (_state, effects) = update(state, Msg::PollTick);
    assert_eq!(effects, vec![Effect::FetchStatus { seq: 2 }]);
}

#[test]
fn every_response_is_reported_even_without_status_change() {
    init_logging();
    let state = polling(SyncJobStatus::Running);
    let (_state, effects) = observe(state, SyncJobStatus::Running);

    assert_eq!(
        effects,
        vec![Effect::Notify(Notification::StatusUpdated {
            snapshot: snapshot(SyncJobStatus::Running),
            changed: false,
        })]
    );
}

#[test]
fn running_to_idle_reloads_current_page_once() {
    init_logging();
    let state = polling(SyncJobStatus::Running);
    let (state, effects) = observe(state, SyncJobStatus::Idle);

    assert!(effects.contains(&Effect::Notify(Notification::RunFinished)));
    assert_eq!(page_loads(&effects), vec![1]);

    // Staying idle does not trigger another reload.
    let (_state, effects) = observe(state, SyncJobStatus::Idle);
    assert!(page_loads(&effects).is_empty());
}

#[test]
fn stopping_to_idle_reloads_displayed_page() {
    init_logging();
    let state = polling(SyncJobStatus::Stopping);
    let (state, effects) = update(state, Msg::PageClicked(2));
    let seq = match effects.as_slice() {
        [Effect::LoadPage { seq, .. }] => *seq,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            seq,
            result: Ok(Page {
                items: vec![FileRecord {
                    id: 1,
                    temp_filename: "t".into(),
                    original_filename: "a.txt".into(),
                    relative_dir_path: "".into(),
                    size: 1,
                    status: FileStatus::PendingSync,
                }],
                page_number: 2,
                page_size: 20,
                total_pages: 2,
                total_elements: 21,
            }),
        },
    );

    let (_state, effects) = observe(state, SyncJobStatus::Idle);
    assert_eq!(page_loads(&effects), vec![2]);
}

#[test]
fn paused_to_idle_is_not_a_finished_run() {
    init_logging();
    let state = polling(SyncJobStatus::Paused);
    let (_state, effects) = observe(state, SyncJobStatus::Idle);
    assert!(page_loads(&effects).is_empty());
    assert!(!effects.contains(&Effect::Notify(Notification::RunFinished)));
}

#[test]
fn poll_failure_stops_polling_until_restarted() {
    init_logging();
    let state = polling(SyncJobStatus::Running);
    let (state, effects) = update(state, Msg::PollTick);
    let seq = fetch_seq(&effects);
    let failure = RequestFailure::transient("connection refused");
    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            seq,
            result: Err(failure.clone()),
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::Notify(Notification::PollingFailed(failure)),
            Effect::StopTimer,
        ]
    );
    assert!(!state.view().polling);
    // Last known snapshot stays visible.
    assert_eq!(
        state.view().snapshot.map(|s| s.status),
        Some(SyncJobStatus::Running)
    );

    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());

    let (_state, effects) = update(state, Msg::StartPolling);
    assert_eq!(effects[0], Effect::StartTimer);
    fetch_seq(&effects);
}

#[test]
fn response_to_unknown_request_is_dropped() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::StartPolling);
    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            seq: 99,
            result: Ok(snapshot(SyncJobStatus::Running)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().snapshot, None);
}

#[test]
fn refresh_restarts_polling_and_reloads_page() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::RefreshClicked);
    assert_eq!(
        effects,
        vec![
            Effect::StartTimer,
            Effect::FetchStatus { seq: 1 },
            Effect::LoadPage {
                seq: 1,
                page_number: 1,
                page_size: syncctl_core::DEFAULT_PAGE_SIZE,
            },
        ]
    );
    assert!(state.view().page.loading);
}

fn page_request(effects: &[Effect]) -> (u64, u32) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LoadPage {
                seq, page_number, ..
            } => Some((*seq, *page_number)),
            _ => None,
        })
        .expect("a LoadPage effect")
}

fn pending(id: u64) -> FileRecord {
    FileRecord {
        id,
        temp_filename: format!("{id}.tmp"),
        original_filename: format!("upload-{id}.bin"),
        relative_dir_path: "inbox".into(),
        size: 64,
        status: FileStatus::PendingSync,
    }
}

fn answer(state: AppState, seq: u64, page: Page<FileRecord>) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::PageLoaded {
            seq,
            result: Ok(page),
        },
    )
}

/// Running job with page `page_number` of `total_pages` on display.
fn running_on_page(page_number: u32, total_pages: u32) -> AppState {
    let state = polling(SyncJobStatus::Running);
    let (state, effects) = update(state, Msg::PageClicked(page_number));
    let (seq, _) = page_request(&effects);
    let (state, _) = answer(
        state,
        seq,
        Page {
            items: vec![pending(u64::from(page_number) * 100)],
            page_number,
            page_size: 20,
            total_pages,
            total_elements: u64::from(total_pages) * 20,
        },
    );
    state
}

#[test]
fn finished_run_that_emptied_the_list_returns_to_first_page() {
    init_logging();
    let state = running_on_page(3, 3);
    let (state, effects) = observe(state, SyncJobStatus::Idle);
    let (seq, page_number) = page_request(&effects);
    assert_eq!(page_number, 3);

    let (state, effects) = answer(
        state,
        seq,
        Page {
            items: Vec::new(),
            page_number: 3,
            page_size: 20,
            total_pages: 0,
            total_elements: 0,
        },
    );
    let (seq, page_number) = page_request(&effects);
    assert_eq!(page_number, 1);
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::Notify(Notification::PageLoaded { .. }))));

    let (state, _) = answer(state, seq, Page::empty(20));
    let view = state.view();
    assert_eq!(view.page.page_number, 1);
    assert!(view.page.page_number <= view.page.total_pages.max(1));
    assert!(view.page.records.is_empty());
    assert!(!view.page.loading);
}

#[test]
fn finished_run_that_shrank_the_list_clamps_to_last_page() {
    init_logging();
    let state = running_on_page(3, 3);
    let (state, effects) = observe(state, SyncJobStatus::Idle);
    let (seq, _) = page_request(&effects);

    let (state, effects) = answer(
        state,
        seq,
        Page {
            items: Vec::new(),
            page_number: 3,
            page_size: 20,
            total_pages: 2,
            total_elements: 40,
        },
    );
    let (seq, page_number) = page_request(&effects);
    assert_eq!(page_number, 2);

    let (state, _) = answer(
        state,
        seq,
        Page {
            items: vec![pending(21)],
            page_number: 2,
            page_size: 20,
            total_pages: 2,
            total_elements: 21,
        },
    );
    assert_eq!(state.view().page.page_number, 2);
}
