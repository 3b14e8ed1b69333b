use chrono::NaiveTime;
use syncctl_core::{
    AppViewModel, ControlState, FailureClass, FileRecord, Notification, PageView, RequestFailure,
};

pub fn timestamped(now: NaiveTime, line: &str) -> String {
    format!("[{}] {line}", now.format("%H:%M:%S"))
}

pub fn notification_line(notification: &Notification) -> String {
    match notification {
        Notification::StatusUpdated { snapshot, changed } => {
            let marker = if *changed { "status changed" } else { "status" };
            format!(
                "{marker}: {} (pending {}, processed {}, failed {})",
                snapshot.status,
                snapshot.total_pending_count,
                snapshot.processed_in_current_run,
                snapshot.failed_in_current_run
            )
        }
        Notification::RunFinished => "sync run finished, reloading pending records".to_string(),
        Notification::PollingFailed(failure) => {
            format!("status polling stopped, {}; type `refresh` to retry", failure_text(failure))
        }
        Notification::CommandAccepted { command, message } => {
            if message.is_empty() {
                format!("{command} accepted")
            } else {
                format!("{command} accepted: {message}")
            }
        }
        Notification::CommandFailed { command, failure } => {
            format!("{command} failed, {}", failure_text(failure))
        }
        Notification::PageLoaded {
            page_number,
            total_pages,
        } => format!("page {page_number}/{} loaded", (*total_pages).max(1)),
        Notification::PageLoadFailed(failure) => {
            format!("loading pending records failed, {}", failure_text(failure))
        }
        Notification::DeletionConfirmed(id) => format!("record #{id} deleted"),
        Notification::DeletionFailed { id, failure } => {
            format!("deleting record #{id} failed, {}", failure_text(failure))
        }
        Notification::DeletionRefused { id, status } => {
            format!("record #{id} is {status}, only records pending deletion can be deleted")
        }
        Notification::BatchProgress(progress) | Notification::BatchCompleted(progress) => {
            progress.status_text.clone()
        }
        Notification::BatchRejected => "a batch deletion is already running".to_string(),
    }
}

fn failure_text(failure: &RequestFailure) -> String {
    match failure.class {
        FailureClass::Transient => format!("{} (retry possible)", failure.message),
        FailureClass::Rejection => failure.message.clone(),
    }
}

/// Status line followed by the control bar. Disabled controls are shown in
/// parentheses.
pub fn control_bar(view: &AppViewModel) -> String {
    let status = match &view.snapshot {
        Some(snapshot) => format!(
            "{} | pending {} | run {} done, {} failed",
            snapshot.status,
            format_with_commas(snapshot.total_pending_count),
            snapshot.processed_in_current_run,
            snapshot.failed_in_current_run
        ),
        None => "unknown".to_string(),
    };
    let polling = if view.polling { "on" } else { "off" };
    let busy = view
        .command_in_flight
        .map(|command| format!(" | sending {command}"))
        .unwrap_or_default();
    let affordances = &view.affordances;
    format!(
        "status {status} | polling {polling}{busy}\n{} {} {}",
        control(affordances.start),
        control(affordances.pause_resume),
        control(affordances.stop)
    )
}

fn control(state: ControlState) -> String {
    if state.enabled {
        format!("[{}]", state.label)
    } else {
        format!("({})", state.label)
    }
}

pub fn page_lines(page: &PageView) -> Vec<String> {
    let mut lines = vec![format!(
        "pending records, page {}/{} ({} total)",
        page.page_number,
        page.total_pages.max(1),
        format_with_commas(page.total_elements)
    )];
    if page.records.is_empty() {
        lines.push("  (none)".to_string());
    }
    lines.extend(page.records.iter().map(record_row));
    lines
}

fn record_row(record: &FileRecord) -> String {
    let path = if record.relative_dir_path.is_empty() {
        record.original_filename.clone()
    } else {
        format!("{}/{}", record.relative_dir_path, record.original_filename)
    };
    format!(
        "  #{id:<6} {status:<16} {path} ({size} B)",
        id = record.id,
        status = record.status.to_string(),
        size = format_with_commas(record.size)
    )
}

/// What to print after the view changed from `previous` to `next`.
pub fn view_changes(previous: Option<&AppViewModel>, next: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    let controls_changed = previous.map_or(true, |prev| {
        prev.snapshot.map(|s| s.status) != next.snapshot.map(|s| s.status)
            || prev.affordances != next.affordances
            || prev.command_in_flight != next.command_in_flight
            || prev.polling != next.polling
    });
    if controls_changed {
        lines.push(control_bar(next));
    }
    let page_changed = previous.map_or(true, |prev| {
        prev.page.page_number != next.page.page_number
            || prev.page.total_pages != next.page.total_pages
            || prev.page.records != next.page.records
    });
    if page_changed && !next.page.loading {
        lines.extend(page_lines(&next.page));
    }
    lines
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncctl_core::affordance::affordances_unknown;
    use syncctl_core::{
        affordances_for, BatchPhase, FileStatus, JobCommand, JobStatusSnapshot, SyncJobStatus,
    };

    fn view(status: Option<SyncJobStatus>) -> AppViewModel {
        AppViewModel {
            snapshot: status.map(|status| JobStatusSnapshot {
                total_pending_count: 12_345,
                processed_in_current_run: 3,
                failed_in_current_run: 1,
                ..JobStatusSnapshot::with_status(status)
            }),
            affordances: status.map_or_else(affordances_unknown, affordances_for),
            command_in_flight: None,
            polling: true,
            page: PageView {
                page_number: 1,
                total_pages: 0,
                total_elements: 0,
                loading: false,
                records: Vec::new(),
            },
            batch_phase: BatchPhase::NotStarted,
            batch: None,
            dirty: false,
        }
    }

    #[test]
    fn timestamp_prefix() {
        let now = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(timestamped(now, "ready"), "[09:05:07] ready");
    }

    #[test]
    fn control_bar_marks_disabled_controls() {
        assert_eq!(
            control_bar(&view(Some(SyncJobStatus::Paused))),
            "status paused | pending 12,345 | run 3 done, 1 failed | polling on\n\
             (开始同步) [继续] [停止]"
        );
        assert_eq!(
            control_bar(&view(None)),
            "status unknown | polling on\n(开始同步) (暂停) (停止)"
        );
    }

    #[test]
    fn control_bar_shows_command_in_flight() {
        let mut running = view(Some(SyncJobStatus::Running));
        running.command_in_flight = Some(JobCommand::Pause);
        running.affordances = running.affordances.all_disabled();
        assert!(control_bar(&running).contains("| sending pause\n(开始同步) (暂停) (停止)"));
    }

    #[test]
    fn failures_name_their_class() {
        let line = notification_line(&Notification::CommandFailed {
            command: JobCommand::Start,
            failure: RequestFailure::transient("request timed out"),
        });
        assert_eq!(line, "start failed, request timed out (retry possible)");
    }

    #[test]
    fn page_rows_join_directory_and_name() {
        let mut page = view(None).page;
        page.total_pages = 2;
        page.total_elements = 21;
        page.records = vec![FileRecord {
            id: 7,
            temp_filename: "7.tmp".to_string(),
            original_filename: "minutes.docx".to_string(),
            relative_dir_path: "board".to_string(),
            size: 5120,
            status: FileStatus::PendingDeletion,
        }];
        let lines = page_lines(&page);
        assert_eq!(lines[0], "pending records, page 1/2 (21 total)");
        assert!(lines[1].contains("board/minutes.docx (5,120 B)"));
    }

    #[test]
    fn unchanged_view_prints_nothing() {
        let first = view(Some(SyncJobStatus::Idle));
        assert_eq!(view_changes(None, &first).len(), 3);
        assert!(view_changes(Some(&first), &first.clone()).is_empty());

        let mut next = first.clone();
        next.snapshot = Some(JobStatusSnapshot::with_status(SyncJobStatus::Running));
        next.affordances = affordances_for(SyncJobStatus::Running);
        assert_eq!(view_changes(Some(&first), &next), vec![control_bar(&next)]);
    }
}
