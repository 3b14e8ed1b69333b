//! Control affordances derived from the observed job status.

use crate::SyncJobStatus;

pub const LABEL_START: &str = "开始同步";
pub const LABEL_PAUSE: &str = "暂停";
pub const LABEL_RESUME: &str = "继续";
pub const LABEL_STOP: &str = "停止";
pub const LABEL_STOPPING: &str = "正在停止...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub enabled: bool,
    pub label: &'static str,
}

impl ControlState {
    const fn enabled(label: &'static str) -> Self {
        Self {
            enabled: true,
            label,
        }
    }

    const fn disabled(label: &'static str) -> Self {
        Self {
            enabled: false,
            label,
        }
    }
}

/// The start control, the combined pause/resume toggle and the stop control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub start: ControlState,
    pub pause_resume: ControlState,
    pub stop: ControlState,
}

impl Affordances {
    /// Every control disabled, labels kept.
    pub fn all_disabled(self) -> Self {
        Self {
            start: ControlState::disabled(self.start.label),
            pause_resume: ControlState::disabled(self.pause_resume.label),
            stop: ControlState::disabled(self.stop.label),
        }
    }
}

pub fn affordances_for(status: SyncJobStatus) -> Affordances {
    match status {
        SyncJobStatus::Idle => Affordances {
            start: ControlState::enabled(LABEL_START),
            pause_resume: ControlState::disabled(LABEL_PAUSE),
            stop: ControlState::disabled(LABEL_STOP),
        },
        SyncJobStatus::Running => Affordances {
            start: ControlState::disabled(LABEL_START),
            pause_resume: ControlState::enabled(LABEL_PAUSE),
            stop: ControlState::enabled(LABEL_STOP),
        },
        SyncJobStatus::Paused => Affordances {
            start: ControlState::disabled(LABEL_START),
            pause_resume: ControlState::enabled(LABEL_RESUME),
            stop: ControlState::enabled(LABEL_STOP),
        },
        SyncJobStatus::Stopping => Affordances {
            start: ControlState::disabled(LABEL_START),
            pause_resume: ControlState::disabled(LABEL_PAUSE),
            stop: ControlState::disabled(LABEL_STOPPING),
        },
    }
}

/// Affordances before any status has been observed.
pub fn affordances_unknown() -> Affordances {
    affordances_for(SyncJobStatus::Idle).all_disabled()
}
