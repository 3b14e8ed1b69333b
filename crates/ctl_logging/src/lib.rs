#![deny(missing_docs)]
//! Shared logging utilities for the sync controller workspace.
//!
//! Every crate logs through the `ctl_*` macros so that all controller output
//! lands under one log target and can be filtered as a unit.

/// Log target used by every `ctl_*` macro.
pub const TARGET: &str = "syncctl";

/// Logs a trace-level message under the controller target.
#[macro_export]
macro_rules! ctl_trace {
    ($($arg:tt)*) => {{
        log::trace!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a debug-level message under the controller target.
#[macro_export]
macro_rules! ctl_debug {
    ($($arg:tt)*) => {{
        log::debug!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an info-level message under the controller target.
#[macro_export]
macro_rules! ctl_info {
    ($($arg:tt)*) => {{
        log::info!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs a warn-level message under the controller target.
#[macro_export]
macro_rules! ctl_warn {
    ($($arg:tt)*) => {{
        log::warn!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Logs an error-level message under the controller target.
#[macro_export]
macro_rules! ctl_error {
    ($($arg:tt)*) => {{
        log::error!(target: $crate::TARGET, $($arg)*);
    }};
}

/// Initializes a terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str(TARGET)
        .build();

    // Another test in the same binary may have won the race.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Never,
    )]);
}
