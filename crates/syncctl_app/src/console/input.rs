//! Operator commands typed on stdin.

use syncctl_core::affordance::{LABEL_PAUSE, LABEL_RESUME};
use syncctl_core::{AppViewModel, JobCommand, Msg, RecordId};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  start | pause | resume | stop   control the sync job
  refresh                         poll now and reload the current page
  page N                          show page N of pending records
  confirm ID                      confirm deletion of one record
  batch ID [ID...]                confirm deletion of several records
  batch-all                       confirm every deletable record on this page
  help                            show this text
  quit                            stop polling and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Job(JobCommand),
    Refresh,
    Page(u32),
    Confirm(RecordId),
    Batch(Vec<RecordId>),
    BatchAll,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}`, type `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),
    #[error("{0} is not available right now")]
    Unavailable(&'static str),
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, InputError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();
    let command = match head.to_ascii_lowercase().as_str() {
        "start" => Command::Job(JobCommand::Start),
        "pause" => Command::Job(JobCommand::Pause),
        "resume" => Command::Job(JobCommand::Resume),
        "stop" => Command::Job(JobCommand::Stop),
        "refresh" | "r" => Command::Refresh,
        "page" | "p" => Command::Page(single_number(&rest, "page")?),
        "confirm" | "delete" => Command::Confirm(single_number(&rest, "confirm")?),
        "batch" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("batch"));
            }
            Command::Batch(
                rest.iter()
                    .map(|word| parse_number(word))
                    .collect::<Result<_, _>>()?,
            )
        }
        "batch-all" => Command::BatchAll,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn single_number<T: std::str::FromStr>(
    rest: &[&str],
    command: &'static str,
) -> Result<T, InputError> {
    match rest.first() {
        Some(word) => parse_number(word),
        None => Err(InputError::MissingArgument(command)),
    }
}

fn parse_number<T: std::str::FromStr>(word: &str) -> Result<T, InputError> {
    word.parse()
        .map_err(|_| InputError::InvalidNumber(word.to_string()))
}

impl Command {
    /// Message for the supervisor. Job commands are only offered while the
    /// matching control is enabled. `Help` and `Quit` are handled locally.
    pub fn into_msg(self, view: &AppViewModel) -> Result<Option<Msg>, InputError> {
        let msg = match self {
            Command::Job(command) => {
                offered(command, view)?;
                Msg::CommandClicked(command)
            }
            Command::Refresh => Msg::RefreshClicked,
            Command::Page(page_number) => Msg::PageClicked(page_number),
            Command::Confirm(id) => Msg::ConfirmDeletionClicked(id),
            Command::Batch(ids) => Msg::BatchConfirmClicked(ids),
            Command::BatchAll => Msg::BatchConfirmClicked(
                view.page
                    .records
                    .iter()
                    .filter(|record| record.is_deletable())
                    .map(|record| record.id)
                    .collect(),
            ),
            Command::Help | Command::Quit => return Ok(None),
        };
        Ok(Some(msg))
    }
}

fn offered(command: JobCommand, view: &AppViewModel) -> Result<(), InputError> {
    let controls = &view.affordances;
    let (control, label) = match command {
        JobCommand::Start => (controls.start, controls.start.label),
        JobCommand::Pause => (controls.pause_resume, LABEL_PAUSE),
        JobCommand::Resume => (controls.pause_resume, LABEL_RESUME),
        JobCommand::Stop => (controls.stop, controls.stop.label),
    };
    if control.enabled && control.label == label {
        Ok(())
    } else {
        Err(InputError::Unavailable(label))
    }
}
