use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use chrono::Local;
use ctl_logging::{ctl_info, ctl_warn};
use syncctl_core::{AppViewModel, Notification};
use syncctl_engine::{ChannelSink, Supervisor, SupervisorHandle, UiEvent};
use tokio::sync::mpsc;

use super::config::{AppConfig, BASE_URL_ENV};
use super::input::{parse_command, Command, HELP};
use super::{logging, render};

pub async fn run_app(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path.as_deref())?
        .with_base_url_override(std::env::var(BASE_URL_ENV).ok());
    logging::initialize(&config.log);
    let settings = config.controller_settings()?;

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    let supervisor = Supervisor::from_settings(&settings, Arc::new(ChannelSink::new(ui_tx)))
        .with_context(|| format!("cannot use server url {}", settings.base_url))?;
    let handle = supervisor.handle();
    let mut view = supervisor.view();
    let control_loop = tokio::spawn(supervisor.run());

    let mut lines = spawn_stdin_reader();
    println!("syncctl: controlling {}. Type `help` for commands.", settings.base_url);
    handle.start_polling();
    handle.load_page(1);

    loop {
        tokio::select! {
            event = ui_rx.recv() => match event {
                // Every poll reports; only changes are worth a line.
                Some(UiEvent::Notification(Notification::StatusUpdated { changed: false, .. })) => {}
                Some(UiEvent::Notification(notification)) => {
                    print_line(&render::notification_line(&notification));
                }
                Some(UiEvent::ViewChanged(next)) => {
                    for line in render::view_changes(Some(&view), &next) {
                        println!("{line}");
                    }
                    view = next;
                }
                None => break,
            },
            line = lines.recv() => {
                let Some(line) = line else {
                    ctl_info!("stdin closed, shutting down");
                    handle.dispose();
                    break;
                };
                if !handle_line(&line, &view, &handle) {
                    handle.dispose();
                    break;
                }
            }
        }
    }

    if let Err(err) = control_loop.await {
        ctl_warn!("control loop ended abnormally: {}", err);
    }
    Ok(())
}

/// Returns false when the operator asked to quit.
fn handle_line(line: &str, view: &AppViewModel, handle: &SupervisorHandle) -> bool {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(err) => {
            println!("{err}");
            return true;
        }
    };
    match command {
        Command::Quit => return false,
        Command::Help => println!("{HELP}"),
        command => match command.into_msg(view) {
            Ok(Some(msg)) => {
                handle.dispatch(msg);
            }
            Ok(None) => {}
            Err(err) => println!("{err}"),
        },
    }
    true
}

fn print_line(line: &str) {
    println!("{}", render::timestamped(Local::now().time(), line));
}

/// Blocking stdin reads run on their own thread and are forwarded line by line.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
