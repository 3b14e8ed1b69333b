use std::sync::Arc;

use ctl_logging::{ctl_debug, ctl_info};
use syncctl_core::{
    update, AppState, AppViewModel, Effect, JobCommand, Msg, RecordId, RequestFailure,
};
use tokio::sync::mpsc;

use crate::facade::{HttpJobFacade, JobFacade};
use crate::observer::{IntervalObserver, StatusObserver};
use crate::sink::PresentationSink;
use crate::{ControllerSettings, FacadeError};

pub(crate) enum Input {
    Dispatch(Msg),
    Dispose,
}

/// Cloneable entry point into a running supervisor.
#[derive(Clone)]
pub struct SupervisorHandle {
    tx: mpsc::UnboundedSender<Input>,
}

impl SupervisorHandle {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Input>) -> Self {
        Self { tx }
    }

    /// Returns false once the supervisor is gone.
    pub fn dispatch(&self, msg: Msg) -> bool {
        self.tx.send(Input::Dispatch(msg)).is_ok()
    }

    pub fn start_polling(&self) -> bool {
        self.dispatch(Msg::StartPolling)
    }

    pub fn stop_polling(&self) -> bool {
        self.dispatch(Msg::StopPolling)
    }

    pub fn command(&self, command: JobCommand) -> bool {
        self.dispatch(Msg::CommandClicked(command))
    }

    pub fn load_page(&self, page_number: u32) -> bool {
        self.dispatch(Msg::PageClicked(page_number))
    }

    pub fn confirm_deletion(&self, id: RecordId) -> bool {
        self.dispatch(Msg::ConfirmDeletionClicked(id))
    }

    pub fn confirm_batch(&self, ids: Vec<RecordId>) -> bool {
        self.dispatch(Msg::BatchConfirmClicked(ids))
    }

    /// Stops polling and ends the control loop.
    pub fn dispose(&self) {
        let _ = self.tx.send(Input::Dispose);
    }
}

/// Owns the controller state and runs the single control loop: every
/// message is applied by the reducer here, and every facade result comes
/// back as a message.
pub struct Supervisor {
    state: AppState,
    facade: Arc<dyn JobFacade>,
    observer: Box<dyn StatusObserver>,
    sink: Arc<dyn PresentationSink>,
    tx: mpsc::UnboundedSender<Input>,
    rx: mpsc::UnboundedReceiver<Input>,
    disposed: bool,
}

impl Supervisor {
    pub fn new(
        facade: Arc<dyn JobFacade>,
        observer: Box<dyn StatusObserver>,
        sink: Arc<dyn PresentationSink>,
        page_size: u32,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::with_page_size(page_size),
            facade,
            observer,
            sink,
            tx,
            rx,
            disposed: false,
        }
    }

    /// HTTP facade and interval polling configured from `settings`.
    pub fn from_settings(
        settings: &ControllerSettings,
        sink: Arc<dyn PresentationSink>,
    ) -> Result<Self, FacadeError> {
        let facade = HttpJobFacade::new(settings)?;
        ctl_info!("supervising sync job at {}", facade.base_url());
        Ok(Self::new(
            Arc::new(facade),
            Box::new(IntervalObserver::new(settings.poll_interval)),
            sink,
            settings.page_size,
        ))
    }

    pub fn handle(&self) -> SupervisorHandle {
        SupervisorHandle::new(self.tx.clone())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Applies one message and executes the resulting effects.
    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        for effect in effects {
            self.execute(effect);
        }
        if was_dirty {
            self.sink.render(&self.state.view());
        }
    }

    /// Waits for the next input and handles it. Returns false once disposed.
    pub async fn step(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        match self.rx.recv().await {
            Some(Input::Dispatch(msg)) => {
                self.dispatch(msg);
                true
            }
            Some(Input::Dispose) | None => {
                self.dispose();
                false
            }
        }
    }

    pub async fn run(mut self) {
        while self.step().await {}
        ctl_info!("supervisor stopped");
    }

    /// Stops the poll timer. In-flight requests finish but are not applied.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.observer.stop();
            self.disposed = true;
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::StartTimer => {
                let handle = self.handle();
                self.observer.start(handle);
            }
            Effect::StopTimer => self.observer.stop(),
            Effect::Notify(notification) => self.sink.notify(notification),
            Effect::FetchStatus { seq } => {
                let facade = Arc::clone(&self.facade);
                let handle = self.handle();
                tokio::spawn(async move {
                    ctl_debug!("getStatus #{}", seq);
                    let result = facade.get_status().await.map_err(failure);
                    handle.dispatch(Msg::StatusFetched { seq, result });
                });
            }
            Effect::SendCommand(command) => {
                let facade = Arc::clone(&self.facade);
                let handle = self.handle();
                tokio::spawn(async move {
                    ctl_debug!("sending {}", command);
                    let result = facade.send_command(command).await.map_err(failure);
                    handle.dispatch(Msg::CommandCompleted { command, result });
                });
            }
            Effect::LoadPage {
                seq,
                page_number,
                page_size,
            } => {
                let facade = Arc::clone(&self.facade);
                let handle = self.handle();
                tokio::spawn(async move {
                    ctl_debug!("listPending page={} size={} #{}", page_number, page_size, seq);
                    let result = facade
                        .list_pending(page_number, page_size)
                        .await
                        .map_err(failure);
                    handle.dispatch(Msg::PageLoaded { seq, result });
                });
            }
            Effect::ConfirmDeletion { id, origin } => {
                let facade = Arc::clone(&self.facade);
                let handle = self.handle();
                tokio::spawn(async move {
                    ctl_debug!("confirmDeletion {} ({:?})", id, origin);
                    let result = facade.confirm_deletion(id).await.map_err(failure);
                    handle.dispatch(Msg::DeletionCompleted { id, origin, result });
                });
            }
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn failure(err: FacadeError) -> RequestFailure {
    err.into()
}

