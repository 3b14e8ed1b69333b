//! Sync controller engine: facade I/O and effect execution.
mod error;
mod facade;
mod observer;
mod settings;
mod sink;
mod supervisor;
mod wire;

pub use error::FacadeError;
pub use facade::{HttpJobFacade, JobFacade};
pub use observer::{IntervalObserver, StatusObserver};
pub use settings::{ControllerSettings, DEFAULT_BASE_URL};
pub use sink::{ChannelSink, PresentationSink, UiEvent};
pub use supervisor::{Supervisor, SupervisorHandle};
