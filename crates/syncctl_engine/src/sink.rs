use syncctl_core::{AppViewModel, Notification};
use tokio::sync::mpsc;

/// Inbound contract of the presentation layer.
pub trait PresentationSink: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Called after a message changed anything visible.
    fn render(&self, _view: &AppViewModel) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Notification(Notification),
    ViewChanged(AppViewModel),
}

/// Forwards everything to a channel drained by the UI thread.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self { tx }
    }
}

impl PresentationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        let _ = self.tx.send(UiEvent::Notification(notification));
    }

    fn render(&self, view: &AppViewModel) {
        let _ = self.tx.send(UiEvent::ViewChanged(view.clone()));
    }
}
