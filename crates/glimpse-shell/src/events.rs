use glimpse_core::CodeLanguage;
use tokio::sync::broadcast;

/// Signals pushed to the UI layer over the desktop event channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    ScreenshotTaken { path: String, preview: String },
    ResetView,
    Reset,
    ChangeLanguage(CodeLanguage),
    SolutionStart,
    SolutionError { message: String },
}

/// Broadcast bus decoupling the controller from any specific UI transport.
///
/// Delivery is at-most-once with no acknowledgement: emitting with no
/// subscribers, or past a lagging subscriber's buffer, silently drops the
/// event.
pub struct EventBus {
    sender: broadcast::Sender<ShellEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: ShellEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}
