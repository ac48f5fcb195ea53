use std::sync::Arc;

use glimpse_core::{CodeLanguage, Solution, ViewState};
use glimpse_gateway::Gateway;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::bindings::ShellAction;
use crate::events::{EventBus, ShellEvent};
use crate::platform::{Direction, ScreenCapture, Screenshot, WindowHandle};

const MOVE_STEP: i32 = 50;

struct ShellState {
    view: ViewState,
    queue: Vec<Screenshot>,
    language: CodeLanguage,
    session_id: String,
    last_solution: Option<Solution>,
    cancel: CancellationToken,
}

impl ShellState {
    fn new() -> Self {
        Self {
            view: ViewState::Queue,
            queue: Vec::new(),
            language: CodeLanguage::Python,
            session_id: Uuid::new_v4().to_string(),
            last_solution: None,
            cancel: CancellationToken::new(),
        }
    }
}

/// Owns the shared UI-facing state and executes shortcut actions.
///
/// Cancellation is cooperative: cancel-and-reset resets the state
/// immediately and flips the live token, and in-flight processing checks
/// the token it captured at start before applying any result — a response
/// arriving after reset is discarded, never written into the fresh state.
pub struct ShellController {
    gateway: Arc<Gateway>,
    capture: Arc<dyn ScreenCapture>,
    window: Arc<dyn WindowHandle>,
    bus: EventBus,
    state: Mutex<ShellState>,
}

impl ShellController {
    pub fn new(
        gateway: Arc<Gateway>,
        capture: Arc<dyn ScreenCapture>,
        window: Arc<dyn WindowHandle>,
        bus: EventBus,
    ) -> Self {
        Self {
            gateway,
            capture,
            window,
            bus,
            state: Mutex::new(ShellState::new()),
        }
    }

    /// Dispatch one shortcut action. Nothing is returned to the invoker;
    /// outcomes surface through state and the event bus.
    pub async fn handle(&self, action: ShellAction) {
        match action {
            ShellAction::CaptureScreenshot => self.capture_screenshot().await,
            ShellAction::ProcessQueue => self.process_queue().await,
            ShellAction::CancelAndReset => self.cancel_and_reset().await,
            ShellAction::MoveWindow(direction) => self.move_window(direction),
            ShellAction::ToggleWindow => self.window.toggle_visibility(),
            ShellAction::SetLanguage(language) => self.set_language(language).await,
        }
    }

    async fn capture_screenshot(&self) {
        match self.capture.capture().await {
            Ok(screenshot) => {
                let mut state = self.state.lock().await;
                state.queue.push(screenshot.clone());
                drop(state);
                self.bus.emit(ShellEvent::ScreenshotTaken {
                    path: screenshot.path,
                    preview: screenshot.preview,
                });
            }
            Err(error) => {
                tracing::error!(%error, "screenshot capture failed");
            }
        }
    }

    /// Drain the queue through extract + generate (queue view) or
    /// extract + debug (solutions/debug views).
    pub async fn process_queue(&self) {
        let (screenshots, view, language, session_id, token) = {
            let state = self.state.lock().await;
            if state.queue.is_empty() {
                tracing::debug!("no screenshots queued, nothing to process");
                return;
            }
            (
                state.queue.clone(),
                state.view,
                state.language,
                state.session_id.clone(),
                state.cancel.clone(),
            )
        };

        self.bus.emit(ShellEvent::SolutionStart);

        let images: Vec<String> = screenshots.into_iter().map(|s| s.preview).collect();
        let problem_text = match self
            .gateway
            .extract_text(&images, language.as_str())
            .await
        {
            Ok(text) => text,
            Err(error) => {
                self.report_failure(&token, error.to_string());
                return;
            }
        };
        if token.is_cancelled() {
            tracing::debug!("processing cancelled after extraction, discarding");
            return;
        }

        let result = match view {
            ViewState::Queue => {
                self.gateway
                    .generate_solution(&problem_text, language.as_str(), Some(&session_id))
                    .await
            }
            ViewState::Solutions | ViewState::Debug => {
                self.gateway
                    .debug_solution(&problem_text, language.as_str(), Some(&session_id))
                    .await
            }
        };

        let parsed = match result {
            Ok(parsed) => parsed,
            Err(error) => {
                self.report_failure(&token, error.to_string());
                return;
            }
        };
        let mut state = self.state.lock().await;
        // Re-check under the lock: a reset that raced the response wins.
        if token.is_cancelled() {
            tracing::debug!("processing cancelled mid-flight, discarding result");
            return;
        }
        state.view = match view {
            ViewState::Queue => ViewState::Solutions,
            ViewState::Solutions | ViewState::Debug => ViewState::Debug,
        };
        state.queue.clear();
        state.last_solution = Some(parsed.into_solution());
    }

    fn report_failure(&self, token: &CancellationToken, message: String) {
        if token.is_cancelled() {
            tracing::debug!("processing cancelled, suppressing error event");
            return;
        }
        tracing::error!(%message, "solution processing failed");
        self.bus.emit(ShellEvent::SolutionError { message });
    }

    /// Cancel in-flight work and put the shell back in its initial shape.
    pub async fn cancel_and_reset(&self) {
        {
            let mut state = self.state.lock().await;
            state.cancel.cancel();
            state.cancel = CancellationToken::new();
            state.queue.clear();
            state.view = ViewState::Queue;
            state.last_solution = None;
            state.session_id = Uuid::new_v4().to_string();
        }
        self.bus.emit(ShellEvent::ResetView);
        self.bus.emit(ShellEvent::Reset);
    }

    fn move_window(&self, direction: Direction) {
        let (dx, dy) = match direction {
            Direction::Left => (-MOVE_STEP, 0),
            Direction::Right => (MOVE_STEP, 0),
            Direction::Up => (0, -MOVE_STEP),
            Direction::Down => (0, MOVE_STEP),
        };
        self.window.nudge(dx, dy);
    }

    async fn set_language(&self, language: CodeLanguage) {
        let mut state = self.state.lock().await;
        state.language = language;
        drop(state);
        self.bus.emit(ShellEvent::ChangeLanguage(language));
    }

    /// Cancel any in-flight processing; called when the application quits,
    /// after the OS bindings have been unregistered.
    pub async fn shutdown(&self) {
        let state = self.state.lock().await;
        state.cancel.cancel();
    }

    pub async fn view(&self) -> ViewState {
        self.state.lock().await.view
    }

    pub async fn queue_len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    pub async fn language(&self) -> CodeLanguage {
        self.state.lock().await.language
    }

    pub async fn last_solution(&self) -> Option<Solution> {
        self.state.lock().await.last_solution.clone()
    }
}
