use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use glimpse_core::{
    ChatModel, ChatRequest, ChatResponse, CodeLanguage, GlimpseError, Message, ViewState,
};
use glimpse_gateway::Gateway;
use glimpse_memory::InMemorySessionStore;
use glimpse_models::ScriptedChatModel;
use glimpse_shell::{
    Direction, EventBus, ScreenCapture, Screenshot, ShellAction, ShellController, ShellEvent,
    WindowHandle,
};
use serde_json::json;

struct FixedCapture;

#[async_trait]
impl ScreenCapture for FixedCapture {
    async fn capture(&self) -> Result<Screenshot, GlimpseError> {
        Ok(Screenshot {
            path: "/tmp/shot-1.png".to_string(),
            preview: "data:image/png;base64,AAAA".to_string(),
        })
    }
}

struct FailingCapture;

#[async_trait]
impl ScreenCapture for FailingCapture {
    async fn capture(&self) -> Result<Screenshot, GlimpseError> {
        Err(GlimpseError::Capture("display gone".into()))
    }
}

#[derive(Default)]
struct RecordingWindow {
    nudges: Mutex<Vec<(i32, i32)>>,
    toggles: AtomicUsize,
}

impl WindowHandle for RecordingWindow {
    fn nudge(&self, dx: i32, dy: i32) {
        self.nudges.lock().unwrap().push((dx, dy));
    }

    fn toggle_visibility(&self) {
        self.toggles.fetch_add(1, Ordering::SeqCst);
    }
}

/// Wraps a scripted model with a delay so a cancel can land mid-flight.
struct DelayedModel {
    inner: ScriptedChatModel,
    delay: Duration,
}

#[async_trait]
impl ChatModel for DelayedModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, GlimpseError> {
        tokio::time::sleep(self.delay).await;
        self.inner.chat(request).await
    }
}

fn ai(content: &str) -> ChatResponse {
    ChatResponse {
        message: Message::ai(content),
        usage: None,
    }
}

fn solution_body() -> String {
    json!({
        "code": "print(1)",
        "thoughts": ["t"],
        "time_complexity": "tc",
        "space_complexity": "sc"
    })
    .to_string()
}

fn controller_with(model: Arc<dyn ChatModel>) -> (Arc<ShellController>, Arc<RecordingWindow>) {
    let gateway = Arc::new(Gateway::new(model, Arc::new(InMemorySessionStore::new())));
    let window = Arc::new(RecordingWindow::default());
    let controller = Arc::new(ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        window.clone(),
        EventBus::default(),
    ));
    (controller, window)
}

#[tokio::test]
async fn capture_queues_screenshot_and_emits_event() {
    let gateway = Arc::new(Gateway::new(
        Arc::new(ScriptedChatModel::new(vec![])),
        Arc::new(InMemorySessionStore::new()),
    ));
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let controller = ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        Arc::new(RecordingWindow::default()),
        bus,
    );

    controller.handle(ShellAction::CaptureScreenshot).await;

    assert_eq!(controller.queue_len().await, 1);
    assert_eq!(
        events.recv().await.unwrap(),
        ShellEvent::ScreenshotTaken {
            path: "/tmp/shot-1.png".to_string(),
            preview: "data:image/png;base64,AAAA".to_string(),
        }
    );
}

#[tokio::test]
async fn capture_failure_is_swallowed() {
    let gateway = Arc::new(Gateway::new(
        Arc::new(ScriptedChatModel::new(vec![])),
        Arc::new(InMemorySessionStore::new()),
    ));
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let controller = ShellController::new(
        gateway,
        Arc::new(FailingCapture),
        Arc::new(RecordingWindow::default()),
        bus,
    );

    controller.handle(ShellAction::CaptureScreenshot).await;

    assert_eq!(controller.queue_len().await, 0);
    assert!(matches!(
        events.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn empty_queue_processing_is_a_no_op() {
    let gateway = Arc::new(Gateway::new(
        Arc::new(ScriptedChatModel::new(vec![])),
        Arc::new(InMemorySessionStore::new()),
    ));
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let controller = ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        Arc::new(RecordingWindow::default()),
        bus,
    );

    controller.handle(ShellAction::ProcessQueue).await;

    assert!(matches!(
        events.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn processing_moves_queue_view_to_solutions() {
    let model = Arc::new(ScriptedChatModel::new(vec![
        ai("extracted problem"),
        ai(&solution_body()),
    ]));
    let gateway = Arc::new(Gateway::new(model, Arc::new(InMemorySessionStore::new())));
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let controller = ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        Arc::new(RecordingWindow::default()),
        bus,
    );

    controller.handle(ShellAction::CaptureScreenshot).await;
    controller.handle(ShellAction::ProcessQueue).await;

    assert_eq!(controller.view().await, ViewState::Solutions);
    assert_eq!(controller.queue_len().await, 0);
    let solution = controller.last_solution().await.unwrap();
    assert_eq!(solution.code, "print(1)");

    assert!(matches!(
        events.recv().await.unwrap(),
        ShellEvent::ScreenshotTaken { .. }
    ));
    assert_eq!(events.recv().await.unwrap(), ShellEvent::SolutionStart);
}

#[tokio::test]
async fn processing_from_solutions_view_debugs() {
    let model = Arc::new(ScriptedChatModel::new(vec![
        ai("extracted problem"),
        ai(&solution_body()),
        ai("extracted follow-up"),
        ai(&solution_body()),
    ]));
    let gateway = Arc::new(Gateway::new(model, Arc::new(InMemorySessionStore::new())));
    let controller = ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        Arc::new(RecordingWindow::default()),
        EventBus::default(),
    );

    controller.handle(ShellAction::CaptureScreenshot).await;
    controller.handle(ShellAction::ProcessQueue).await;
    assert_eq!(controller.view().await, ViewState::Solutions);

    controller.handle(ShellAction::CaptureScreenshot).await;
    controller.handle(ShellAction::ProcessQueue).await;
    assert_eq!(controller.view().await, ViewState::Debug);
}

#[tokio::test]
async fn gateway_failure_emits_solution_error() {
    // Scripted model with no responses: the first call errors out.
    let gateway = Arc::new(Gateway::new(
        Arc::new(ScriptedChatModel::new(vec![])),
        Arc::new(InMemorySessionStore::new()),
    ));
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let controller = ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        Arc::new(RecordingWindow::default()),
        bus,
    );

    controller.handle(ShellAction::CaptureScreenshot).await;
    controller.handle(ShellAction::ProcessQueue).await;

    assert_eq!(controller.view().await, ViewState::Queue);
    // skip the screenshot event
    events.recv().await.unwrap();
    assert_eq!(events.recv().await.unwrap(), ShellEvent::SolutionStart);
    assert!(matches!(
        events.recv().await.unwrap(),
        ShellEvent::SolutionError { .. }
    ));
}

#[tokio::test]
async fn cancel_resets_state_and_discards_late_result() {
    let model = Arc::new(DelayedModel {
        inner: ScriptedChatModel::new(vec![ai("extracted"), ai(&solution_body())]),
        delay: Duration::from_millis(100),
    });
    let gateway = Arc::new(Gateway::new(model, Arc::new(InMemorySessionStore::new())));
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let controller = Arc::new(ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        Arc::new(RecordingWindow::default()),
        bus,
    ));

    controller.handle(ShellAction::CaptureScreenshot).await;

    let worker = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.process_queue().await })
    };

    // Let processing get past the first model call, then cancel.
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.handle(ShellAction::CancelAndReset).await;

    // The reset is visible immediately, before the worker finishes.
    assert_eq!(controller.view().await, ViewState::Queue);
    assert_eq!(controller.queue_len().await, 0);

    worker.await.unwrap();

    // The late result must not have been applied to the reset state.
    assert_eq!(controller.view().await, ViewState::Queue);
    assert!(controller.last_solution().await.is_none());

    events.recv().await.unwrap(); // screenshot-taken
    assert_eq!(events.recv().await.unwrap(), ShellEvent::SolutionStart);
    assert_eq!(events.recv().await.unwrap(), ShellEvent::ResetView);
    assert_eq!(events.recv().await.unwrap(), ShellEvent::Reset);
    assert!(matches!(
        events.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
}

#[tokio::test]
async fn language_shortcut_updates_state_and_broadcasts() {
    let gateway = Arc::new(Gateway::new(
        Arc::new(ScriptedChatModel::new(vec![])),
        Arc::new(InMemorySessionStore::new()),
    ));
    let bus = EventBus::default();
    let mut events = bus.subscribe();
    let controller = ShellController::new(
        gateway,
        Arc::new(FixedCapture),
        Arc::new(RecordingWindow::default()),
        bus,
    );

    controller
        .handle(ShellAction::SetLanguage(CodeLanguage::Cpp))
        .await;

    assert_eq!(controller.language().await, CodeLanguage::Cpp);
    assert_eq!(
        events.recv().await.unwrap(),
        ShellEvent::ChangeLanguage(CodeLanguage::Cpp)
    );
}

#[tokio::test]
async fn window_actions_reach_the_handle() {
    let (controller, window) = controller_with(Arc::new(ScriptedChatModel::new(vec![])));

    controller
        .handle(ShellAction::MoveWindow(Direction::Left))
        .await;
    controller
        .handle(ShellAction::MoveWindow(Direction::Down))
        .await;
    controller.handle(ShellAction::ToggleWindow).await;

    let nudges = window.nudges.lock().unwrap().clone();
    assert_eq!(nudges, vec![(-50, 0), (0, 50)]);
    assert_eq!(window.toggles.load(Ordering::SeqCst), 1);
}
