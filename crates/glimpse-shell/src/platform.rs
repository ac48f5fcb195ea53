use async_trait::async_trait;
use glimpse_core::GlimpseError;

/// A captured screenshot: where it landed on disk and a data-URI preview
/// suitable for both the UI and the extraction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Screenshot {
    pub path: String,
    pub preview: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// OS screen capture, injected so the controller stays platform-free.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    async fn capture(&self) -> Result<Screenshot, GlimpseError>;
}

/// Handle to the application window. Implementations wrap the windowing
/// toolkit; all operations are fire-and-forget.
pub trait WindowHandle: Send + Sync {
    fn nudge(&self, dx: i32, dy: i32);
    fn toggle_visibility(&self);
}
