mod bindings;
mod controller;
mod events;
mod platform;

pub use bindings::{default_bindings, Binding, ShellAction};
pub use controller::ShellController;
pub use events::{EventBus, ShellEvent};
pub use platform::{Direction, ScreenCapture, Screenshot, WindowHandle};
