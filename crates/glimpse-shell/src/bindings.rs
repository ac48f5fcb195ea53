use glimpse_core::CodeLanguage;

use crate::platform::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    CaptureScreenshot,
    ProcessQueue,
    CancelAndReset,
    MoveWindow(Direction),
    ToggleWindow,
    SetLanguage(CodeLanguage),
}

/// A global accelerator and the action it triggers. Registration against
/// the OS shortcut API happens outside this crate; implementations are
/// expected to unregister everything on shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub accelerator: &'static str,
    pub action: ShellAction,
}

/// The fixed binding table.
///
/// `Alt+B` duplicates the visibility toggle for platforms where
/// `CommandOrControl+B` collides with browser shortcuts.
pub fn default_bindings() -> Vec<Binding> {
    vec![
        Binding {
            accelerator: "CommandOrControl+H",
            action: ShellAction::CaptureScreenshot,
        },
        Binding {
            accelerator: "CommandOrControl+Enter",
            action: ShellAction::ProcessQueue,
        },
        Binding {
            accelerator: "CommandOrControl+R",
            action: ShellAction::CancelAndReset,
        },
        Binding {
            accelerator: "CommandOrControl+Left",
            action: ShellAction::MoveWindow(Direction::Left),
        },
        Binding {
            accelerator: "CommandOrControl+Right",
            action: ShellAction::MoveWindow(Direction::Right),
        },
        Binding {
            accelerator: "CommandOrControl+Up",
            action: ShellAction::MoveWindow(Direction::Up),
        },
        Binding {
            accelerator: "CommandOrControl+Down",
            action: ShellAction::MoveWindow(Direction::Down),
        },
        Binding {
            accelerator: "CommandOrControl+B",
            action: ShellAction::ToggleWindow,
        },
        Binding {
            accelerator: "Alt+B",
            action: ShellAction::ToggleWindow,
        },
        Binding {
            accelerator: "Alt+P",
            action: ShellAction::SetLanguage(CodeLanguage::Python),
        },
        Binding {
            accelerator: "Alt+J",
            action: ShellAction::SetLanguage(CodeLanguage::Java),
        },
        Binding {
            accelerator: "Alt+C",
            action: ShellAction::SetLanguage(CodeLanguage::Cpp),
        },
    ]
}
