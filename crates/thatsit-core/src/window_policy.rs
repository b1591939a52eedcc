//! Phase → window behaviour lookup.
//!
//! The core does not touch any window itself. Front ends read this table
//! whenever the phase changes and apply the flags with whatever the host
//! offers (a desktop window manager, or the terminal in `thatsit-cli`).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::lock::Phase;

/// How pointer and keyboard input reach the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputCapture {
    /// Normal interactive window.
    Interactive,
    /// Input falls through to whatever is underneath, except over the
    /// status widget.
    PassthroughExceptWidget,
    /// Everything is captured by the overlay.
    Captured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    pub fullscreen: bool,
    pub always_on_top: bool,
    pub visible_on_all_workspaces: bool,
    pub movable: bool,
    pub resizable: bool,
    pub input: InputCapture,
    pub steal_focus: bool,
    pub quit_blocked: bool,
    /// How often the flags must be re-applied in case something else
    /// knocked them off.
    pub reassert_interval: Option<Duration>,
}

/// Watchdog period while locked.
pub const LOCK_REASSERT_INTERVAL: Duration = Duration::from_millis(500);

impl WindowPolicy {
    pub const fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Configuring => Self {
                fullscreen: false,
                always_on_top: false,
                visible_on_all_workspaces: false,
                movable: true,
                resizable: true,
                input: InputCapture::Interactive,
                steal_focus: false,
                quit_blocked: false,
                reassert_interval: None,
            },
            Phase::CountingDown => Self {
                fullscreen: true,
                always_on_top: true,
                visible_on_all_workspaces: true,
                movable: false,
                resizable: false,
                input: InputCapture::PassthroughExceptWidget,
                steal_focus: false,
                quit_blocked: false,
                reassert_interval: None,
            },
            Phase::Locked => Self {
                fullscreen: true,
                always_on_top: true,
                visible_on_all_workspaces: true,
                movable: false,
                resizable: false,
                input: InputCapture::Captured,
                steal_focus: true,
                quit_blocked: true,
                reassert_interval: Some(LOCK_REASSERT_INTERVAL),
            },
        }
    }

    /// Decide what a Ctrl/Cmd shortcut does under this policy.
    ///
    /// `q` and `c` quit, `w` closes the window. All three are swallowed
    /// while quitting is blocked.
    pub fn shortcut(&self, ctrl: bool, key: char) -> ShortcutOutcome {
        if !ctrl {
            return ShortcutOutcome::Ignored;
        }
        let outcome = match key.to_ascii_lowercase() {
            'q' | 'c' => ShortcutOutcome::Quit,
            'w' => ShortcutOutcome::Close,
            _ => return ShortcutOutcome::Ignored,
        };
        if self.quit_blocked {
            ShortcutOutcome::Blocked
        } else {
            outcome
        }
    }
}

impl Phase {
    pub const fn window_policy(self) -> WindowPolicy {
        WindowPolicy::for_phase(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutOutcome {
    Quit,
    Close,
    Blocked,
    Ignored,
}
