//! Global keyboard shortcuts.

use crate::window_manager::WindowManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPhase {
    #[default]
    Down,
    Up,
}

/// A key event reduced to what shortcut matching needs. `key` uses DOM `KeyboardEvent.key` names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortcutKey {
    pub key: String,
    pub phase: KeyPhase,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl ShortcutKey {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            phase: KeyPhase::Up,
            ..Self::default()
        }
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn alt_only(&self) -> bool {
        self.alt && !self.ctrl && !self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    CycleWindows,
    CompleteCycle,
    CloseActiveWindow,
    MinimizeActiveWindow,
    MinimizeAllWindows,
}

/// Maps a key event to its shortcut: Alt+Tab, Alt release, Alt+F4, Alt+M and Super+D.
pub fn shortcut_action(key: &ShortcutKey) -> Option<ShortcutAction> {
    match key.phase {
        KeyPhase::Up => (key.key == "Alt").then_some(ShortcutAction::CompleteCycle),
        KeyPhase::Down if key.alt_only() => match key.key.as_str() {
            "Tab" => Some(ShortcutAction::CycleWindows),
            "F4" => Some(ShortcutAction::CloseActiveWindow),
            "m" | "M" => Some(ShortcutAction::MinimizeActiveWindow),
            _ => None,
        },
        KeyPhase::Down if key.meta && !key.alt && !key.ctrl => {
            matches!(key.key.as_str(), "d" | "D").then_some(ShortcutAction::MinimizeAllWindows)
        }
        KeyPhase::Down => None,
    }
}

impl WindowManager {
    /// Runs the shortcut bound to `key`. Returns the action when the event was consumed, so the
    /// host can prevent the browser default.
    pub fn handle_shortcut(&mut self, key: &ShortcutKey) -> Option<ShortcutAction> {
        let action = shortcut_action(key)?;
        match action {
            ShortcutAction::CycleWindows => {
                self.cycle_windows();
            }
            ShortcutAction::CompleteCycle => {
                if !self.is_cycling() {
                    return None;
                }
                self.complete_current_window_cycle();
            }
            ShortcutAction::CloseActiveWindow => {
                self.close_active_window();
            }
            ShortcutAction::MinimizeActiveWindow => {
                self.minimize_active_window();
            }
            ShortcutAction::MinimizeAllWindows => {
                self.minimize_all_windows();
            }
        }
        Some(action)
    }
}
