//! Alt-tab style window cycler.
//!
//! The first invocation snapshots the visible windows sorted by descending z-index; that order
//! stays fixed until the cycle completes, so promotions made mid-cycle never reshuffle the list.

use leptos::logging;
use platform_host::AnnouncePriority;
use serde::{Deserialize, Serialize};

use crate::{model::WindowId, window_manager::WindowManager};

/// One selectable slot of the cycler overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclerEntry {
    pub window_id: WindowId,
    pub title: String,
}

/// Result of one [`WindowManager::cycle_windows`] invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No visible window.
    Idle,
    /// A single visible window was focused without showing the overlay.
    Focused(WindowId),
    /// The overlay is open with `window_id` selected at `index`.
    Selecting { index: usize, window_id: WindowId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CycleSession {
    entries: Vec<CyclerEntry>,
    selected: usize,
}

impl CycleSession {
    fn selected_entry(&self) -> Option<&CyclerEntry> {
        self.entries.get(self.selected)
    }

    fn advance(&mut self) {
        self.selected = (self.selected + 1) % self.entries.len();
    }
}

/// Cycler state owned by the manager; `None` session means the overlay is closed.
#[derive(Debug, Clone, Default)]
pub(crate) struct WindowCycler {
    session: Option<CycleSession>,
}

impl WindowManager {
    pub fn is_cycling(&self) -> bool {
        self.cycler.session.is_some()
    }

    /// Currently highlighted overlay entry, if a cycle is open.
    pub fn cycle_selection(&self) -> Option<&CyclerEntry> {
        self.cycler.session.as_ref()?.selected_entry()
    }

    /// Opens the cycler, or advances its selection by one slot (wrapping) when already open.
    pub fn cycle_windows(&mut self) -> CycleOutcome {
        if let Some(session) = self.cycler.session.as_mut() {
            session.advance();
            let index = session.selected;
            let window_id = session.entries[index].window_id.clone();
            self.view.select_cycler_entry(index);
            return CycleOutcome::Selecting { index, window_id };
        }

        let mut visible: Vec<_> = self.windows.values().filter(|w| w.is_visible()).collect();
        visible.sort_by(|a, b| b.z_index.cmp(&a.z_index));
        let entries: Vec<CyclerEntry> = visible
            .into_iter()
            .map(|w| CyclerEntry {
                window_id: w.id.clone(),
                title: w.title.clone(),
            })
            .collect();

        match entries.len() {
            0 => CycleOutcome::Idle,
            1 => {
                let window_id = entries[0].window_id.clone();
                self.bring_to_front(&window_id);
                CycleOutcome::Focused(window_id)
            }
            _ => {
                let window_id = entries[0].window_id.clone();
                self.view.show_cycler(&entries, 0);
                self.cycler.session = Some(CycleSession {
                    entries,
                    selected: 0,
                });
                CycleOutcome::Selecting {
                    index: 0,
                    window_id,
                }
            }
        }
    }

    /// Programmatic completion (Alt released): focuses the selected window and closes the overlay.
    pub fn complete_current_window_cycle(&mut self) -> Option<WindowId> {
        self.finish_cycle()
    }

    /// Direct click on overlay entry `index`.
    pub fn select_cycle_entry(&mut self, index: usize) -> Option<WindowId> {
        let session = self.cycler.session.as_mut()?;
        if index >= session.entries.len() {
            logging::debug_warn!("cycler entry {index} is out of range");
            return None;
        }
        session.selected = index;
        self.finish_cycle()
    }

    /// Click outside the overlay: finalizes the current selection.
    pub fn dismiss_window_cycle(&mut self) -> Option<WindowId> {
        self.finish_cycle()
    }

    fn finish_cycle(&mut self) -> Option<WindowId> {
        let session = self.cycler.session.take()?;
        self.view.hide_cycler();
        let entry = session.selected_entry()?.clone();
        if !self.bring_to_front(&entry.window_id) {
            return None;
        }
        self.announcer.announce(
            &format!("Switched to {}", entry.title),
            AnnouncePriority::Polite,
        );
        Some(entry.window_id)
    }

    /// Drops a closed window from an open cycle, closing the overlay once nothing is left.
    pub(crate) fn forget_cycle_entry(&mut self, id: &WindowId) {
        let Some(session) = self.cycler.session.as_mut() else {
            return;
        };
        let Some(index) = session.entries.iter().position(|e| &e.window_id == id) else {
            return;
        };
        session.entries.remove(index);
        if session.entries.is_empty() {
            self.cycler.session = None;
            self.view.hide_cycler();
            return;
        }
        if index < session.selected || session.selected >= session.entries.len() {
            session.selected = session.selected.saturating_sub(1);
        }
        self.view.show_cycler(&session.entries, session.selected);
    }
}
