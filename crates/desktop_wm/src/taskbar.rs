//! Taskbar tab registry and the tab-driven window actions.

use leptos::logging;
use serde::{Deserialize, Serialize};

use crate::{
    model::{WindowId, WindowState},
    window_manager::WindowManager,
};

/// One taskbar tab, mirroring exactly one open window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskbarTab {
    /// `tab-<window id>`.
    pub tab_id: String,
    pub window_id: WindowId,
    pub title: String,
    pub minimized: bool,
    /// Set on the tab of the frontmost visible window only.
    pub active: bool,
}

/// Entries of the per-tab context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabMenuItem {
    Restore,
    Minimize,
    Maximize,
    Close,
}

impl TabMenuItem {
    pub fn label(self) -> &'static str {
        match self {
            Self::Restore => "Restore",
            Self::Minimize => "Minimize",
            Self::Maximize => "Maximize",
            Self::Close => "Close",
        }
    }
}

/// Context menu entries for `state`: Restore or Minimize depending on visibility, Maximize unless
/// already fullscreen, then Close.
pub fn tab_menu_items(state: &WindowState) -> Vec<TabMenuItem> {
    let mut items = Vec::with_capacity(3);
    items.push(if state.is_minimized {
        TabMenuItem::Restore
    } else {
        TabMenuItem::Minimize
    });
    if !state.full_screen {
        items.push(TabMenuItem::Maximize);
    }
    items.push(TabMenuItem::Close);
    items
}

/// Tabs in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskbarTabs {
    tabs: Vec<TaskbarTab>,
}

impl TaskbarTabs {
    pub(crate) fn add(&mut self, state: &WindowState) -> TaskbarTab {
        let tab = TaskbarTab {
            tab_id: state.id.tab_id(),
            window_id: state.id.clone(),
            title: state.title.clone(),
            minimized: state.is_minimized,
            active: false,
        };
        self.tabs.retain(|t| t.window_id != state.id);
        self.tabs.push(tab.clone());
        tab
    }

    pub(crate) fn remove(&mut self, id: &WindowId) -> Option<TaskbarTab> {
        let index = self.tabs.iter().position(|t| &t.window_id == id)?;
        Some(self.tabs.remove(index))
    }

    /// Returns the updated tab when its minimized flag changed.
    pub(crate) fn set_minimized(&mut self, id: &WindowId, minimized: bool) -> Option<TaskbarTab> {
        let tab = self.tabs.iter_mut().find(|t| &t.window_id == id)?;
        if tab.minimized == minimized {
            return None;
        }
        tab.minimized = minimized;
        Some(tab.clone())
    }

    /// Marks only the tab of `frontmost` active and returns every tab whose flag flipped.
    pub(crate) fn set_active(&mut self, frontmost: Option<&WindowId>) -> Vec<TaskbarTab> {
        self.tabs
            .iter_mut()
            .filter_map(|tab| {
                let active = frontmost == Some(&tab.window_id);
                (tab.active != active).then(|| {
                    tab.active = active;
                    tab.clone()
                })
            })
            .collect()
    }

    pub fn get(&self, id: &WindowId) -> Option<&TaskbarTab> {
        self.tabs.iter().find(|t| &t.window_id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskbarTab> {
        self.tabs.iter()
    }

    pub fn active(&self) -> Option<&TaskbarTab> {
        self.tabs.iter().find(|t| t.active)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

impl WindowManager {
    /// Tab click or keyboard activation: minimizes a visible window, raises a hidden one.
    pub fn activate_tab(&mut self, id: &WindowId) -> bool {
        let Some(state) = self.windows.get(id) else {
            logging::debug_warn!("tab activation ignored: window {id} is not open");
            return false;
        };
        if state.is_visible() {
            self.minimize_window(id)
        } else {
            self.bring_to_front(id)
        }
    }

    /// Opens the context menu of the tab for window `id` and returns the offered items.
    pub fn open_tab_context_menu(&mut self, id: &WindowId) -> Option<Vec<TabMenuItem>> {
        let items = tab_menu_items(self.windows.get(id)?);
        self.taskbar.show_context_menu(&id.tab_id(), &items);
        Some(items)
    }

    /// Runs a context menu entry through the ordinary lifecycle operations.
    pub fn choose_tab_menu_item(&mut self, id: &WindowId, item: TabMenuItem) -> bool {
        self.taskbar.hide_context_menu();
        match item {
            TabMenuItem::Restore => self.bring_to_front(id),
            TabMenuItem::Minimize => self.minimize_window(id),
            TabMenuItem::Maximize => {
                let is_full_screen = self.windows.get(id).is_some_and(|w| w.full_screen);
                if is_full_screen {
                    return false;
                }
                self.toggle_full_screen(id) && self.bring_to_front(id)
            }
            TabMenuItem::Close => self.close_window(id),
        }
    }
}
