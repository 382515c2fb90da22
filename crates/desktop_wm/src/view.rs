//! Rendering capabilities the window manager drives, plus recording in-memory implementations.
//!
//! The manager never touches a rendering surface directly. A host supplies a [`WindowView`] for
//! window nodes and the cycler overlay, and a [`TaskbarView`] for taskbar tabs. User input flows
//! back in through [`crate::WindowManager`] methods.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
    rc::Rc,
};

use crate::{
    cycler::CyclerEntry,
    model::{Viewport, WindowContent, WindowId, WindowRect, WindowState},
    taskbar::{TabMenuItem, TaskbarTab},
};

/// Everything a view needs to mount one window node.
#[derive(Debug, Clone, Copy)]
pub struct MountRequest<'a> {
    pub state: &'a WindowState,
    pub rect: WindowRect,
    pub content: &'a WindowContent,
}

/// Surface holding window nodes and the window-cycler overlay.
pub trait WindowView {
    fn mount(&mut self, request: MountRequest<'_>);
    fn set_z_index(&mut self, id: &WindowId, z_index: u32);
    /// Hides (`display:none`, `aria-hidden`) or shows a window node.
    fn set_visible(&mut self, id: &WindowId, visible: bool);
    fn set_geometry(&mut self, id: &WindowId, rect: WindowRect);
    /// Enables or disables the drag handle and resize grip.
    fn set_interactive(&mut self, id: &WindowId, enabled: bool);
    fn destroy(&mut self, id: &WindowId);

    /// Z-indices of every window node currently rendered, including ones not created by the
    /// manager.
    fn rendered_z_indices(&self) -> Vec<u32>;
    /// Whether the window body holds an audio or video element.
    fn contains_media(&self, id: &WindowId) -> bool;
    fn viewport(&self) -> Viewport;

    /// Attaches the global pointer move/up/cancel listeners for a drag or resize session.
    fn attach_pointer_session(&mut self, id: &WindowId);
    /// Removes the listeners attached by [`WindowView::attach_pointer_session`].
    fn detach_pointer_session(&mut self, id: &WindowId);

    fn show_cycler(&mut self, entries: &[CyclerEntry], selected: usize);
    fn select_cycler_entry(&mut self, selected: usize);
    /// Tears the overlay down together with its listeners.
    fn hide_cycler(&mut self);
}

/// Taskbar surface holding one tab per window.
pub trait TaskbarView {
    fn mount_tab(&mut self, tab: &TaskbarTab);
    fn update_tab(&mut self, tab: &TaskbarTab);
    fn remove_tab(&mut self, tab_id: &str);
    fn show_context_menu(&mut self, tab_id: &str, items: &[TabMenuItem]);
    fn hide_context_menu(&mut self);
}

/// A window node as last rendered by [`MemoryWindowView`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedWindow {
    pub title: String,
    pub rect: WindowRect,
    pub z_index: u32,
    pub visible: bool,
    pub interactive: bool,
    pub content: WindowContent,
}

/// The cycler overlay as last rendered by [`MemoryWindowView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCycler {
    pub entries: Vec<CyclerEntry>,
    pub selected: usize,
}

#[derive(Debug, Default)]
struct MemorySurface {
    viewport: Viewport,
    windows: BTreeMap<WindowId, RenderedWindow>,
    media: BTreeSet<WindowId>,
    /// Nodes injected behind the manager's back, keyed by a synthetic id.
    foreign_z: BTreeMap<String, u32>,
    pointer_sessions: Vec<WindowId>,
    cycler: Option<RenderedCycler>,
    destroyed: usize,
}

/// Recording [`WindowView`] backed by shared in-memory state.
///
/// Clones share the same surface, so a test can hand one clone to the manager and inspect the
/// other.
#[derive(Debug, Clone, Default)]
pub struct MemoryWindowView {
    inner: Rc<RefCell<MemorySurface>>,
}

impl MemoryWindowView {
    pub fn with_viewport(viewport: Viewport) -> Self {
        let view = Self::default();
        view.set_viewport(viewport);
        view
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.borrow_mut().viewport = viewport;
    }

    pub fn window(&self, id: &WindowId) -> Option<RenderedWindow> {
        self.inner.borrow().windows.get(id).cloned()
    }

    pub fn is_mounted(&self, id: &WindowId) -> bool {
        self.inner.borrow().windows.contains_key(id)
    }

    pub fn mounted_count(&self) -> usize {
        self.inner.borrow().windows.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.inner.borrow().destroyed
    }

    /// Marks a window body as holding an audio/video element.
    pub fn add_media(&self, id: &WindowId) {
        self.inner.borrow_mut().media.insert(id.clone());
    }

    /// Simulates an external edit that renders a node with `z_index` outside the manager.
    pub fn inject_foreign_z_index(&self, key: &str, z_index: u32) {
        self.inner
            .borrow_mut()
            .foreign_z
            .insert(key.to_string(), z_index);
    }

    /// Number of pointer sessions whose listeners are still attached.
    pub fn pointer_listener_count(&self) -> usize {
        self.inner.borrow().pointer_sessions.len()
    }

    pub fn cycler(&self) -> Option<RenderedCycler> {
        self.inner.borrow().cycler.clone()
    }
}

impl WindowView for MemoryWindowView {
    fn mount(&mut self, request: MountRequest<'_>) {
        self.inner.borrow_mut().windows.insert(
            request.state.id.clone(),
            RenderedWindow {
                title: request.state.title.clone(),
                rect: request.rect,
                z_index: request.state.z_index,
                visible: request.state.is_visible(),
                interactive: !request.state.full_screen,
                content: request.content.clone(),
            },
        );
    }

    fn set_z_index(&mut self, id: &WindowId, z_index: u32) {
        if let Some(window) = self.inner.borrow_mut().windows.get_mut(id) {
            window.z_index = z_index;
        }
    }

    fn set_visible(&mut self, id: &WindowId, visible: bool) {
        if let Some(window) = self.inner.borrow_mut().windows.get_mut(id) {
            window.visible = visible;
        }
    }

    fn set_geometry(&mut self, id: &WindowId, rect: WindowRect) {
        if let Some(window) = self.inner.borrow_mut().windows.get_mut(id) {
            window.rect = rect;
        }
    }

    fn set_interactive(&mut self, id: &WindowId, enabled: bool) {
        if let Some(window) = self.inner.borrow_mut().windows.get_mut(id) {
            window.interactive = enabled;
        }
    }

    fn destroy(&mut self, id: &WindowId) {
        let mut surface = self.inner.borrow_mut();
        if surface.windows.remove(id).is_some() {
            surface.destroyed += 1;
        }
        surface.media.remove(id);
    }

    fn rendered_z_indices(&self) -> Vec<u32> {
        let surface = self.inner.borrow();
        surface
            .windows
            .values()
            .map(|w| w.z_index)
            .chain(surface.foreign_z.values().copied())
            .collect()
    }

    fn contains_media(&self, id: &WindowId) -> bool {
        self.inner.borrow().media.contains(id)
    }

    fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    fn attach_pointer_session(&mut self, id: &WindowId) {
        self.inner.borrow_mut().pointer_sessions.push(id.clone());
    }

    fn detach_pointer_session(&mut self, id: &WindowId) {
        let mut surface = self.inner.borrow_mut();
        if let Some(index) = surface.pointer_sessions.iter().position(|s| s == id) {
            surface.pointer_sessions.remove(index);
        }
    }

    fn show_cycler(&mut self, entries: &[CyclerEntry], selected: usize) {
        self.inner.borrow_mut().cycler = Some(RenderedCycler {
            entries: entries.to_vec(),
            selected,
        });
    }

    fn select_cycler_entry(&mut self, selected: usize) {
        if let Some(cycler) = self.inner.borrow_mut().cycler.as_mut() {
            cycler.selected = selected;
        }
    }

    fn hide_cycler(&mut self) {
        self.inner.borrow_mut().cycler = None;
    }
}

#[derive(Debug, Default)]
struct MemoryTaskbar {
    tabs: Vec<TaskbarTab>,
    context_menu: Option<(String, Vec<TabMenuItem>)>,
}

/// Recording [`TaskbarView`]; clones share the same tab strip.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskbarView {
    inner: Rc<RefCell<MemoryTaskbar>>,
}

impl MemoryTaskbarView {
    pub fn tabs(&self) -> Vec<TaskbarTab> {
        self.inner.borrow().tabs.clone()
    }

    pub fn tab(&self, tab_id: &str) -> Option<TaskbarTab> {
        self.inner
            .borrow()
            .tabs
            .iter()
            .find(|t| t.tab_id == tab_id)
            .cloned()
    }

    pub fn active_tab_ids(&self) -> Vec<String> {
        self.inner
            .borrow()
            .tabs
            .iter()
            .filter(|t| t.active)
            .map(|t| t.tab_id.clone())
            .collect()
    }

    pub fn context_menu(&self) -> Option<(String, Vec<TabMenuItem>)> {
        self.inner.borrow().context_menu.clone()
    }
}

impl TaskbarView for MemoryTaskbarView {
    fn mount_tab(&mut self, tab: &TaskbarTab) {
        self.inner.borrow_mut().tabs.push(tab.clone());
    }

    fn update_tab(&mut self, tab: &TaskbarTab) {
        let mut taskbar = self.inner.borrow_mut();
        if let Some(existing) = taskbar.tabs.iter_mut().find(|t| t.tab_id == tab.tab_id) {
            *existing = tab.clone();
        }
    }

    fn remove_tab(&mut self, tab_id: &str) {
        let mut taskbar = self.inner.borrow_mut();
        taskbar.tabs.retain(|t| t.tab_id != tab_id);
        if taskbar
            .context_menu
            .as_ref()
            .is_some_and(|(menu_tab, _)| menu_tab == tab_id)
        {
            taskbar.context_menu = None;
        }
    }

    fn show_context_menu(&mut self, tab_id: &str, items: &[TabMenuItem]) {
        self.inner.borrow_mut().context_menu = Some((tab_id.to_string(), items.to_vec()));
    }

    fn hide_context_menu(&mut self) {
        self.inner.borrow_mut().context_menu = None;
    }
}
