//! Window lifecycle controller: create, close, minimize and raise windows while keeping the
//! state store, z-order watermark, rendered nodes and taskbar tabs in lockstep.

use std::{
    collections::{BTreeMap, HashMap},
    rc::Rc,
};

use leptos::logging;
use platform_host::Announcer;

use crate::{
    config::WindowManagerConfig,
    cycler::WindowCycler,
    dialog::{DialogResult, PendingDialog},
    effects::{EffectQueue, RuntimeEffect},
    interaction::InteractionState,
    model::{
        CreateWindowRequest, StagePan, WindowDimensions, WindowId, WindowPosition, WindowState,
    },
    taskbar::TaskbarTabs,
    view::{MountRequest, TaskbarView, WindowView},
    z_order::ZOrderAllocator,
};

type Disposer = Box<dyn FnOnce()>;

/// Owner of every window record and of the surfaces rendering them.
///
/// All mutation goes through `&mut self`, so a host serializes operations simply by owning the
/// manager on its UI thread.
pub struct WindowManager {
    pub(crate) config: WindowManagerConfig,
    pub(crate) windows: BTreeMap<WindowId, WindowState>,
    pub(crate) nav_windows: HashMap<String, WindowId>,
    pub(crate) z_order: ZOrderAllocator,
    pub(crate) active_media_window: Option<WindowId>,
    pub(crate) tabs: TaskbarTabs,
    pub(crate) cycler: WindowCycler,
    pub(crate) dialogs: HashMap<WindowId, PendingDialog>,
    pub(crate) interaction: InteractionState,
    pub(crate) stage_pan: StagePan,
    pub(crate) pending_restore: HashMap<WindowId, WindowState>,
    pub(crate) view: Box<dyn WindowView>,
    pub(crate) taskbar: Box<dyn TaskbarView>,
    pub(crate) announcer: Rc<dyn Announcer>,
    effects: EffectQueue,
    persist_suppressed: u32,
    disposers: HashMap<WindowId, Vec<Disposer>>,
}

impl WindowManager {
    pub fn new(
        config: WindowManagerConfig,
        view: Box<dyn WindowView>,
        taskbar: Box<dyn TaskbarView>,
        announcer: Rc<dyn Announcer>,
    ) -> Self {
        Self {
            config,
            windows: BTreeMap::new(),
            nav_windows: HashMap::new(),
            z_order: ZOrderAllocator::default(),
            active_media_window: None,
            tabs: TaskbarTabs::default(),
            cycler: WindowCycler::default(),
            dialogs: HashMap::new(),
            interaction: InteractionState::default(),
            stage_pan: StagePan::default(),
            pending_restore: HashMap::new(),
            view,
            taskbar,
            announcer,
            effects: EffectQueue::default(),
            persist_suppressed: 0,
            disposers: HashMap::new(),
        }
    }

    /// Manager announcing through the document's ARIA live regions.
    pub fn browser(
        config: WindowManagerConfig,
        view: Box<dyn WindowView>,
        taskbar: Box<dyn TaskbarView>,
    ) -> Self {
        Self::new(config, view, taskbar, platform_host_web::announcer())
    }

    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowState> {
        self.windows.get(id)
    }

    pub fn windows(&self) -> impl Iterator<Item = &WindowState> {
        self.windows.values()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn highest_z(&self) -> u32 {
        self.z_order.highest()
    }

    /// Live window registered for a nav `title`.
    pub fn nav_window(&self, title: &str) -> Option<&WindowId> {
        self.nav_windows
            .get(title)
            .filter(|id| self.windows.contains_key(*id))
    }

    /// Window whose audio/video the taskbar media controls currently drive.
    pub fn active_media_window(&self) -> Option<&WindowId> {
        self.active_media_window.as_ref()
    }

    pub fn tabs(&self) -> &TaskbarTabs {
        &self.tabs
    }

    /// Frontmost non-minimized window.
    pub fn active_window(&self) -> Option<WindowId> {
        self.windows
            .values()
            .filter(|w| w.is_visible())
            .max_by_key(|w| w.z_index)
            .map(|w| w.id.clone())
    }

    pub fn has_pending_effects(&self) -> bool {
        !self.effects.is_empty()
    }

    /// Takes every queued effect, oldest first.
    pub fn drain_effects(&mut self) -> Vec<RuntimeEffect> {
        self.effects.drain()
    }

    /// Creates and mounts a window plus its taskbar tab, returning the window's id.
    ///
    /// Nav windows are singletons per title and a live caller-supplied id is never duplicated:
    /// in both cases the existing window is raised and its id returned.
    pub fn create_window(&mut self, request: CreateWindowRequest) -> WindowId {
        if request.is_nav {
            if let Some(existing) = self.nav_window(&request.title).cloned() {
                self.bring_to_front(&existing);
                return existing;
            }
            self.nav_windows.remove(&request.title);
        }

        let id = request.id.clone().unwrap_or_else(WindowId::generate);
        if self.windows.contains_key(&id) {
            if !request.start_minimized {
                self.bring_to_front(&id);
            }
            return id;
        }

        if request.is_restore {
            let restored = id.clone();
            self.with_persist_suppressed(move |wm| {
                wm.mount_new_window(restored.clone(), request);
                wm.clamp_to_viewport(&restored);
            });
        } else {
            self.mount_new_window(id.clone(), request);
            self.clamp_to_viewport(&id);
        }
        id
    }

    fn mount_new_window(&mut self, id: WindowId, request: CreateWindowRequest) {
        let stored = if request.is_restore {
            self.pending_restore.remove(&id)
        } else {
            None
        };

        let mut state = WindowState {
            id: id.clone(),
            title: request.title,
            is_nav: request.is_nav,
            is_minimized: request.start_minimized,
            dimensions: request.dimensions,
            window_type: request.window_type,
            position: None,
            full_screen: false,
            original_dimensions: None,
            original_position: None,
            color: request.color,
            z_index: 0,
            parent_window: request.parent_window,
        };
        if let Some(stored) = stored {
            state.position = stored.position;
            state.dimensions = stored.dimensions;
            state.full_screen = stored.full_screen;
            state.original_dimensions = stored.original_dimensions;
            state.original_position = stored.original_position;
        }
        if state.full_screen {
            state.dimensions = WindowDimensions::Default;
            state.position = Some(WindowPosition::default());
        }
        if state.position.is_none() {
            state.position = Some(self.initial_position(&state));
        }

        state.z_index = match request.z_index {
            Some(z_index) => {
                self.z_order.observe(z_index);
                z_index
            }
            None => {
                self.resync_z_order();
                self.z_order.next()
            }
        };

        let rect = state.rect(self.view.viewport(), self.config.taskbar_height);
        self.view.mount(MountRequest {
            state: &state,
            rect,
            content: &request.content,
        });
        let tab = self.tabs.add(&state);
        self.taskbar.mount_tab(&tab);

        let start_minimized = state.is_minimized;
        let is_restore = request.is_restore;
        if state.is_nav {
            self.nav_windows.insert(state.title.clone(), id.clone());
        }
        logging::log!("window {id} created (z={})", state.z_index);
        self.windows.insert(id.clone(), state);

        if is_restore {
            // Restored windows keep their stored stacking value.
            self.sync_active_tab();
        } else {
            if !start_minimized {
                self.bring_to_front(&id);
            }
            self.request_persist(&id);
        }
    }

    /// Removes a window, its tab and every reference to it. Returns `false` when `id` is not live.
    pub fn close_window(&mut self, id: &WindowId) -> bool {
        let Some(state) = self.windows.remove(id) else {
            logging::debug_warn!("close ignored: window {id} is not open");
            return false;
        };

        self.abort_pointer_sessions_for(id);
        self.view.destroy(id);
        if let Some(tab) = self.tabs.remove(id) {
            self.taskbar.remove_tab(&tab.tab_id);
        }
        self.nav_windows.retain(|_, window_id| window_id != id);
        if self.active_media_window.as_ref() == Some(id) {
            self.active_media_window = None;
        }
        if let Some(dialog) = self.dialogs.remove(id) {
            dialog.resolve(DialogResult::Dismissed);
        }
        self.forget_cycle_entry(id);
        if let Some(disposers) = self.disposers.remove(id) {
            for dispose in disposers {
                dispose();
            }
        }

        self.sync_active_tab();
        if !state.is_dialog() {
            self.enqueue_persist();
        }
        true
    }

    /// Hides a window. Returns `false` when it is missing or already minimized.
    pub fn minimize_window(&mut self, id: &WindowId) -> bool {
        let Some(state) = self.windows.get_mut(id) else {
            logging::debug_warn!("minimize ignored: window {id} is not open");
            return false;
        };
        if state.is_minimized {
            return false;
        }
        state.is_minimized = true;
        self.view.set_visible(id, false);
        if let Some(tab) = self.tabs.set_minimized(id, true) {
            self.taskbar.update_tab(&tab);
        }
        self.sync_active_tab();
        self.request_persist(id);
        true
    }

    /// Un-hides a window if needed and stacks it strictly above every other window.
    pub fn bring_to_front(&mut self, id: &WindowId) -> bool {
        if !self.windows.contains_key(id) {
            logging::debug_warn!("bring to front ignored: window {id} is not open");
            return false;
        }

        self.resync_z_order();
        let z_index = self.z_order.next();
        let has_media = self.view.contains_media(id);

        let Some(state) = self.windows.get_mut(id) else {
            return false;
        };
        let was_minimized = state.is_minimized;
        state.is_minimized = false;
        state.z_index = z_index;

        self.view.set_z_index(id, z_index);
        if was_minimized {
            self.view.set_visible(id, true);
            if let Some(tab) = self.tabs.set_minimized(id, false) {
                self.taskbar.update_tab(&tab);
            }
        }
        self.sync_active_tab();
        if has_media {
            self.active_media_window = Some(id.clone());
        }
        self.request_persist(id);
        true
    }

    pub fn close_active_window(&mut self) -> Option<WindowId> {
        let id = self.active_window()?;
        self.close_window(&id).then_some(id)
    }

    pub fn minimize_active_window(&mut self) -> Option<WindowId> {
        let id = self.active_window()?;
        self.minimize_window(&id).then_some(id)
    }

    /// Minimizes every visible window and returns how many changed.
    pub fn minimize_all_windows(&mut self) -> usize {
        let visible: Vec<WindowId> = self
            .windows
            .values()
            .filter(|w| w.is_visible())
            .map(|w| w.id.clone())
            .collect();
        visible
            .iter()
            .filter(|id| self.minimize_window(id))
            .count()
    }

    /// Routes a click on window `id` through both event phases.
    ///
    /// The capture phase raises the window before `bubble` (the click handlers nested inside the
    /// window) runs, so any window `bubble` creates lands strictly above it.
    pub fn dispatch_window_click<R>(
        &mut self,
        id: &WindowId,
        bubble: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.bring_to_front(id);
        bubble(self)
    }

    /// Registers `disposer` to run exactly once when window `id` closes.
    ///
    /// Returns `false` (and drops the disposer unrun) when the window is not open.
    pub fn on_window_close(&mut self, id: &WindowId, disposer: impl FnOnce() + 'static) -> bool {
        if !self.windows.contains_key(id) {
            return false;
        }
        self.disposers
            .entry(id.clone())
            .or_default()
            .push(Box::new(disposer));
        true
    }

    pub(crate) fn resync_z_order(&mut self) {
        let rendered = self.view.rendered_z_indices();
        let before = self.z_order.highest();
        if self.z_order.resync(rendered) {
            logging::log!(
                "z-order watermark was stale ({before} < {}), resynced",
                self.z_order.highest()
            );
        }
    }

    /// Marks exactly the frontmost visible window's tab as active.
    pub(crate) fn sync_active_tab(&mut self) {
        let frontmost = self.active_window();
        for tab in self.tabs.set_active(frontmost.as_ref()) {
            self.taskbar.update_tab(&tab);
        }
    }

    /// Queues a persist for a change to window `id`. Dialogs never persist.
    pub(crate) fn request_persist(&mut self, id: &WindowId) {
        if self.windows.get(id).is_some_and(|w| !w.is_dialog()) {
            self.enqueue_persist();
        }
    }

    pub(crate) fn enqueue_persist(&mut self) {
        if self.persist_suppressed == 0 {
            self.effects.push(RuntimeEffect::PersistWindowStates);
        }
    }

    pub(crate) fn enqueue_effect(&mut self, effect: RuntimeEffect) {
        self.effects.push(effect);
    }

    /// Runs `f` with persist requests muted, for batches that persist once at the end.
    pub(crate) fn with_persist_suppressed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.persist_suppressed += 1;
        let result = f(self);
        self.persist_suppressed -= 1;
        result
    }

    /// Re-renders the geometry of window `id` from its record.
    pub(crate) fn render_geometry(&mut self, id: &WindowId) {
        let viewport = self.view.viewport();
        if let Some(state) = self.windows.get(id) {
            let rect = state.rect(viewport, self.config.taskbar_height);
            self.view.set_geometry(id, rect);
        }
    }

    fn initial_position(&self, state: &WindowState) -> WindowPosition {
        let viewport = self.view.viewport();
        let desktop_height = viewport.desktop_height(self.config.taskbar_height);
        match state.dimensions {
            WindowDimensions::Default => WindowPosition::default(),
            WindowDimensions::Integer { width, height } if state.is_dialog() => WindowPosition {
                left: ((viewport.width - width) / 2).max(0),
                top: ((desktop_height - height) / 2).max(0),
            },
            WindowDimensions::Integer { .. } => {
                let slot = (self.windows.len() as i32) % self.config.cascade_slots;
                let offset = self.config.cascade_origin + slot * self.config.cascade_step;
                WindowPosition {
                    left: offset,
                    top: offset,
                }
            }
        }
    }
}

impl Drop for WindowManager {
    fn drop(&mut self) {
        for (_, disposers) in self.disposers.drain() {
            for dispose in disposers {
                dispose();
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use platform_host::MemoryAnnouncer;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        model::{Viewport, WindowContent},
        view::{MemoryTaskbarView, MemoryWindowView},
    };

    pub(crate) struct Harness {
        pub wm: WindowManager,
        pub view: MemoryWindowView,
        pub taskbar: MemoryTaskbarView,
        pub announcer: MemoryAnnouncer,
    }

    pub(crate) fn harness() -> Harness {
        let view = MemoryWindowView::with_viewport(Viewport {
            width: 1280,
            height: 800,
        });
        let taskbar = MemoryTaskbarView::default();
        let announcer = MemoryAnnouncer::default();
        let wm = WindowManager::new(
            WindowManagerConfig::default(),
            Box::new(view.clone()),
            Box::new(taskbar.clone()),
            Rc::new(announcer.clone()),
        );
        Harness {
            wm,
            view,
            taskbar,
            announcer,
        }
    }

    pub(crate) fn open(wm: &mut WindowManager, id: &str) -> WindowId {
        let mut req = CreateWindowRequest::app(id, 400, 300);
        req.id = Some(WindowId::from(id));
        wm.create_window(req)
    }

    #[test]
    fn create_mounts_window_and_tab_and_focuses_it() {
        let mut h = harness();
        let a = open(&mut h.wm, "a");
        let b = open(&mut h.wm, "b");

        assert!(h.view.is_mounted(&a));
        assert_eq!(h.taskbar.tabs().len(), 2);
        assert_eq!(h.taskbar.active_tab_ids(), vec!["tab-b".to_string()]);
        assert!(h.wm.window(&b).unwrap().z_index > h.wm.window(&a).unwrap().z_index);
        assert_eq!(h.wm.active_window(), Some(b));
        assert_eq!(h.wm.drain_effects(), vec![RuntimeEffect::PersistWindowStates]);
    }

    #[test]
    fn cascaded_positions_step_per_open_window() {
        let mut h = harness();
        let a = open(&mut h.wm, "a");
        let b = open(&mut h.wm, "b");
        assert_eq!(
            h.wm.window(&a).unwrap().position,
            Some(WindowPosition { left: 40, top: 40 })
        );
        assert_eq!(
            h.wm.window(&b).unwrap().position,
            Some(WindowPosition { left: 60, top: 60 })
        );
    }

    #[test]
    fn nav_windows_are_singletons_per_title() {
        let mut h = harness();
        let mut req = CreateWindowRequest::app("My Computer", 500, 400);
        req.is_nav = true;
        let first = h.wm.create_window(req.clone());
        let other = open(&mut h.wm, "other");
        let second = h.wm.create_window(req);

        assert_eq!(first, second);
        assert_eq!(h.wm.window_count(), 2);
        assert_eq!(h.wm.active_window(), Some(first.clone()));
        assert!(h.wm.window(&first).unwrap().z_index > h.wm.window(&other).unwrap().z_index);

        h.wm.close_window(&first);
        assert_eq!(h.wm.nav_window("My Computer"), None);
    }

    #[test]
    fn live_caller_id_is_raised_not_duplicated() {
        let mut h = harness();
        let calc = open(&mut h.wm, "calculator");
        open(&mut h.wm, "notepad");
        let again = open(&mut h.wm, "calculator");

        assert_eq!(calc, again);
        assert_eq!(h.taskbar.tabs().len(), 2);
        assert_eq!(h.wm.active_window(), Some(calc));
    }

    #[test]
    fn start_minimized_mounts_hidden_without_active_tab() {
        let mut h = harness();
        let mut req = CreateWindowRequest::app("Background", 300, 200);
        req.start_minimized = true;
        let id = h.wm.create_window(req);

        assert!(!h.view.window(&id).unwrap().visible);
        assert!(h.wm.window(&id).unwrap().is_minimized);
        assert!(h.taskbar.active_tab_ids().is_empty());
    }

    #[test]
    fn close_removes_every_trace_and_is_idempotent() {
        let mut h = harness();
        let a = open(&mut h.wm, "a");
        h.view.add_media(&a);
        h.wm.bring_to_front(&a);
        assert_eq!(h.wm.active_media_window(), Some(&a));
        h.wm.drain_effects();

        assert!(h.wm.close_window(&a));
        assert!(!h.view.is_mounted(&a));
        assert!(h.taskbar.tab("tab-a").is_none());
        assert_eq!(h.wm.active_media_window(), None);
        assert_eq!(h.wm.drain_effects(), vec![RuntimeEffect::PersistWindowStates]);

        assert!(!h.wm.close_window(&a));
        assert!(h.wm.drain_effects().is_empty());
        assert_eq!(h.view.destroyed_count(), 1);
    }

    #[test]
    fn minimize_hides_and_moves_active_tab_to_next_window() {
        let mut h = harness();
        open(&mut h.wm, "a");
        let b = open(&mut h.wm, "b");

        assert!(h.wm.minimize_window(&b));
        assert!(!h.view.window(&b).unwrap().visible);
        assert!(h.taskbar.tab("tab-b").unwrap().minimized);
        assert_eq!(h.taskbar.active_tab_ids(), vec!["tab-a".to_string()]);
        assert!(!h.wm.minimize_window(&b));
        assert!(!h.wm.minimize_window(&WindowId::from("missing")));
    }

    #[test]
    fn bring_to_front_outranks_foreign_rendered_nodes() {
        let mut h = harness();
        let a = open(&mut h.wm, "a");
        h.view.inject_foreign_z_index("restored-node", 500);

        h.wm.bring_to_front(&a);
        assert_eq!(h.wm.window(&a).unwrap().z_index, 501);
        assert_eq!(h.view.window(&a).unwrap().z_index, 501);
    }

    #[test]
    fn active_shortcuts_target_frontmost_visible_window() {
        let mut h = harness();
        let a = open(&mut h.wm, "a");
        let b = open(&mut h.wm, "b");

        assert_eq!(h.wm.minimize_active_window(), Some(b));
        assert_eq!(h.wm.close_active_window(), Some(a));
        assert_eq!(h.wm.close_active_window(), None);
        assert_eq!(h.wm.window_count(), 1);
    }

    #[test]
    fn disposers_run_once_on_close_and_on_drop() {
        let mut h = harness();
        let a = open(&mut h.wm, "a");
        let b = open(&mut h.wm, "b");
        let closed = Rc::new(Cell::new(0));
        let dropped = Rc::new(Cell::new(0));

        let counter = closed.clone();
        assert!(h.wm.on_window_close(&a, move || counter.set(counter.get() + 1)));
        let counter = dropped.clone();
        assert!(h.wm.on_window_close(&b, move || counter.set(counter.get() + 1)));
        assert!(!h.wm.on_window_close(&WindowId::from("gone"), || {}));

        h.wm.close_window(&a);
        h.wm.close_window(&a);
        assert_eq!(closed.get(), 1);

        drop(h.wm);
        assert_eq!(dropped.get(), 1);
    }

    #[test]
    fn browser_manager_runs_natively_with_degraded_adapters() {
        let view = MemoryWindowView::default();
        let mut wm = WindowManager::browser(
            WindowManagerConfig::default(),
            Box::new(view.clone()),
            Box::new(MemoryTaskbarView::default()),
        );
        let handle = wm.show_dialog(
            "Saved",
            crate::dialog::DialogKind::Info,
            crate::dialog::DialogOptions::default(),
        );
        assert!(view.is_mounted(handle.window_id()));
    }

    #[test]
    fn restore_prefers_stored_geometry_over_the_request() {
        let mut source = harness();
        let moved = open(&mut source.wm, "moved");
        let full = open(&mut source.wm, "full");
        source.wm.windows.get_mut(&moved).unwrap().position =
            Some(WindowPosition { left: 300, top: 120 });
        source.wm.toggle_full_screen(&full);
        let snapshot = source.wm.persisted_snapshot();

        let mut h = harness();
        for id in [&moved, &full] {
            let stored = snapshot[id].clone();
            h.wm.pending_restore.insert(id.clone(), stored.clone());
            let mut req = CreateWindowRequest::app(id.as_str(), 900, 700);
            req.id = Some(id.clone());
            req.is_restore = true;
            req.z_index = Some(stored.z_index);
            h.wm.create_window(req);
        }

        let restored = h.wm.window(&moved).unwrap();
        assert_eq!(restored.position, Some(WindowPosition { left: 300, top: 120 }));
        assert_eq!(
            restored.dimensions,
            WindowDimensions::Integer {
                width: 400,
                height: 300
            }
        );
        assert!(!restored.full_screen);

        let restored = h.wm.window(&full).unwrap();
        assert!(restored.full_screen);
        assert_eq!(restored.dimensions, WindowDimensions::Default);
        assert_eq!(restored.position, Some(WindowPosition::default()));
        assert_eq!(
            restored.original_dimensions,
            Some(WindowDimensions::Integer {
                width: 400,
                height: 300
            })
        );
        assert!(h.wm.pending_restore.is_empty());
        assert!(h.wm.drain_effects().is_empty());
    }

    #[test]
    fn generated_ids_are_used_when_caller_omits_one() {
        let mut h = harness();
        let id = h.wm.create_window(CreateWindowRequest::new(
            "Untitled",
            WindowContent::App(serde_json::Value::Null),
        ));
        assert!(id.as_str().starts_with("window-"));
        assert_eq!(
            h.wm.window(&id).unwrap().dimensions,
            WindowDimensions::Default
        );
    }
}
