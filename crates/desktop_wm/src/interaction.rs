//! Pointer-driven drag and resize sessions, plus the viewport clamp.
//!
//! A session attaches the view's global pointer listeners when it begins and detaches them on
//! every way out: release, pointer cancel, the window closing, or a fullscreen toggle.

use leptos::logging;

use crate::{
    model::{PointerPosition, StagePan, WindowDimensions, WindowId, WindowPosition},
    window_manager::WindowManager,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    /// Pointer offset from the window origin, in stage coordinates.
    pub pointer_offset: PointerPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    /// Rendered `(width, height)` when the grip was grabbed.
    pub size_start: (i32, i32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InteractionState {
    dragging: Option<DragSession>,
    resizing: Option<ResizeSession>,
}

impl WindowManager {
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.interaction.dragging.as_ref()
    }

    pub fn resize_session(&self) -> Option<&ResizeSession> {
        self.interaction.resizing.as_ref()
    }

    /// Sets the pan applied to the desktop surface; pointer input is corrected by it.
    pub fn set_stage_pan(&mut self, pan: StagePan) {
        self.stage_pan = pan;
    }

    /// Pointer-down on the header of window `id`, at screen position `pointer`.
    ///
    /// Fullscreen and minimized windows cannot be dragged.
    pub fn begin_drag(&mut self, id: &WindowId, pointer: PointerPosition) -> bool {
        let Some(state) = self.windows.get(id) else {
            logging::debug_warn!("drag ignored: window {id} is not open");
            return false;
        };
        if state.full_screen || state.is_minimized {
            return false;
        }
        let origin = state.position.unwrap_or_default();
        let stage = self.stage_pan.screen_to_stage(pointer);
        self.end_pointer_sessions();

        self.interaction.dragging = Some(DragSession {
            window_id: id.clone(),
            pointer_offset: PointerPosition {
                x: stage.x - origin.left,
                y: stage.y - origin.top,
            },
        });
        self.view.attach_pointer_session(id);
        true
    }

    /// Global pointer-move during a drag.
    pub fn update_drag(&mut self, pointer: PointerPosition) -> bool {
        let Some(session) = self.interaction.dragging.clone() else {
            return false;
        };
        let stage = self.stage_pan.screen_to_stage(pointer);
        let Some(state) = self.windows.get_mut(&session.window_id) else {
            return false;
        };
        state.position = Some(WindowPosition {
            left: stage.x - session.pointer_offset.x,
            top: stage.y - session.pointer_offset.y,
        });
        self.render_geometry(&session.window_id);
        true
    }

    /// Pointer-up: keeps the final position, persists it and raises the window.
    pub fn end_drag(&mut self, pointer: PointerPosition) -> Option<WindowId> {
        self.update_drag(pointer);
        let session = self.interaction.dragging.take()?;
        self.view.detach_pointer_session(&session.window_id);
        self.request_persist(&session.window_id);
        self.bring_to_front(&session.window_id);
        Some(session.window_id)
    }

    /// Pointer-cancel: ends the session where it is, persisting without raising the window.
    pub fn cancel_drag(&mut self) -> Option<WindowId> {
        let session = self.interaction.dragging.take()?;
        self.view.detach_pointer_session(&session.window_id);
        self.request_persist(&session.window_id);
        Some(session.window_id)
    }

    /// Pointer-down on the bottom-right resize grip of window `id`.
    pub fn begin_resize(&mut self, id: &WindowId, pointer: PointerPosition) -> bool {
        let viewport = self.view.viewport();
        let Some(state) = self.windows.get(id) else {
            logging::debug_warn!("resize ignored: window {id} is not open");
            return false;
        };
        if state.full_screen || state.is_minimized {
            return false;
        }
        let rect = state.rect(viewport, self.config.taskbar_height);
        self.end_pointer_sessions();

        self.interaction.resizing = Some(ResizeSession {
            window_id: id.clone(),
            pointer_start: pointer,
            size_start: (rect.w, rect.h),
        });
        self.view.attach_pointer_session(id);
        true
    }

    /// Global pointer-move during a resize; the size never drops below the configured minimum.
    pub fn update_resize(&mut self, pointer: PointerPosition) -> bool {
        let Some(session) = self.interaction.resizing.clone() else {
            return false;
        };
        let (start_w, start_h) = session.size_start;
        let width = (start_w + pointer.x - session.pointer_start.x).max(self.config.min_window_width);
        let height =
            (start_h + pointer.y - session.pointer_start.y).max(self.config.min_window_height);
        let Some(state) = self.windows.get_mut(&session.window_id) else {
            return false;
        };
        state.dimensions = WindowDimensions::Integer { width, height };
        self.render_geometry(&session.window_id);
        true
    }

    /// Pointer-up on the grip: the reached size is persisted.
    pub fn end_resize(&mut self, pointer: PointerPosition) -> Option<WindowId> {
        self.update_resize(pointer);
        self.cancel_resize()
    }

    /// Pointer-cancel during a resize; keeps and persists the size reached so far.
    pub fn cancel_resize(&mut self) -> Option<WindowId> {
        let session = self.interaction.resizing.take()?;
        self.view.detach_pointer_session(&session.window_id);
        self.request_persist(&session.window_id);
        Some(session.window_id)
    }

    /// Drops any session on window `id` without persisting.
    pub(crate) fn abort_pointer_sessions_for(&mut self, id: &WindowId) {
        if self
            .interaction
            .dragging
            .as_ref()
            .is_some_and(|s| &s.window_id == id)
        {
            self.interaction.dragging = None;
            self.view.detach_pointer_session(id);
        }
        if self
            .interaction
            .resizing
            .as_ref()
            .is_some_and(|s| &s.window_id == id)
        {
            self.interaction.resizing = None;
            self.view.detach_pointer_session(id);
        }
    }

    fn end_pointer_sessions(&mut self) {
        if let Some(session) = self.interaction.dragging.take() {
            self.view.detach_pointer_session(&session.window_id);
        }
        if let Some(session) = self.interaction.resizing.take() {
            self.view.detach_pointer_session(&session.window_id);
        }
    }

    /// Shrinks window `id` to fit the desktop and pulls it back when it sits mostly off-screen.
    ///
    /// Returns `true`, re-rendering and persisting, only when something changed.
    pub fn clamp_to_viewport(&mut self, id: &WindowId) -> bool {
        let viewport = self.view.viewport();
        let desktop_height = viewport.desktop_height(self.config.taskbar_height);
        let Some(state) = self.windows.get_mut(id) else {
            return false;
        };
        if state.full_screen {
            return false;
        }

        let position = state.position.unwrap_or_default();
        let (dimensions, left, top) = match state.dimensions {
            WindowDimensions::Default => (
                WindowDimensions::Default,
                pull_back(position.left, viewport.width, viewport.width),
                pull_back(position.top, desktop_height, desktop_height).max(0),
            ),
            WindowDimensions::Integer { width, height } => {
                let fitted_width = width.min(viewport.width);
                let fitted_height = height.min(desktop_height);
                let left = if fitted_width < width {
                    position.left.clamp(0, viewport.width - fitted_width)
                } else {
                    pull_back(position.left, fitted_width, viewport.width)
                };
                let top = if fitted_height < height {
                    position.top.clamp(0, desktop_height - fitted_height)
                } else {
                    pull_back(position.top, fitted_height, desktop_height).max(0)
                };
                let fitted = WindowDimensions::Integer {
                    width: fitted_width,
                    height: fitted_height,
                };
                (fitted, left, top)
            }
        };

        let changed =
            dimensions != state.dimensions || left != position.left || top != position.top;
        if !changed {
            return false;
        }
        state.dimensions = dimensions;
        state.position = Some(WindowPosition { left, top });
        self.render_geometry(id);
        self.request_persist(id);
        true
    }

    /// Viewport resized: clamps every window and re-renders desktop-filling ones that did not
    /// move.
    ///
    /// Returns how many windows were clamped.
    pub fn handle_viewport_resize(&mut self) -> usize {
        let ids: Vec<WindowId> = self.windows.keys().cloned().collect();
        let mut clamped = 0;
        for id in &ids {
            if self.clamp_to_viewport(id) {
                clamped += 1;
                continue;
            }
            let fills_desktop = self
                .windows
                .get(id)
                .is_some_and(|w| w.dimensions == WindowDimensions::Default);
            if fills_desktop {
                self.render_geometry(id);
            }
        }
        clamped
    }
}

/// Moves `start` so at least half of a `size`-long span stays inside `[0, bound)`.
fn pull_back(start: i32, size: i32, bound: i32) -> i32 {
    let visible = (start + size).min(bound) - start.max(0);
    if visible * 2 >= size {
        start
    } else {
        start.clamp(0, (bound - size).max(0))
    }
}
