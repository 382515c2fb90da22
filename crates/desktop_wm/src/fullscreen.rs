//! Fullscreen toggle with an invertible geometry snapshot.

use leptos::logging;

use crate::{
    model::{WindowDimensions, WindowId, WindowPosition},
    window_manager::WindowManager,
};

impl WindowManager {
    /// Enters or leaves fullscreen for window `id`.
    ///
    /// Entering snapshots the current dimensions and position; leaving restores them exactly, or
    /// centers the window at the configured share of the desktop when no snapshot exists.
    /// Returns `false` when the window is not open.
    pub fn toggle_full_screen(&mut self, id: &WindowId) -> bool {
        let viewport = self.view.viewport();
        let desktop_height = viewport.desktop_height(self.config.taskbar_height);
        let ratio = self.config.fullscreen_fallback_ratio;

        let Some(state) = self.windows.get_mut(id) else {
            logging::debug_warn!("fullscreen toggle ignored: window {id} is not open");
            return false;
        };

        let entering = !state.full_screen;
        if entering {
            state.original_dimensions = Some(state.dimensions);
            state.original_position = state.position;
            state.position = Some(WindowPosition::default());
            state.dimensions = WindowDimensions::Default;
            state.full_screen = true;
        } else {
            let fallback = || {
                let width = (f64::from(viewport.width) * ratio).round() as i32;
                let height = (f64::from(desktop_height) * ratio).round() as i32;
                (
                    WindowDimensions::Integer { width, height },
                    WindowPosition {
                        left: (viewport.width - width) / 2,
                        top: (desktop_height - height) / 2,
                    },
                )
            };
            let (dimensions, position) =
                match (state.original_dimensions.take(), state.original_position.take()) {
                    (Some(dimensions), Some(position)) => (dimensions, position),
                    (Some(dimensions), None) => (dimensions, fallback().1),
                    (None, _) => fallback(),
                };
            state.dimensions = dimensions;
            state.position = Some(position);
            state.full_screen = false;
        }

        self.abort_pointer_sessions_for(id);
        self.view.set_interactive(id, !entering);
        self.render_geometry(id);
        self.request_persist(id);
        true
    }
}
