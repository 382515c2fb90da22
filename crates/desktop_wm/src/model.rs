use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dialog::DialogContent;

/// Window type used when a caller does not pick one.
pub const WINDOW_TYPE_DEFAULT: &str = "default";
/// Reserved window type for dialog boxes. Windows of this type are never persisted.
pub const WINDOW_TYPE_DIALOG: &str = "dialog";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a `window-<ms>` id that is unique within this process.
    pub fn generate() -> Self {
        Self(format!(
            "window-{}",
            platform_host::next_unique_timestamp_ms()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the taskbar tab mirroring this window.
    pub fn tab_id(&self) -> String {
        format!("tab-{}", self.0)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowPosition {
    pub left: i32,
    pub top: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WindowDimensions {
    /// Fills the desktop area above the taskbar.
    #[default]
    Default,
    /// Fixed pixel size.
    Integer { width: i32, height: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    /// Height available to windows once the taskbar is subtracted.
    pub fn desktop_height(self, taskbar_height: i32) -> i32 {
        (self.height - taskbar_height).max(0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Resolved on-screen geometry handed to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

/// Translation applied to the desktop surface when it is panned (touch devices).
///
/// Screen coordinates equal stage coordinates plus the pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StagePan {
    pub x: i32,
    pub y: i32,
}

impl StagePan {
    pub fn screen_to_stage(self, pointer: PointerPosition) -> PointerPosition {
        PointerPosition {
            x: pointer.x - self.x,
            y: pointer.y - self.y,
        }
    }
}

/// Per-window record; the single source of truth for geometry, visibility and stacking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub id: WindowId,
    pub title: String,
    pub is_nav: bool,
    pub is_minimized: bool,
    pub dimensions: WindowDimensions,
    pub window_type: String,
    pub position: Option<WindowPosition>,
    pub full_screen: bool,
    pub original_dimensions: Option<WindowDimensions>,
    pub original_position: Option<WindowPosition>,
    pub color: Option<String>,
    pub z_index: u32,
    #[serde(default)]
    pub parent_window: Option<WindowId>,
}

impl WindowState {
    pub fn is_dialog(&self) -> bool {
        self.window_type == WINDOW_TYPE_DIALOG
    }

    pub fn is_visible(&self) -> bool {
        !self.is_minimized
    }

    /// Resolves the rendered rectangle for this record inside `viewport`.
    pub fn rect(&self, viewport: Viewport, taskbar_height: i32) -> WindowRect {
        let position = self.position.unwrap_or_default();
        let (w, h) = match self.dimensions {
            WindowDimensions::Default => (viewport.width, viewport.desktop_height(taskbar_height)),
            WindowDimensions::Integer { width, height } => (width, height),
        };
        WindowRect {
            x: position.left,
            y: position.top,
            w,
            h,
        }
    }
}

/// Content mounted into a window body.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowContent {
    /// Opaque application payload rendered by the caller-provided view.
    App(Value),
    /// Dialog box body built by the dialog subsystem.
    Dialog(DialogContent),
}

/// Arguments for [`crate::WindowManager::create_window`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWindowRequest {
    pub title: String,
    pub content: WindowContent,
    /// Singleton window addressed by `title`.
    pub is_nav: bool,
    /// Caller-chosen id; generated when `None`.
    pub id: Option<WindowId>,
    pub start_minimized: bool,
    /// Recreating a window from persisted state; stored geometry wins over the request.
    pub is_restore: bool,
    pub dimensions: WindowDimensions,
    pub window_type: String,
    pub parent_window: Option<WindowId>,
    pub color: Option<String>,
    /// Explicit stacking value, only used by bulk restore.
    pub z_index: Option<u32>,
}

impl CreateWindowRequest {
    pub fn new(title: impl Into<String>, content: WindowContent) -> Self {
        Self {
            title: title.into(),
            content,
            is_nav: false,
            id: None,
            start_minimized: false,
            is_restore: false,
            dimensions: WindowDimensions::Default,
            window_type: WINDOW_TYPE_DEFAULT.to_string(),
            parent_window: None,
            color: None,
            z_index: None,
        }
    }

    /// Request for a fixed-size application window with an opaque payload.
    pub fn app(title: impl Into<String>, width: i32, height: i32) -> Self {
        let mut req = Self::new(title, WindowContent::App(Value::Null));
        req.dimensions = WindowDimensions::Integer { width, height };
        req
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn dimensions_serialize_as_tagged_union() {
        assert_eq!(
            serde_json::to_value(WindowDimensions::Default).unwrap(),
            json!({"type": "default"})
        );
        assert_eq!(
            serde_json::to_value(WindowDimensions::Integer {
                width: 400,
                height: 300
            })
            .unwrap(),
            json!({"type": "integer", "width": 400, "height": 300})
        );
    }

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let first = WindowId::generate();
        let second = WindowId::generate();
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("window-"));
        assert_eq!(WindowId::from("calculator").tab_id(), "tab-calculator");
    }

    #[test]
    fn default_dimensions_fill_desktop_above_taskbar() {
        let state = WindowState {
            id: WindowId::from("explorer"),
            title: "Explorer".to_string(),
            is_nav: false,
            is_minimized: false,
            dimensions: WindowDimensions::Default,
            window_type: WINDOW_TYPE_DEFAULT.to_string(),
            position: None,
            full_screen: false,
            original_dimensions: None,
            original_position: None,
            color: None,
            z_index: 1,
            parent_window: None,
        };
        let rect = state.rect(
            Viewport {
                width: 800,
                height: 600,
            },
            38,
        );
        assert_eq!(
            rect,
            WindowRect {
                x: 0,
                y: 0,
                w: 800,
                h: 562
            }
        );
    }

    #[test]
    fn stage_pan_corrects_screen_coordinates() {
        let pan = StagePan { x: -100, y: 25 };
        assert_eq!(
            pan.screen_to_stage(PointerPosition { x: 10, y: 50 }),
            PointerPosition { x: 110, y: 25 }
        );
    }
}
