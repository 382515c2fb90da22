//! Window manager for the retro desktop shell: window lifecycle, z-order, taskbar tabs, the
//! window cycler, dialogs, drag/resize and window-state persistence.

pub mod config;
pub mod cycler;
pub mod dialog;
pub mod effects;
mod fullscreen;
pub mod host;
pub mod interaction;
pub mod model;
pub mod persistence;
pub mod shortcuts;
pub mod taskbar;
pub mod view;
pub mod window_manager;
pub mod z_order;

pub use config::{ConfigError, WindowManagerConfig};
pub use cycler::{CycleOutcome, CyclerEntry};
pub use dialog::{
    DialogButton, DialogContent, DialogHandle, DialogKey, DialogKind, DialogOptions, DialogResult,
};
pub use effects::RuntimeEffect;
pub use host::DesktopHost;
pub use interaction::{DragSession, ResizeSession};
pub use model::*;
pub use persistence::{
    PersistError, PersistOutcome, PersistenceBridge, WindowStatesSnapshot,
    WINDOW_STATES_SCHEMA_VERSION,
};
pub use shortcuts::{shortcut_action, KeyPhase, ShortcutAction, ShortcutKey};
pub use taskbar::{tab_menu_items, TabMenuItem, TaskbarTab, TaskbarTabs};
pub use view::{
    MemoryTaskbarView, MemoryWindowView, MountRequest, RenderedCycler, RenderedWindow,
    TaskbarView, WindowView,
};
pub use window_manager::WindowManager;
pub use z_order::ZOrderAllocator;
