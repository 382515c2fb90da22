//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate wires the window manager's host services to the browser: `localStorage` for
//! window-state persistence (both as the async store and as its synchronous fallback) and an
//! ARIA live region for screen-reader announcements. On other targets each adapter degrades to a
//! no-op so native builds and tests link without a browser.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod a11y;
pub mod adapters;
pub mod storage;

pub use a11y::LiveRegionAnnouncer;
pub use adapters::{announcer, fallback_prefs_store, prefs_store};
pub use storage::local_prefs::WebPrefsStore;
