//! Typed host-domain contracts shared by the window manager and its browser adapters.
//!
//! This crate is the API-first boundary for the services the window manager consumes but does
//! not own: the persistent key-value store (async with a synchronous fallback), the versioned
//! persistence envelope, the screen-reader announcement sink, and time helpers. Concrete browser
//! adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod a11y;
pub mod storage;
pub mod time;

pub use a11y::{AnnouncePriority, Announcement, Announcer, MemoryAnnouncer, NoopAnnouncer};
pub use storage::app_state::{
    build_app_state_envelope, decode_envelope_payload, AppStateEnvelope,
    APP_STATE_ENVELOPE_VERSION, WINDOW_STATES_NAMESPACE,
};
pub use storage::prefs::{
    MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture, SyncPrefsStore,
};
pub use time::{next_unique_timestamp_ms, unix_time_ms_now};
