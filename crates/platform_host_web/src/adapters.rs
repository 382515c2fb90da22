//! Concrete adapter factories used by runtime wiring.

use std::rc::Rc;

use platform_host::{Announcer, PrefsStore, SyncPrefsStore};

use crate::{LiveRegionAnnouncer, WebPrefsStore};

/// Returns the async preference store used for window-state persistence.
pub fn prefs_store() -> Rc<dyn PrefsStore> {
    Rc::new(WebPrefsStore)
}

/// Returns the synchronous store used when the async store rejects a write.
pub fn fallback_prefs_store() -> Rc<dyn SyncPrefsStore> {
    Rc::new(WebPrefsStore)
}

/// Returns the live-region announcer attached to the desktop document.
pub fn announcer() -> Rc<dyn Announcer> {
    Rc::new(LiveRegionAnnouncer::default())
}
