//! Window-state persistence bridge and bulk restore.
//!
//! Snapshots travel as a versioned [`AppStateEnvelope`] stored as JSON text under one key. Saves
//! go through the async [`PrefsStore`] and retry through the synchronous fallback store when the
//! async write fails.

use std::{collections::BTreeMap, rc::Rc};

use leptos::logging;
use platform_host::{
    build_app_state_envelope, decode_envelope_payload, AppStateEnvelope, PrefsStore,
    SyncPrefsStore, WINDOW_STATES_NAMESPACE,
};
use serde_json::Value;
use thiserror::Error;

use crate::{
    model::{CreateWindowRequest, WindowContent, WindowId, WindowState},
    window_manager::WindowManager,
};

/// Schema version of the persisted window-state payload.
pub const WINDOW_STATES_SCHEMA_VERSION: u32 = 1;

/// Persisted records keyed by window id.
pub type WindowStatesSnapshot = BTreeMap<WindowId, WindowState>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersistError {
    #[error("failed to serialize window states: {0}")]
    Serialize(String),
    #[error("failed to decode stored window states: {0}")]
    Decode(String),
    #[error("window state store failed: {0}")]
    Store(String),
    #[error("window state store failed ({primary}) and the fallback failed too ({fallback})")]
    Fallback { primary: String, fallback: String },
}

/// Which store accepted a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Stored,
    StoredViaFallback,
}

#[derive(Clone)]
pub struct PersistenceBridge {
    store: Rc<dyn PrefsStore>,
    fallback: Option<Rc<dyn SyncPrefsStore>>,
    key: String,
}

impl PersistenceBridge {
    pub fn new(
        store: Rc<dyn PrefsStore>,
        fallback: Option<Rc<dyn SyncPrefsStore>>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fallback,
            key: key.into(),
        }
    }

    /// Bridge over the browser's local storage, which also serves as its own sync fallback.
    pub fn browser(key: impl Into<String>) -> Self {
        Self::new(
            platform_host_web::prefs_store(),
            Some(platform_host_web::fallback_prefs_store()),
            key,
        )
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn encode(snapshot: &WindowStatesSnapshot) -> Result<String, PersistError> {
        let envelope = build_app_state_envelope(
            WINDOW_STATES_NAMESPACE,
            WINDOW_STATES_SCHEMA_VERSION,
            snapshot,
        )
        .map_err(PersistError::Serialize)?;
        serde_json::to_string(&envelope).map_err(|e| PersistError::Serialize(e.to_string()))
    }

    /// Decodes stored text: a current envelope, a schema-0 envelope, or a bare id-to-record map
    /// written before envelopes existed.
    pub fn decode(raw: &str) -> Result<WindowStatesSnapshot, PersistError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| PersistError::Decode(e.to_string()))?;
        let is_envelope = value
            .as_object()
            .is_some_and(|object| object.contains_key("envelope_version"));
        if !is_envelope {
            return serde_json::from_value(value).map_err(|e| PersistError::Decode(e.to_string()));
        }

        let envelope: AppStateEnvelope =
            serde_json::from_value(value).map_err(|e| PersistError::Decode(e.to_string()))?;
        if envelope.namespace != WINDOW_STATES_NAMESPACE {
            return Err(PersistError::Decode(format!(
                "unexpected namespace `{}`",
                envelope.namespace
            )));
        }
        match envelope.schema_version {
            0 | WINDOW_STATES_SCHEMA_VERSION => {
                decode_envelope_payload(&envelope).map_err(PersistError::Decode)
            }
            other => Err(PersistError::Decode(format!(
                "unsupported schema version {other}"
            ))),
        }
    }

    /// Writes `snapshot`, retrying through the sync fallback when the async store fails.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Fallback`] when both stores reject the write.
    pub async fn save(
        &self,
        snapshot: &WindowStatesSnapshot,
    ) -> Result<PersistOutcome, PersistError> {
        let raw = Self::encode(snapshot)?;
        let primary = match self.store.save_pref(&self.key, &raw).await {
            Ok(()) => return Ok(PersistOutcome::Stored),
            Err(err) => err,
        };
        logging::warn!("window state save failed: {primary}; retrying through sync fallback");

        let Some(fallback) = self.fallback.as_ref() else {
            return Err(PersistError::Fallback {
                primary,
                fallback: "no synchronous fallback store".to_string(),
            });
        };
        fallback
            .save_pref_sync(&self.key, &raw)
            .map(|()| PersistOutcome::StoredViaFallback)
            .map_err(|fallback| PersistError::Fallback { primary, fallback })
    }

    /// Reads the stored snapshot, if any, falling back to the sync store on error.
    pub async fn load(&self) -> Result<Option<WindowStatesSnapshot>, PersistError> {
        let raw = match self.store.load_pref(&self.key).await {
            Ok(raw) => raw,
            Err(primary) => {
                logging::warn!("window state load failed: {primary}; trying sync fallback");
                match self.fallback.as_ref() {
                    Some(fallback) => fallback
                        .load_pref_sync(&self.key)
                        .map_err(|fallback| PersistError::Fallback { primary, fallback })?,
                    None => return Err(PersistError::Store(primary)),
                }
            }
        };
        raw.as_deref().map(Self::decode).transpose()
    }

    /// Forgets the stored snapshot so the next session starts with an empty desktop.
    pub async fn clear(&self) -> Result<(), PersistError> {
        self.store
            .delete_pref(&self.key)
            .await
            .map_err(PersistError::Store)
    }
}

impl WindowManager {
    /// Every non-dialog record, as written by the persistence bridge.
    pub fn persisted_snapshot(&self) -> WindowStatesSnapshot {
        self.windows
            .iter()
            .filter(|(_, state)| !state.is_dialog())
            .map(|(id, state)| (id.clone(), state.clone()))
            .collect()
    }

    /// Recreates persisted windows in ascending z-order, keeping their stored geometry, stacking
    /// and minimized flag.
    ///
    /// `content_for` supplies the body of each record; records it returns `None` for are dropped.
    /// One persist is queued for the whole batch.
    pub fn restore_windows<F>(
        &mut self,
        snapshot: WindowStatesSnapshot,
        mut content_for: F,
    ) -> Vec<WindowId>
    where
        F: FnMut(&WindowState) -> Option<WindowContent>,
    {
        let mut records: Vec<WindowState> = snapshot
            .into_values()
            .filter(|state| !state.is_dialog())
            .collect();
        records.sort_by_key(|state| state.z_index);

        let restored = self.with_persist_suppressed(|wm| {
            let mut restored = Vec::with_capacity(records.len());
            for record in records {
                let Some(content) = content_for(&record) else {
                    logging::warn!("dropping persisted window {} with no content", record.id);
                    continue;
                };
                let id = record.id.clone();
                let request = CreateWindowRequest {
                    title: record.title.clone(),
                    content,
                    is_nav: record.is_nav,
                    id: Some(id.clone()),
                    start_minimized: record.is_minimized,
                    is_restore: true,
                    dimensions: record.dimensions,
                    window_type: record.window_type.clone(),
                    parent_window: record.parent_window.clone(),
                    color: record.color.clone(),
                    z_index: Some(record.z_index),
                };
                wm.pending_restore.insert(id.clone(), record);
                let created = wm.create_window(request);
                wm.pending_restore.remove(&id);
                restored.push(created);
            }
            restored
        });

        if !restored.is_empty() {
            logging::log!("restored {} windows", restored.len());
            self.enqueue_persist();
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryPrefsStore;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        effects::RuntimeEffect,
        model::{WindowDimensions, WindowPosition},
        window_manager::tests::{harness, open},
    };

    fn bridge(store: &MemoryPrefsStore, with_fallback: bool) -> PersistenceBridge {
        let fallback: Option<Rc<dyn SyncPrefsStore>> = if with_fallback {
            Some(Rc::new(store.clone()))
        } else {
            None
        };
        PersistenceBridge::new(Rc::new(store.clone()), fallback, "windowStates")
    }

    fn app_content(_: &WindowState) -> Option<WindowContent> {
        Some(WindowContent::App(Value::Null))
    }

    fn sample_snapshot() -> WindowStatesSnapshot {
        let mut h = harness();
        let a = open(&mut h.wm, "a");
        open(&mut h.wm, "b");
        h.wm.minimize_window(&a);
        h.wm.persisted_snapshot()
    }

    #[test]
    fn save_then_load_returns_the_same_snapshot() {
        let store = MemoryPrefsStore::default();
        let bridge = bridge(&store, true);
        let snapshot = sample_snapshot();

        assert_eq!(block_on(bridge.save(&snapshot)), Ok(PersistOutcome::Stored));
        assert_eq!(block_on(bridge.load()), Ok(Some(snapshot)));
        assert_eq!(store.async_writes(), 1);
    }

    #[test]
    fn failed_async_write_falls_back_to_sync_store() {
        let store = MemoryPrefsStore::default();
        store.set_fail_async(true);
        let bridge = bridge(&store, true);

        assert_eq!(
            block_on(bridge.save(&sample_snapshot())),
            Ok(PersistOutcome::StoredViaFallback)
        );
        assert_eq!(store.sync_writes(), 1);
        assert!(store.raw("windowStates").is_some());
        assert_eq!(block_on(bridge.load()).map(|s| s.map(|s| s.len())), Ok(Some(2)));
    }

    #[test]
    fn both_stores_failing_reports_fallback_error() {
        let store = MemoryPrefsStore::default();
        store.set_fail_async(true);
        store.set_fail_sync(true);

        let err = block_on(bridge(&store, true).save(&sample_snapshot())).unwrap_err();
        assert!(matches!(err, PersistError::Fallback { .. }));
        let err = block_on(bridge(&store, false).save(&sample_snapshot())).unwrap_err();
        assert!(matches!(err, PersistError::Fallback { .. }));
        assert_eq!(
            block_on(bridge(&store, false).load()),
            Err(PersistError::Store("async store unavailable".to_string()))
        );
    }

    #[test]
    fn clear_forgets_the_stored_snapshot() {
        let store = MemoryPrefsStore::default();
        let bridge = bridge(&store, false);
        block_on(bridge.save(&sample_snapshot())).unwrap();

        assert_eq!(block_on(bridge.clear()), Ok(()));
        assert_eq!(block_on(bridge.load()), Ok(None));
    }

    #[test]
    fn decode_accepts_schema_zero_and_bare_maps() {
        let snapshot = sample_snapshot();
        let payload = serde_json::to_value(&snapshot).unwrap();

        let bare = payload.to_string();
        assert_eq!(PersistenceBridge::decode(&bare), Ok(snapshot.clone()));

        let v0 = json!({
            "envelope_version": 1,
            "namespace": "system.windows",
            "schema_version": 0,
            "updated_at_unix_ms": 1,
            "payload": payload,
        });
        assert_eq!(PersistenceBridge::decode(&v0.to_string()), Ok(snapshot));

        let future = json!({
            "envelope_version": 1,
            "namespace": "system.windows",
            "schema_version": 9,
            "updated_at_unix_ms": 1,
            "payload": {},
        });
        assert!(matches!(
            PersistenceBridge::decode(&future.to_string()),
            Err(PersistError::Decode(_))
        ));
        assert!(PersistenceBridge::decode("not json").is_err());
    }

    #[test]
    fn records_use_camel_case_keys_and_legacy_maps_decode() {
        let snapshot = sample_snapshot();
        let encoded = serde_json::to_value(&snapshot[&WindowId::from("a")]).unwrap();
        let keys: Vec<&str> = encoded
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        for key in [
            "isNav",
            "isMinimized",
            "windowType",
            "fullScreen",
            "originalDimensions",
            "originalPosition",
            "zIndex",
        ] {
            assert!(keys.contains(&key), "missing `{key}` in {keys:?}");
        }
        assert!(!keys.contains(&"z_index"));

        let legacy = json!({
            "calculator": {
                "id": "calculator",
                "title": "Calculator",
                "isNav": false,
                "isMinimized": false,
                "dimensions": {"type": "integer", "width": 300, "height": 400},
                "windowType": "default",
                "position": {"left": 60, "top": 80},
                "fullScreen": false,
                "originalDimensions": null,
                "originalPosition": null,
                "color": null,
                "zIndex": 3
            }
        });
        let decoded = PersistenceBridge::decode(&legacy.to_string()).unwrap();
        let calculator = &decoded[&WindowId::from("calculator")];
        assert_eq!(calculator.z_index, 3);
        assert_eq!(calculator.position, Some(WindowPosition { left: 60, top: 80 }));
        assert_eq!(calculator.parent_window, None);
    }

    #[test]
    fn dialogs_are_excluded_from_snapshots() {
        let mut h = harness();
        open(&mut h.wm, "a");
        h.wm.show_dialog(
            "hi",
            crate::dialog::DialogKind::Info,
            crate::dialog::DialogOptions::default(),
        );
        assert_eq!(h.wm.window_count(), 2);
        assert_eq!(
            h.wm.persisted_snapshot().keys().cloned().collect::<Vec<_>>(),
            vec![WindowId::from("a")]
        );
    }

    #[test]
    fn restore_keeps_geometry_stacking_and_minimized_flags() {
        let mut source = harness();
        let a = open(&mut source.wm, "a");
        let b = open(&mut source.wm, "b");
        let c = open(&mut source.wm, "c");
        source.wm.toggle_full_screen(&b);
        source.wm.minimize_window(&c);
        source.wm.bring_to_front(&a);
        let snapshot = source.wm.persisted_snapshot();

        let mut h = harness();
        let restored = h.wm.restore_windows(snapshot.clone(), |state| {
            (state.id.as_str() != "c").then(|| WindowContent::App(Value::Null))
        });
        assert_eq!(restored, vec![b.clone(), a.clone()]);
        assert_eq!(h.wm.drain_effects(), vec![RuntimeEffect::PersistWindowStates]);

        let restored_b = h.wm.window(&b).unwrap();
        assert_eq!(restored_b.z_index, snapshot[&b].z_index);
        assert!(restored_b.full_screen);
        assert_eq!(
            restored_b.original_dimensions,
            Some(WindowDimensions::Integer {
                width: 400,
                height: 300
            })
        );
        assert_eq!(
            h.wm.window(&a).unwrap().position,
            Some(WindowPosition { left: 40, top: 40 })
        );
        assert_eq!(h.wm.active_window(), Some(a.clone()));
        assert_eq!(h.taskbar.active_tab_ids(), vec![a.tab_id()]);

        let fresh = open(&mut h.wm, "fresh");
        assert!(h.wm.window(&fresh).unwrap().z_index > snapshot[&a].z_index);
    }

    #[test]
    fn restoring_minimized_windows_mounts_them_hidden() {
        let mut source = harness();
        let a = open(&mut source.wm, "a");
        source.wm.minimize_window(&a);
        let snapshot = source.wm.persisted_snapshot();

        let mut h = harness();
        h.wm.restore_windows(snapshot, app_content);
        assert!(h.wm.window(&a).unwrap().is_minimized);
        assert!(!h.view.window(&a).unwrap().visible);
        assert!(h.taskbar.tab("tab-a").unwrap().minimized);
        assert!(h.taskbar.active_tab_ids().is_empty());
    }
}
