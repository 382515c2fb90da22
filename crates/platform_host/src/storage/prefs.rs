//! Key-value preference storage contracts and adapters.
//!
//! The window manager persists through an async store and, when that fails, retries through a
//! synchronous fallback. Both contracts store raw JSON text per key.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Async host service for preference values (JSON stored as text per key).
pub trait PrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Saves a raw JSON string for a preference key.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Deletes a preference key.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

/// Synchronous fallback pair used when the async store rejects a read or write.
pub trait SyncPrefsStore {
    /// Loads a raw JSON string for a preference key.
    fn load_pref_sync(&self, key: &str) -> Result<Option<String>, String>;

    /// Saves a raw JSON string for a preference key.
    fn save_pref_sync(&self, key: &str, raw_json: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for unsupported targets and baseline tests.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

impl SyncPrefsStore for NoopPrefsStore {
    fn load_pref_sync(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save_pref_sync(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, and the async and sync APIs read and write the same
/// entries. Each side can be switched into a failing mode to exercise fallback paths.
pub struct MemoryPrefsStore {
    inner: Rc<RefCell<MemoryPrefsInner>>,
}

#[derive(Debug, Default)]
struct MemoryPrefsInner {
    values: HashMap<String, String>,
    fail_async: bool,
    fail_sync: bool,
    async_writes: usize,
    sync_writes: usize,
}

impl MemoryPrefsStore {
    /// Makes every async operation fail with a store error.
    pub fn set_fail_async(&self, fail: bool) {
        self.inner.borrow_mut().fail_async = fail;
    }

    /// Makes every sync operation fail with a store error.
    pub fn set_fail_sync(&self, fail: bool) {
        self.inner.borrow_mut().fail_sync = fail;
    }

    /// Returns the raw value currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().values.get(key).cloned()
    }

    /// Number of successful async writes.
    pub fn async_writes(&self) -> usize {
        self.inner.borrow().async_writes
    }

    /// Number of successful sync writes.
    pub fn sync_writes(&self) -> usize {
        self.inner.borrow().sync_writes
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move {
            let inner = self.inner.borrow();
            if inner.fail_async {
                return Err("async store unavailable".to_string());
            }
            Ok(inner.values.get(key).cloned())
        })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if inner.fail_async {
                return Err("async store unavailable".to_string());
            }
            inner.values.insert(key.to_string(), raw_json.to_string());
            inner.async_writes += 1;
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            if inner.fail_async {
                return Err("async store unavailable".to_string());
            }
            inner.values.remove(key);
            Ok(())
        })
    }
}

impl SyncPrefsStore for MemoryPrefsStore {
    fn load_pref_sync(&self, key: &str) -> Result<Option<String>, String> {
        let inner = self.inner.borrow();
        if inner.fail_sync {
            return Err("sync store unavailable".to_string());
        }
        Ok(inner.values.get(key).cloned())
    }

    fn save_pref_sync(&self, key: &str, raw_json: &str) -> Result<(), String> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_sync {
            return Err("sync store unavailable".to_string());
        }
        inner.values.insert(key.to_string(), raw_json.to_string());
        inner.sync_writes += 1;
        Ok(())
    }
}
