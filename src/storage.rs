//! Persistent Key-Value Storage
//!
//! Abstract slot the store is mirrored to. The browser implementation wraps
//! `window.localStorage`; the in-memory one stands in when that is unavailable.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ScheduleError, ScheduleResult};

/// Synchronous string key-value storage
pub trait KeyValueStorage {
    /// Read the value under `key`, `None` if absent
    fn get(&self, key: &str) -> ScheduleResult<Option<String>>;

    /// Overwrite the value under `key`
    fn set(&self, key: &str, value: &str) -> ScheduleResult<()>;
}

/// `window.localStorage`
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// `None` when there is no window or the browser denies storage access
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> ScheduleResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| ScheduleError::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> ScheduleResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| ScheduleError::Storage(format!("{:?}", e)))
    }
}

/// Process-local storage; clones share the same entries
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.entries.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> ScheduleResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ScheduleResult<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Memory storage whose next `fail_writes` writes are rejected, like a full quota
#[cfg(test)]
#[derive(Clone, Default)]
pub struct FlakyStorage {
    pub inner: MemoryStorage,
    pub fail_writes: Rc<std::cell::Cell<usize>>,
}

#[cfg(test)]
impl FlakyStorage {
    pub fn failing(writes: usize) -> Self {
        let storage = Self::default();
        storage.fail_writes.set(writes);
        storage
    }
}

#[cfg(test)]
impl KeyValueStorage for FlakyStorage {
    fn get(&self, key: &str) -> ScheduleResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> ScheduleResult<()> {
        let remaining = self.fail_writes.get();
        if remaining > 0 {
            self.fail_writes.set(remaining - 1);
            return Err(ScheduleError::Storage("QuotaExceededError".to_string()));
        }
        self.inner.set(key, value)
    }
}

/// Browser storage if available, otherwise a non-persistent fallback
pub fn open_storage() -> Box<dyn KeyValueStorage> {
    match BrowserStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            tracing::warn!("localStorage unavailable, calendar data will not persist");
            Box::new(MemoryStorage::default())
        }
    }
}
