//! Key-value slot storage
//!
//! The todo list is persisted as one string value under one key. Anything
//! that can read and write such a slot can back a [`TodoList`].
//!
//! [`TodoList`]: crate::domain::TodoList

use std::collections::HashMap;

use thiserror::Error;

/// Key under which the todo collection is persisted
pub const STORAGE_KEY: &str = "todos_v1";

/// Default quota per slot, matching the common browser local storage limit
pub const DEFAULT_MAX_SLOT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    /// The slot could not be read or does not hold a valid todo list
    #[error("Failed to read slot '{key}': {reason}")]
    Read { key: String, reason: String },

    /// The slot could not be written (unavailable or full)
    #[error("Failed to write slot '{key}': {reason}")]
    Write { key: String, reason: String },
}

impl PersistenceError {
    pub fn read(key: &str, reason: impl ToString) -> Self {
        Self::Read {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(key: &str, reason: impl ToString) -> Self {
        Self::Write {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    #[cfg(test)]
    pub(crate) fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// Storage port for a single named slot
pub trait SlotStore {
    /// Returns the stored value, or `None` if the slot was never written
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replaces the stored value
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<S: SlotStore + ?Sized> SlotStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).write(key, value)
    }
}

/// In-memory slot store
///
/// Used by tests and by hosts that do not want anything on disk. An optional
/// quota makes oversized writes fail the way a full browser store does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    max_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits every slot to `max_bytes`
    pub fn with_quota(max_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            max_bytes: Some(max_bytes),
        }
    }

    /// Seeds a slot directly, bypassing the quota
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.slots.insert(key.into(), value.into());
    }

    /// Returns the raw value of a slot
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SlotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        check_quota(key, value, self.max_bytes)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Rejects values larger than the quota
pub(crate) fn check_quota(
    key: &str,
    value: &str,
    max_bytes: Option<usize>,
) -> Result<(), PersistenceError> {
    match max_bytes {
        Some(max) if value.len() > max => Err(PersistenceError::write(
            key,
            format!("quota exceeded ({} bytes > {} byte limit)", value.len(), max),
        )),
        _ => Ok(()),
    }
}
