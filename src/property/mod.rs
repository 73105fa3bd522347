//! Property-store seam.
//!
//! Property-bound text reads its value through [`PropertyStore`] at draw time.
//! Persisting properties (config files and the like) belongs to the host; the
//! in-memory store covers hosts that keep settings elsewhere, and tests.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertyError {
    #[error("property `{0}` not present")]
    NotFound(String),
}

pub trait PropertyStore {
    fn read(&self, key: &str) -> Result<String, PropertyError>;

    fn write(&mut self, key: &str, value: &str);

    /// Read `key`, treating any failure as "no value" and substituting `fallback`.
    fn read_or(&self, key: &str, fallback: &str) -> String {
        self.read(key).unwrap_or_else(|_| fallback.to_string())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryPropertyStore {
    values: HashMap<String, String>,
}

impl MemoryPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn read(&self, key: &str) -> Result<String, PropertyError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| PropertyError::NotFound(key.to_string()))
    }

    fn write(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Store that never holds a value; every read falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyPropertyStore;

impl PropertyStore for EmptyPropertyStore {
    fn read(&self, key: &str) -> Result<String, PropertyError> {
        Err(PropertyError::NotFound(key.to_string()))
    }

    fn write(&mut self, _key: &str, _value: &str) {}
}
