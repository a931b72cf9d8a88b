//! Silent Pool Module
//!
//! Decorator for callers that only accept argument errors from a cache.

use serde_json::Value;
use tracing::warn;

use crate::cache::{SimpleCache, Ttl};
use crate::error::Result;

// == Silent Pool ==
/// Wraps a cache and turns every error except invalid arguments into a
/// benign result: reads fall back to their default, writes return `false`.
#[derive(Debug, Clone)]
pub struct SilentPool<C> {
    inner: C,
}

impl<C: SimpleCache> SilentPool<C> {
    /// Wraps `inner`.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Returns the wrapped cache.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

/// Passes argument errors through; logs and replaces the rest with `fallback`.
fn silence<T>(op: &str, result: Result<T>, fallback: impl FnOnce() -> T) -> Result<T> {
    match result {
        Err(e) if !e.is_invalid_argument() => {
            warn!("Cache {} failed, error suppressed: {}", op, e);
            Ok(fallback())
        }
        other => other,
    }
}

impl<C: SimpleCache> SimpleCache for SilentPool<C> {
    fn get(&self, key: &str, default: Value) -> Result<Value> {
        silence("get", self.inner.get(key, default.clone()), || default)
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<bool> {
        silence("set", self.inner.set(key, value, ttl), || false)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        silence("delete", self.inner.delete(key), || false)
    }

    fn clear(&self) -> Result<bool> {
        // Clearing never reports an error, not even a malformed stored key.
        match self.inner.clear() {
            Ok(cleared) => Ok(cleared),
            Err(e) => {
                warn!("Cache clear failed, error suppressed: {}", e);
                Ok(false)
            }
        }
    }

    fn has(&self, key: &str) -> Result<bool> {
        silence("has", self.inner.has(key), || false)
    }

    fn get_multiple(&self, keys: &[String], default: Value) -> Result<Vec<(String, Value)>> {
        silence("get_multiple", self.inner.get_multiple(keys, default), Vec::new)
    }

    fn set_multiple(&self, values: Vec<(String, Value)>, ttl: Option<Ttl>) -> Result<bool> {
        silence("set_multiple", self.inner.set_multiple(values, ttl), || false)
    }

    fn delete_multiple(&self, keys: &[String]) -> Result<bool> {
        silence("delete_multiple", self.inner.delete_multiple(keys), || false)
    }
}
