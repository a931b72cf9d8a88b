//! Store doubles for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::Value;

use crate::error::StoreError;
use crate::store::{MemoryBackend, OptionsStore, TransientStore};

/// Which store calls should fail, and how.
#[derive(Debug, Default, Clone, Copy)]
pub struct Faults {
    pub transient_get: bool,
    pub transient_set: bool,
    pub transient_delete: bool,
    pub option_get: bool,
    pub options_query: bool,
    /// Report `false` from every `transient_set` without erroring
    pub refuse_set: bool,
}

/// Memory backend that counts calls and injects faults.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    pub inner: MemoryBackend,
    pub faults: Faults,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(faults: Faults) -> Self {
        Self {
            inner: MemoryBackend::new(),
            faults,
            calls: AtomicUsize::new(0),
        }
    }

    /// Total number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, fail: bool, op: &str) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if fail {
            return Err(StoreError::Unavailable(format!("{op} failed")));
        }
        Ok(())
    }
}

impl TransientStore for ScriptedBackend {
    fn transient_get(&self, key: &str) -> Result<Value, StoreError> {
        self.enter(self.faults.transient_get, "transient_get")?;
        self.inner.transient_get(key)
    }

    fn transient_set(
        &self,
        key: &str,
        value: &Value,
        ttl_seconds: i64,
    ) -> Result<bool, StoreError> {
        self.enter(self.faults.transient_set, "transient_set")?;
        if self.faults.refuse_set {
            return Ok(false);
        }
        self.inner.transient_set(key, value, ttl_seconds)
    }

    fn transient_delete(&self, key: &str) -> Result<bool, StoreError> {
        self.enter(self.faults.transient_delete, "transient_delete")?;
        self.inner.transient_delete(key)
    }
}

impl OptionsStore for ScriptedBackend {
    fn option_get(&self, name: &str, fallback: &Value) -> Result<Value, StoreError> {
        self.enter(self.faults.option_get, "option_get")?;
        self.inner.option_get(name, fallback)
    }

    fn options_query(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        self.enter(self.faults.options_query, "options_query")?;
        self.inner.options_query(prefix)
    }
}
