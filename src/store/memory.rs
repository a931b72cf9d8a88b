//! Memory Backend Module
//!
//! In-process options table that also serves transients on top of it.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{
    timeout_option_name, value_option_name, OptionsStore, TransientStore, NOT_FOUND,
    OPTION_NAME_MAX_LENGTH, TIMEOUT_PREFIX, TRANSIENT_OPTION_PREFIX,
};

// == Memory Backend ==
/// Options table held in memory.
///
/// Transients follow the host's behaviour: expired entries are dropped when
/// read, and rewriting an unchanged value reports failure even though the
/// expiry is refreshed.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Option name to value
    options: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    // == Option Access ==
    /// Writes a raw option record.
    pub fn set_option(&self, name: impl Into<String>, value: Value) -> Result<(), StoreError> {
        self.write()?.insert(name.into(), value);
        Ok(())
    }

    /// Number of option records, bookkeeping included.
    pub fn option_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    // == Purge Expired ==
    /// Removes every transient whose expiry has passed.
    ///
    /// Returns the number of transients removed.
    pub fn purge_expired(&self) -> Result<usize, StoreError> {
        self.purge_expired_at(Utc::now().timestamp())
    }

    /// Removes every transient that has expired as of `now` (unix seconds).
    pub fn purge_expired_at(&self, now: i64) -> Result<usize, StoreError> {
        let timeout_prefix = format!("{TRANSIENT_OPTION_PREFIX}{TIMEOUT_PREFIX}");
        let mut options = self.write()?;

        let expired: Vec<String> = options
            .iter()
            .filter_map(|(name, expiry)| {
                let key = name.strip_prefix(&timeout_prefix)?;
                is_expired(Some(expiry), now).then(|| key.to_string())
            })
            .collect();

        for key in &expired {
            options.remove(&value_option_name(key));
            options.remove(&timeout_option_name(key));
        }

        Ok(expired.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Value>>, StoreError> {
        self.options
            .read()
            .map_err(|_| StoreError::Unavailable("options lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Value>>, StoreError> {
        self.options
            .write()
            .map_err(|_| StoreError::Unavailable("options lock poisoned".to_string()))
    }
}

/// An expiry record in the past means the transient is gone.
fn is_expired(expiry: Option<&Value>, now: i64) -> bool {
    matches!(expiry.and_then(Value::as_i64), Some(at) if at < now)
}

impl TransientStore for MemoryBackend {
    fn transient_get(&self, key: &str) -> Result<Value, StoreError> {
        let value_name = value_option_name(key);
        let timeout_name = timeout_option_name(key);
        let mut options = self.write()?;

        if is_expired(options.get(&timeout_name), Utc::now().timestamp()) {
            options.remove(&value_name);
            options.remove(&timeout_name);
            debug!("Dropped expired transient {}", key);
            return Ok(NOT_FOUND);
        }

        Ok(options.get(&value_name).cloned().unwrap_or(NOT_FOUND))
    }

    fn transient_set(
        &self,
        key: &str,
        value: &Value,
        ttl_seconds: i64,
    ) -> Result<bool, StoreError> {
        let timeout_name = timeout_option_name(key);
        if timeout_name.len() > OPTION_NAME_MAX_LENGTH {
            return Ok(false);
        }

        let value_name = value_option_name(key);
        let mut options = self.write()?;

        if ttl_seconds != 0 {
            let expiry = Utc::now().timestamp().saturating_add(ttl_seconds);
            options.insert(timeout_name, Value::from(expiry));
        }

        // Unchanged values are not rewritten and not reported as written.
        if options.get(&value_name) == Some(value) {
            return Ok(false);
        }

        options.insert(value_name, value.clone());
        Ok(true)
    }

    fn transient_delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut options = self.write()?;

        if options.remove(&value_option_name(key)).is_none() {
            return Ok(false);
        }
        options.remove(&timeout_option_name(key));

        Ok(true)
    }
}

impl OptionsStore for MemoryBackend {
    fn option_get(&self, name: &str, fallback: &Value) -> Result<Value, StoreError> {
        Ok(self
            .read()?
            .get(name)
            .cloned()
            .unwrap_or_else(|| fallback.clone()))
    }

    fn options_query(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .read()?
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }
}
