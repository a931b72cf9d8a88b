//! Store Module
//!
//! Contracts for the external stores a cache pool sits on, plus an in-memory
//! backend that honours the same naming scheme as the host's options table.
//!
//! A transient named `k` is backed by the option `_transient_k`, and, when it
//! expires, by `_transient_timeout_k` holding its unix expiry timestamp.

mod memory;

#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryBackend;

use serde_json::Value;

use crate::error::StoreError;

// == Public Constants ==
/// Value returned by [`TransientStore::transient_get`] when nothing was found.
///
/// A transient that genuinely holds `false` reads back the same way.
pub const NOT_FOUND: Value = Value::Bool(false);

/// Prefix of the option that holds a transient's value
pub const TRANSIENT_OPTION_PREFIX: &str = "_transient_";

/// Prefix, after [`TRANSIENT_OPTION_PREFIX`], of the option holding a transient's expiry
pub const TIMEOUT_PREFIX: &str = "timeout_";

/// Maximum length of an option name in bytes
pub const OPTION_NAME_MAX_LENGTH: usize = 191;

/// Returns the name of the option that stores the value of transient `key`.
pub fn value_option_name(key: &str) -> String {
    format!("{TRANSIENT_OPTION_PREFIX}{key}")
}

/// Returns the name of the option that stores the expiry of transient `key`.
///
/// This is the longest name any transient occupies.
pub fn timeout_option_name(key: &str) -> String {
    format!("{TRANSIENT_OPTION_PREFIX}{TIMEOUT_PREFIX}{key}")
}

// == Transient Store ==
/// Keyed storage with per-entry expiry.
pub trait TransientStore: Send + Sync {
    /// Returns the stored value, or [`NOT_FOUND`] if absent or expired.
    fn transient_get(&self, key: &str) -> Result<Value, StoreError>;

    /// Stores a value for `ttl_seconds` (0 = no expiry). `Ok(false)` means the
    /// store did not report success.
    fn transient_set(&self, key: &str, value: &Value, ttl_seconds: i64)
        -> Result<bool, StoreError>;

    /// Removes a transient. `Ok(false)` means nothing was removed.
    fn transient_delete(&self, key: &str) -> Result<bool, StoreError>;
}

// == Options Store ==
/// Flat name/value records, listable by name prefix.
pub trait OptionsStore: Send + Sync {
    /// Returns the record's value, or a clone of `fallback` if there is none.
    fn option_get(&self, name: &str, fallback: &Value) -> Result<Value, StoreError>;

    /// Returns the names of all records starting with `prefix`.
    fn options_query(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
