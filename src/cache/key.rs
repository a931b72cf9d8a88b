//! Key Codec Module
//!
//! Validates user keys and maps them in and out of a pool's namespace.

use crate::cache::{NAMESPACE_SEPARATOR, RESERVED_KEY_SYMBOLS};
use crate::error::{CacheError, Result};
use crate::store::{
    timeout_option_name, OPTION_NAME_MAX_LENGTH, TIMEOUT_PREFIX, TRANSIENT_OPTION_PREFIX,
};

// == Key Codec ==
/// Maps raw cache keys to storage keys of the form `<pool>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    /// `<pool>/`
    namespace: String,
}

impl KeyCodec {
    // == Constructor ==
    /// Creates a codec for the named pool.
    ///
    /// Fails if the name starts with the timeout bookkeeping prefix or
    /// contains the namespace separator; either would let this pool's key
    /// listing pick up records that belong to another pool.
    pub fn new(pool_name: &str) -> Result<Self> {
        if pool_name.starts_with(TIMEOUT_PREFIX) {
            return Err(CacheError::InvalidPoolName(format!(
                "Pool name cannot start with \"{TIMEOUT_PREFIX}\""
            )));
        }
        if pool_name.contains(NAMESPACE_SEPARATOR) {
            return Err(CacheError::InvalidPoolName(format!(
                "Pool name \"{pool_name}\" cannot contain \"{NAMESPACE_SEPARATOR}\""
            )));
        }

        Ok(Self {
            namespace: format!("{pool_name}{NAMESPACE_SEPARATOR}"),
        })
    }

    /// Name of the pool this codec serves.
    pub fn pool_name(&self) -> &str {
        &self.namespace[..self.namespace.len() - NAMESPACE_SEPARATOR.len_utf8()]
    }

    // == Validate ==
    /// Checks a raw key for reserved symbols and against the name budget.
    ///
    /// The budget is measured with the timeout record's name, the longest
    /// name the key will ever be stored under.
    pub fn validate(&self, raw_key: &str) -> Result<()> {
        let longest = timeout_option_name(&self.encode(raw_key));
        if longest.len() > OPTION_NAME_MAX_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Given the {} char length of this cache pool's name, the key length must not exceed {} chars",
                self.pool_name().len(),
                self.max_key_length()
            )));
        }

        if raw_key.contains(|c: char| RESERVED_KEY_SYMBOLS.contains(c)) {
            return Err(CacheError::InvalidKey(format!(
                "Cache key \"{raw_key}\" is invalid"
            )));
        }

        Ok(())
    }

    /// Longest raw key this pool accepts, in bytes.
    pub fn max_key_length(&self) -> usize {
        OPTION_NAME_MAX_LENGTH.saturating_sub(timeout_option_name(&self.namespace).len())
    }

    // == Encode ==
    /// Prefixes a raw key with the pool namespace.
    pub fn encode(&self, raw_key: &str) -> String {
        format!("{}{raw_key}", self.namespace)
    }

    // == Decode ==
    /// Strips the pool namespace from a storage key.
    pub fn decode<'a>(&self, storage_key: &'a str) -> Result<&'a str> {
        storage_key.strip_prefix(&self.namespace).ok_or_else(|| {
            CacheError::InvalidKey(format!(
                "Storage key \"{storage_key}\" is not in namespace \"{}\"",
                self.pool_name()
            ))
        })
    }

    /// Recovers the raw key from the name of a transient's value option.
    pub fn decode_option_name<'a>(&self, option_name: &'a str) -> Result<&'a str> {
        let storage_key = option_name
            .strip_prefix(TRANSIENT_OPTION_PREFIX)
            .ok_or_else(|| {
                CacheError::InvalidKey(format!(
                    "Option name \"{option_name}\" is not formed according to this cache pool"
                ))
            })?;
        self.decode(storage_key)
    }

    /// Prefix shared by the value options of every key in this pool.
    pub fn option_prefix(&self) -> String {
        format!("{TRANSIENT_OPTION_PREFIX}{}", self.namespace)
    }
}
