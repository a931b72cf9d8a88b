//! Cache Module
//!
//! Namespaced cache pools over a transient store, with TTL normalization and
//! lookups that tell a stored `false` apart from a missing key.

mod accessor;
mod factory;
mod key;
mod pool;
mod silent;
mod ttl;


use serde_json::Value;

use crate::error::Result;

// Re-export public types
pub use accessor::{get_with_existence, Lookup};
pub use factory::{CachePoolFactory, SilentPoolFactory, TransientPoolFactory};
pub use key::KeyCodec;
pub use pool::CachePool;
pub use silent::SilentPool;
pub use ttl::{normalize, normalize_at, Interval, Ttl};

// == Public Constants ==
/// Characters a raw cache key may not contain
pub const RESERVED_KEY_SYMBOLS: &str = "{}()/\\@:";

/// Separates the pool name from the raw key in a storage key
pub const NAMESPACE_SEPARATOR: char = '/';

// == Simple Cache ==
/// Key/value cache contract shared by pools and their decorators.
///
/// Keys are validated by every operation; invalid keys are always reported
/// as errors, never treated as missing.
pub trait SimpleCache: Send + Sync {
    /// Returns the value stored under `key`, or `default` if there is none.
    fn get(&self, key: &str, default: Value) -> Result<Value>;

    /// Stores `value` under `key`. `None` uses the pool's default TTL.
    fn set(&self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<bool>;

    /// Removes `key`.
    fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every key in the pool.
    fn clear(&self) -> Result<bool>;

    /// Returns true if `key` holds a value.
    fn has(&self, key: &str) -> Result<bool>;

    /// Looks up each key in order. Repeated keys appear once.
    fn get_multiple(&self, keys: &[String], default: Value) -> Result<Vec<(String, Value)>>;

    /// Stores each pair with one TTL. Pairs written before a failure stay written.
    fn set_multiple(&self, values: Vec<(String, Value)>, ttl: Option<Ttl>) -> Result<bool>;

    /// Removes each key. Keys removed before a failure stay removed.
    fn delete_multiple(&self, keys: &[String]) -> Result<bool>;
}

impl<C: SimpleCache + ?Sized> SimpleCache for Box<C> {
    fn get(&self, key: &str, default: Value) -> Result<Value> {
        (**self).get(key, default)
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<bool> {
        (**self).set(key, value, ttl)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }

    fn clear(&self) -> Result<bool> {
        (**self).clear()
    }

    fn has(&self, key: &str) -> Result<bool> {
        (**self).has(key)
    }

    fn get_multiple(&self, keys: &[String], default: Value) -> Result<Vec<(String, Value)>> {
        (**self).get_multiple(keys, default)
    }

    fn set_multiple(&self, values: Vec<(String, Value)>, ttl: Option<Ttl>) -> Result<bool> {
        (**self).set_multiple(values, ttl)
    }

    fn delete_multiple(&self, keys: &[String]) -> Result<bool> {
        (**self).delete_multiple(keys)
    }
}
