//! Cache Pool Module
//!
//! A named cache namespace stored as transients in a shared backend.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::accessor::{get_with_existence, Lookup};
use crate::cache::ttl::{normalize, Ttl};
use crate::cache::{KeyCodec, SimpleCache};
use crate::error::{CacheError, Result, StoreError};
use crate::store::{OptionsStore, TransientStore};

// == Cache Pool ==
/// Cache namespace over a transient store and the options store behind it.
///
/// Holds no entries itself; every call goes to the stores. Several pools,
/// and unrelated consumers, may share the same stores.
pub struct CachePool<T: ?Sized, O: ?Sized> {
    /// Transient storage
    transients: Arc<T>,
    /// Options table backing the transients
    options: Arc<O>,
    /// Namespace mapping for this pool
    codec: KeyCodec,
    /// Sentinel no cached value is expected to equal
    default_value: Value,
    /// TTL for writes that do not give one
    default_ttl: Ttl,
}

impl<T, O> CachePool<T, O>
where
    T: TransientStore + ?Sized,
    O: OptionsStore + ?Sized,
{
    // == Constructor ==
    /// Creates a pool.
    ///
    /// # Arguments
    /// * `pool_name` - Namespace, unique among pools sharing the stores
    /// * `default_value` - Sentinel used to detect missing entries; pick
    ///   something random, a cached value equal to it reads as missing
    /// * `default_ttl` - TTL for writes that do not give one
    pub fn new(
        transients: Arc<T>,
        options: Arc<O>,
        pool_name: &str,
        default_value: Value,
        default_ttl: Ttl,
    ) -> Result<Self> {
        Ok(Self {
            transients,
            options,
            codec: KeyCodec::new(pool_name)?,
            default_value,
            default_ttl,
        })
    }

    /// Name of this pool.
    pub fn name(&self) -> &str {
        self.codec.pool_name()
    }

    fn lookup(&self, storage_key: &str) -> std::result::Result<Lookup, StoreError> {
        get_with_existence(
            &*self.transients,
            &*self.options,
            storage_key,
            &self.default_value,
        )
    }

    /// Writes an already validated key.
    fn write(&self, key: &str, value: Value, ttl_seconds: i64) -> Result<bool> {
        let storage_key = self.codec.encode(key);
        let context = || format!("Could not write value for key \"{key}\" to cache");

        let written = self
            .transients
            .transient_set(&storage_key, &value, ttl_seconds)
            .map_err(|e| CacheError::store(context(), e))?;
        if written {
            return Ok(true);
        }

        // The store also reports failure when the value was already there.
        match self.lookup(&storage_key) {
            Ok(Lookup::Present(current)) if current == value => {
                debug!("Value for key {} unchanged, treating write as success", key);
                Ok(true)
            }
            Err(e) => Err(CacheError::store(context(), e)),
            Ok(_) => {
                warn!("Transient write rejected for key {}", storage_key);
                Err(CacheError::store(
                    context(),
                    StoreError::Rejected(format!(
                        "transient_set() failed with key \"{storage_key}\" with TTL {ttl_seconds}s"
                    )),
                ))
            }
        }
    }

    /// Lists the raw keys of every entry in this pool.
    fn keys(&self) -> Result<Vec<String>> {
        let names = self
            .options
            .options_query(&self.codec.option_prefix())
            .map_err(|e| CacheError::store("Could not list cache keys", e))?;

        names
            .iter()
            .map(|name| self.codec.decode_option_name(name).map(str::to_string))
            .collect()
    }
}

impl<T, O> SimpleCache for CachePool<T, O>
where
    T: TransientStore + ?Sized,
    O: OptionsStore + ?Sized,
{
    fn get(&self, key: &str, default: Value) -> Result<Value> {
        self.codec.validate(key)?;

        let lookup = self.lookup(&self.codec.encode(key)).map_err(|e| {
            CacheError::store(format!("Could not retrieve cache for key \"{key}\""), e)
        })?;

        Ok(lookup.unwrap_or(default))
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<bool> {
        self.codec.validate(key)?;
        let ttl_seconds = normalize(ttl.as_ref().unwrap_or(&self.default_ttl))?;

        self.write(key, value, ttl_seconds)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.codec.validate(key)?;
        let storage_key = self.codec.encode(key);
        let context = || format!("Failed to delete cache for key \"{key}\"");

        let deleted = self
            .transients
            .transient_delete(&storage_key)
            .map_err(|e| CacheError::store(context(), e))?;
        if !deleted {
            return Err(CacheError::store(
                context(),
                StoreError::Rejected(format!(
                    "transient_delete() failed for key \"{storage_key}\""
                )),
            ));
        }

        Ok(true)
    }

    fn clear(&self) -> Result<bool> {
        let keys = self.keys().map_err(|e| CacheError::Clear(Box::new(e)))?;
        debug!("Clearing {} entries from pool {}", keys.len(), self.name());

        self.delete_multiple(&keys)
            .map_err(|e| CacheError::Clear(Box::new(e)))
    }

    fn has(&self, key: &str) -> Result<bool> {
        let value = self.get(key, self.default_value.clone())?;
        Ok(value != self.default_value)
    }

    fn get_multiple(&self, keys: &[String], default: Value) -> Result<Vec<(String, Value)>> {
        let mut entries: Vec<(String, Value)> = Vec::with_capacity(keys.len());
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(keys.len());

        for key in keys {
            let value = self.get(key, default.clone())?;
            match positions.get(key.as_str()) {
                Some(&at) => entries[at].1 = value,
                None => {
                    positions.insert(key.as_str(), entries.len());
                    entries.push((key.clone(), value));
                }
            }
        }

        Ok(entries)
    }

    fn set_multiple(&self, values: Vec<(String, Value)>, ttl: Option<Ttl>) -> Result<bool> {
        let ttl_seconds = normalize(ttl.as_ref().unwrap_or(&self.default_ttl))?;

        for (key, value) in values {
            self.set(&key, value, Some(Ttl::Seconds(ttl_seconds)))?;
        }

        Ok(true)
    }

    fn delete_multiple(&self, keys: &[String]) -> Result<bool> {
        for key in keys {
            self.delete(key)?;
        }

        Ok(true)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Interval;
    use crate::store::testing::{Faults, ScriptedBackend};
    use crate::store::MemoryBackend;
    use serde_json::json;

    const SENTINEL: &str = "default-5f1c9a7e";

    fn pool(backend: &Arc<MemoryBackend>, name: &str) -> CachePool<MemoryBackend, MemoryBackend> {
        CachePool::new(
            backend.clone(),
            backend.clone(),
            name,
            json!(SENTINEL),
            Ttl::Seconds(0),
        )
        .unwrap()
    }

    fn scripted(faults: Faults) -> (Arc<ScriptedBackend>, CachePool<ScriptedBackend, ScriptedBackend>) {
        let backend = Arc::new(ScriptedBackend::new(faults));
        let pool = CachePool::new(
            backend.clone(),
            backend.clone(),
            "p1",
            json!(SENTINEL),
            Ttl::Seconds(0),
        )
        .unwrap();
        (backend, pool)
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_reserved_pool_name_rejected() {
        let backend = Arc::new(MemoryBackend::new());
        let result = CachePool::new(
            backend.clone(),
            backend,
            "timeout_",
            json!(SENTINEL),
            Ttl::default(),
        );
        assert!(matches!(result, Err(CacheError::InvalidPoolName(_))));
    }

    #[test]
    fn test_set_and_get() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        assert!(pool.set("a", json!("value"), None).unwrap());
        assert_eq!(pool.get("a", Value::Null).unwrap(), json!("value"));
        assert_eq!(
            backend.transient_get("p1/a").unwrap(),
            json!("value"),
            "stored under the namespaced key"
        );
    }

    #[test]
    fn test_zero_round_trips() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        pool.set("a", json!(0), Some(Ttl::Seconds(60))).unwrap();
        assert_eq!(pool.get("a", json!("fallback")).unwrap(), json!(0));
        assert!(pool.has("a").unwrap());
    }

    #[test]
    fn test_false_round_trips() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        pool.set("f", json!(false), None).unwrap();
        pool.set("e", json!(""), None).unwrap();

        assert_eq!(pool.get("f", json!("fallback")).unwrap(), json!(false));
        assert_eq!(pool.get("e", json!("fallback")).unwrap(), json!(""));
        assert!(pool.has("f").unwrap());
        assert!(pool.has("e").unwrap());
    }

    #[test]
    fn test_missing_returns_caller_default() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        assert_eq!(pool.get("nope", json!(42)).unwrap(), json!(42));
        assert_eq!(pool.get("nope", Value::Null).unwrap(), Value::Null);
        assert!(!pool.has("nope").unwrap());
    }

    #[test]
    fn test_has_after_set_and_delete() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        pool.set("k", json!({"nested": [1, 2]}), None).unwrap();
        assert!(pool.has("k").unwrap());

        pool.delete("k").unwrap();
        assert!(!pool.has("k").unwrap());
    }

    #[test]
    fn test_reserved_key_rejected_everywhere() {
        let (backend, pool) = scripted(Faults::default());

        assert!(matches!(pool.get("my/key", Value::Null), Err(CacheError::InvalidKey(_))));
        assert!(matches!(pool.set("my/key", json!(1), None), Err(CacheError::InvalidKey(_))));
        assert!(matches!(pool.delete("my/key"), Err(CacheError::InvalidKey(_))));
        assert!(matches!(pool.has("my/key"), Err(CacheError::InvalidKey(_))));
        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn test_overlong_key_rejected_before_store_call() {
        let backend = Arc::new(ScriptedBackend::new(Faults::default()));
        let pool = CachePool::new(
            backend.clone(),
            backend.clone(),
            &"p".repeat(20),
            json!(SENTINEL),
            Ttl::default(),
        )
        .unwrap();

        // "_transient_timeout_" + 20 + "/" + 152 = 192
        let key = "k".repeat(152);
        assert!(matches!(pool.set(&key, json!(1), None), Err(CacheError::InvalidKey(_))));
        assert!(matches!(pool.get(&key, Value::Null), Err(CacheError::InvalidKey(_))));
        assert_eq!(backend.calls(), 0);

        assert!(pool.set(&"k".repeat(151), json!(1), None).unwrap());
    }

    #[test]
    fn test_default_ttl_applies() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = CachePool::new(
            backend.clone(),
            backend.clone(),
            "p1",
            json!(SENTINEL),
            Ttl::Interval(Interval::days(2)),
        )
        .unwrap();

        pool.set("a", json!(1), None).unwrap();
        let expiry = backend
            .option_get("_transient_timeout_p1/a", &Value::Null)
            .unwrap()
            .as_i64()
            .unwrap();
        let remaining = expiry - chrono::Utc::now().timestamp();
        assert!((2 * 86_400 - 5..=2 * 86_400).contains(&remaining));
    }

    #[test]
    fn test_expired_entry_reads_as_missing() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        pool.set("a", json!("v"), Some(Ttl::Seconds(-1))).unwrap();
        assert_eq!(pool.get("a", json!("d")).unwrap(), json!("d"));
        assert!(!pool.has("a").unwrap());
    }

    #[test]
    fn test_writing_same_value_succeeds() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        assert!(pool.set("a", json!("v"), Some(Ttl::Seconds(60))).unwrap());
        assert!(pool.set("a", json!("v"), Some(Ttl::Seconds(60))).unwrap());
    }

    #[test]
    fn test_refused_write_of_new_value_fails() {
        let (_, pool) = scripted(Faults {
            refuse_set: true,
            ..Faults::default()
        });

        let err = pool.set("a", json!("v"), None).unwrap_err();
        assert!(matches!(err, CacheError::Store { source: StoreError::Rejected(_), .. }));
    }

    #[test]
    fn test_refused_write_keeps_reread_failure() {
        let (_, pool) = scripted(Faults {
            refuse_set: true,
            option_get: true,
            ..Faults::default()
        });

        // Re-reading a `false` goes through the options store, which is down.
        let err = pool.set("a", json!(false), None).unwrap_err();
        assert!(matches!(
            err,
            CacheError::Store {
                source: StoreError::Unavailable(_),
                ..
            }
        ));
        assert!(err.to_string().contains("option_get failed"));
    }

    #[test]
    fn test_store_failures_are_wrapped() {
        let (_, pool) = scripted(Faults {
            transient_get: true,
            transient_set: true,
            transient_delete: true,
            ..Faults::default()
        });

        assert!(matches!(pool.get("a", Value::Null), Err(CacheError::Store { .. })));
        assert!(matches!(pool.has("a"), Err(CacheError::Store { .. })));
        assert!(matches!(pool.set("a", json!(1), None), Err(CacheError::Store { .. })));
        assert!(matches!(pool.delete("a"), Err(CacheError::Store { .. })));
    }

    #[test]
    fn test_options_failure_on_falsy_read_is_an_error() {
        let (backend, pool) = scripted(Faults {
            option_get: true,
            ..Faults::default()
        });
        backend.inner.transient_set("p1/a", &json!("v"), 0).unwrap();

        assert_eq!(pool.get("a", Value::Null).unwrap(), json!("v"));
        assert!(matches!(pool.get("missing", Value::Null), Err(CacheError::Store { .. })));
    }

    #[test]
    fn test_delete_missing_is_an_error() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        let err = pool.delete("never-set").unwrap_err();
        assert!(err.to_string().contains("never-set"));
    }

    #[test]
    fn test_clear_empty_pool() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        assert!(pool.clear().unwrap());
    }

    #[test]
    fn test_clear_is_namespaced() {
        let backend = Arc::new(MemoryBackend::new());
        let p1 = pool(&backend, "p1");
        let p11 = pool(&backend, "p11");

        p1.set("a", json!(1), Some(Ttl::Seconds(60))).unwrap();
        p1.set("b", json!(false), None).unwrap();
        p11.set("a", json!(2), None).unwrap();

        assert!(p1.clear().unwrap());

        assert!(!p1.has("a").unwrap());
        assert!(!p1.has("b").unwrap());
        assert!(p11.has("a").unwrap());
        assert_eq!(backend.option_count().unwrap(), 1);
    }

    #[test]
    fn test_clear_wraps_failures() {
        let (_, pool) = scripted(Faults {
            options_query: true,
            ..Faults::default()
        });
        assert!(matches!(pool.clear(), Err(CacheError::Clear(_))));

        let (backend, pool) = scripted(Faults {
            transient_delete: true,
            ..Faults::default()
        });
        backend.inner.transient_set("p1/a", &json!(1), 0).unwrap();
        assert!(matches!(pool.clear(), Err(CacheError::Clear(_))));
    }

    #[test]
    fn test_get_multiple_preserves_order() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");
        pool.set("b", json!("B"), None).unwrap();
        pool.set("a", json!(false), None).unwrap();

        let entries = pool
            .get_multiple(&keys(&["b", "missing", "a", "b"]), json!("d"))
            .unwrap();

        assert_eq!(
            entries,
            vec![
                ("b".to_string(), json!("B")),
                ("missing".to_string(), json!("d")),
                ("a".to_string(), json!(false)),
            ]
        );
    }

    #[test]
    fn test_get_multiple_collapses_many_duplicates() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");
        pool.set("x", json!(1), None).unwrap();

        let mut requested = Vec::new();
        for i in 0..500 {
            requested.push(format!("k{}", i % 50));
            requested.push("x".to_string());
        }

        let entries = pool.get_multiple(&requested, Value::Null).unwrap();
        assert_eq!(entries.len(), 51);
        assert_eq!(entries[0], ("k0".to_string(), Value::Null));
        assert_eq!(entries[1], ("x".to_string(), json!(1)));
        assert_eq!(entries[50].0, "k49");
    }

    #[test]
    fn test_get_multiple_invalid_key_fails_whole_call() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        let result = pool.get_multiple(&keys(&["ok", "bad@key"]), Value::Null);
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_set_multiple_and_delete_multiple() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        let values = vec![("a".to_string(), json!(1)), ("b".to_string(), json!(2))];
        assert!(pool.set_multiple(values, Some(Ttl::Seconds(60))).unwrap());
        assert!(pool.has("a").unwrap());
        assert!(pool.has("b").unwrap());

        assert!(pool.delete_multiple(&keys(&["a", "b"])).unwrap());
        assert!(!pool.has("a").unwrap());
        assert!(!pool.has("b").unwrap());
    }

    #[test]
    fn test_set_multiple_has_no_rollback() {
        let backend = Arc::new(MemoryBackend::new());
        let pool = pool(&backend, "p1");

        let values = vec![
            ("a".to_string(), json!(1)),
            ("b:c".to_string(), json!(2)),
            ("d".to_string(), json!(3)),
        ];
        assert!(matches!(
            pool.set_multiple(values, None),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(pool.has("a").unwrap());
        assert!(!pool.has("d").unwrap());
    }
}
