//! Pool Factory Module
//!
//! Creates named pools over shared stores.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::cache::{CachePool, SilentPool, SimpleCache, Ttl};
use crate::error::Result;
use crate::store::{OptionsStore, TransientStore};

// == Factory Trait ==
/// Creates cache pools by name.
pub trait CachePoolFactory: Send + Sync {
    /// Creates the pool for `pool_name`.
    fn create_pool(&self, pool_name: &str) -> Result<Box<dyn SimpleCache>>;
}

// == Transient Pool Factory ==
/// Creates [`CachePool`]s over one pair of stores, each with its own random
/// sentinel.
pub struct TransientPoolFactory<T: ?Sized, O: ?Sized> {
    transients: Arc<T>,
    options: Arc<O>,
    default_ttl: Ttl,
}

impl<T, O> TransientPoolFactory<T, O>
where
    T: TransientStore + ?Sized,
    O: OptionsStore + ?Sized,
{
    pub fn new(transients: Arc<T>, options: Arc<O>, default_ttl: Ttl) -> Self {
        Self {
            transients,
            options,
            default_ttl,
        }
    }
}

impl<B> TransientPoolFactory<B, B>
where
    B: TransientStore + OptionsStore + ?Sized,
{
    /// Uses one backend as both the transient and the options store.
    pub fn with_backend(backend: Arc<B>, default_ttl: Ttl) -> Self {
        Self::new(backend.clone(), backend, default_ttl)
    }
}

/// Random token a cached value is not expected to equal.
fn random_sentinel() -> Value {
    Value::String(format!("default{}", Uuid::new_v4().simple()))
}

impl<T, O> CachePoolFactory for TransientPoolFactory<T, O>
where
    T: TransientStore + ?Sized + 'static,
    O: OptionsStore + ?Sized + 'static,
{
    fn create_pool(&self, pool_name: &str) -> Result<Box<dyn SimpleCache>> {
        let pool = CachePool::new(
            self.transients.clone(),
            self.options.clone(),
            pool_name,
            random_sentinel(),
            self.default_ttl,
        )?;
        Ok(Box::new(pool))
    }
}

// == Silent Pool Factory ==
/// Wraps every pool another factory creates in a [`SilentPool`].
pub struct SilentPoolFactory<F> {
    inner: F,
}

impl<F: CachePoolFactory> SilentPoolFactory<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: CachePoolFactory> CachePoolFactory for SilentPoolFactory<F> {
    fn create_pool(&self, pool_name: &str) -> Result<Box<dyn SimpleCache>> {
        let pool = self.inner.create_pool(pool_name)?;
        Ok(Box::new(SilentPool::new(pool)))
    }
}
