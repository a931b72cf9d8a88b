//! API Handlers
//!
//! HTTP request handlers for each cache pool endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use crate::cache::{CachePoolFactory, SilentPoolFactory, SimpleCache, TransientPoolFactory};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    BatchResponse, ClearResponse, DeleteManyRequest, DeleteResponse, ExistsResponse,
    GetManyRequest, GetManyResponse, GetQuery, GetResponse, HealthResponse, SetManyRequest,
    SetRequest, SetResponse,
};
use crate::store::MemoryBackend;

/// Application state shared across all handlers.
///
/// Pools hold no state of their own, so each request builds the pool it
/// names from the shared factory.
#[derive(Clone)]
pub struct AppState {
    /// Creates the pool named in the request path
    pub pools: Arc<dyn CachePoolFactory>,
}

impl AppState {
    /// Creates a new AppState around the given factory.
    pub fn new(pools: Arc<dyn CachePoolFactory>) -> Self {
        Self { pools }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Pools are served from `backend`, wrapped in silent pools when the
    /// configuration asks for it.
    pub fn from_config(config: &Config, backend: Arc<MemoryBackend>) -> Self {
        let factory = TransientPoolFactory::with_backend(backend, config.default_ttl);
        if config.silent_pools {
            Self::new(Arc::new(SilentPoolFactory::new(factory)))
        } else {
            Self::new(Arc::new(factory))
        }
    }

    fn pool(&self, name: &str) -> Result<Box<dyn SimpleCache>> {
        self.pools.create_pool(name)
    }
}

/// Handler for PUT /pools/:pool/items/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path((pool, key)): Path<(String, String)>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let ttl = req.ttl()?;
    let stored = state.pool(&pool)?.set(&key, req.value, ttl)?;
    debug!("PUT {}/{} stored={}", pool, key, stored);

    Ok(Json(SetResponse::new(key, stored)))
}

/// Handler for GET /pools/:pool/items/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path((pool, key)): Path<(String, String)>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>> {
    let value = state.pool(&pool)?.get(&key, query.default_value())?;

    Ok(Json(GetResponse::new(pool, key, value)))
}

/// Handler for GET /pools/:pool/items/:key/exists
pub async fn exists_handler(
    State(state): State<AppState>,
    Path((pool, key)): Path<(String, String)>,
) -> Result<Json<ExistsResponse>> {
    let exists = state.pool(&pool)?.has(&key)?;

    Ok(Json(ExistsResponse::new(pool, key, exists)))
}

/// Handler for DELETE /pools/:pool/items/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((pool, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.pool(&pool)?.delete(&key)?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for DELETE /pools/:pool
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(pool): Path<String>,
) -> Result<Json<ClearResponse>> {
    let cleared = state.pool(&pool)?.clear()?;
    debug!("Cleared pool {}: {}", pool, cleared);

    Ok(Json(ClearResponse::new(pool, cleared)))
}

/// Handler for POST /pools/:pool/batch/get
pub async fn get_many_handler(
    State(state): State<AppState>,
    Path(pool): Path<String>,
    Json(req): Json<GetManyRequest>,
) -> Result<Json<GetManyResponse>> {
    let entries = state.pool(&pool)?.get_multiple(&req.keys, req.default)?;

    Ok(Json(GetManyResponse::new(pool, entries)))
}

/// Handler for PUT /pools/:pool/batch
pub async fn set_many_handler(
    State(state): State<AppState>,
    Path(pool): Path<String>,
    Json(req): Json<SetManyRequest>,
) -> Result<Json<BatchResponse>> {
    let (pairs, ttl) = req.into_pairs()?;
    let count = pairs.len();
    let ok = state.pool(&pool)?.set_multiple(pairs, ttl)?;

    Ok(Json(BatchResponse::new(pool, count, ok)))
}

/// Handler for POST /pools/:pool/batch/delete
pub async fn delete_many_handler(
    State(state): State<AppState>,
    Path(pool): Path<String>,
    Json(req): Json<DeleteManyRequest>,
) -> Result<Json<BatchResponse>> {
    let ok = state.pool(&pool)?.delete_multiple(&req.keys)?;

    Ok(Json(BatchResponse::new(pool, req.keys.len(), ok)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
