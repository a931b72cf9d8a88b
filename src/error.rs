//! Error types for cache pools and their backing stores
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failure reported by a transient or options store for reasons other than
/// "not found".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or its state is unusable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation
    #[error("{0}")]
    Rejected(String),
}

// == Cache Error Enum ==
/// Unified error type for cache pool operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key contains a reserved symbol or overflows the name budget
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// TTL cannot be expressed as a whole number of seconds
    #[error("Invalid cache TTL: {0}")]
    InvalidTtl(String),

    /// Pool name collides with internal bookkeeping names
    #[error("Invalid pool name: {0}")]
    InvalidPoolName(String),

    /// Backend failure, with the operation and key it happened on
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    /// Any failure while clearing a pool
    #[error("Failed to clear cache: {0}")]
    Clear(#[source] Box<CacheError>),
}

impl CacheError {
    /// Wraps a store failure with a description of what was being done.
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        CacheError::Store {
            context: context.into(),
            source,
        }
    }

    /// Returns true for errors caused by the caller's arguments.
    ///
    /// These always reach the caller, even through a silent pool.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            CacheError::InvalidKey(_) | CacheError::InvalidTtl(_) | CacheError::InvalidPoolName(_)
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_)
            | CacheError::InvalidTtl(_)
            | CacheError::InvalidPoolName(_) => StatusCode::BAD_REQUEST,
            CacheError::Store { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Clear(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
