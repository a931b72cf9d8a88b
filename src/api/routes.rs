//! API Routes
//!
//! Configures the Axum router with all cache pool endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, delete_many_handler, exists_handler, get_handler,
    get_many_handler, health_handler, set_handler, set_many_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /pools/:pool/items/:key` - Store a value
/// - `GET /pools/:pool/items/:key` - Read a value (`?default=<json>`)
/// - `DELETE /pools/:pool/items/:key` - Delete a value
/// - `GET /pools/:pool/items/:key/exists` - Check whether a key holds a value
/// - `DELETE /pools/:pool` - Clear a pool
/// - `POST /pools/:pool/batch/get` - Read several values
/// - `PUT /pools/:pool/batch` - Store several values
/// - `POST /pools/:pool/batch/delete` - Delete several values
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/pools/:pool/items/:key",
            put(set_handler).get(get_handler).delete(delete_handler),
        )
        .route("/pools/:pool/items/:key/exists", get(exists_handler))
        .route("/pools/:pool", delete(clear_handler))
        .route("/pools/:pool/batch/get", post(get_many_handler))
        .route("/pools/:pool/batch", put(set_many_handler))
        .route("/pools/:pool/batch/delete", post(delete_many_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
