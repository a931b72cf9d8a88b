//! API Module
//!
//! HTTP handlers and routing that expose cache pools over REST.
//!
//! # Endpoints
//! - `/pools/:pool/items/:key` - Single item get, set and delete
//! - `/pools/:pool/items/:key/exists` - Existence check
//! - `/pools/:pool` - Clear a pool
//! - `/pools/:pool/batch...` - Multi-key reads, writes and deletes
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
