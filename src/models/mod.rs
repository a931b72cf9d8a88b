//! Request and Response models for the cache pool API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    DeleteManyRequest, GetManyRequest, GetQuery, ItemEntry, SetManyRequest, SetRequest,
};
pub use responses::{
    BatchResponse, ClearResponse, DeleteResponse, EntryResponse, ErrorResponse, ExistsResponse,
    GetManyResponse, GetResponse, HealthResponse, SetResponse,
};
