//! Background Tasks Module
//!
//! Contains background tasks that run alongside the HTTP server.
//!
//! # Tasks
//! - Expired transient purge: periodically drops transients past their expiry

pub mod purge;

pub use purge::spawn_purge_task;
