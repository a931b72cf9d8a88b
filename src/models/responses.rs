//! Response DTOs for the cache pool API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

/// Response body for reading one item (GET /pools/:pool/items/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub pool: String,
    pub key: String,
    /// The stored value, or the requested default
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(pool: impl Into<String>, key: impl Into<String>, value: Value) -> Self {
        Self {
            pool: pool.into(),
            key: key.into(),
            value,
        }
    }
}

/// Response body for an existence check (GET /pools/:pool/items/:key/exists)
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub pool: String,
    pub key: String,
    pub exists: bool,
}

impl ExistsResponse {
    pub fn new(pool: impl Into<String>, key: impl Into<String>, exists: bool) -> Self {
        Self {
            pool: pool.into(),
            key: key.into(),
            exists,
        }
    }
}

/// Response body for storing one item (PUT /pools/:pool/items/:key)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Human readable outcome
    pub message: String,
    pub key: String,
    /// False only when a silent pool suppressed a failure
    pub stored: bool,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        let key = key.into();
        let message = if stored {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' was not stored", key)
        };
        Self {
            message,
            key,
            stored,
        }
    }
}

/// Response body for deleting one item (DELETE /pools/:pool/items/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
    pub deleted: bool,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        let key = key.into();
        let message = if deleted {
            format!("Key '{}' deleted successfully", key)
        } else {
            format!("Key '{}' was not deleted", key)
        };
        Self {
            message,
            key,
            deleted,
        }
    }
}

/// Response body for clearing a pool (DELETE /pools/:pool)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub pool: String,
    pub cleared: bool,
}

impl ClearResponse {
    pub fn new(pool: impl Into<String>, cleared: bool) -> Self {
        Self {
            pool: pool.into(),
            cleared,
        }
    }
}

/// One key and its value in a batch read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: Value,
}

/// Response body for a batch read (POST /pools/:pool/batch/get)
#[derive(Debug, Clone, Serialize)]
pub struct GetManyResponse {
    pub pool: String,
    /// Entries in request order
    pub entries: Vec<EntryResponse>,
}

impl GetManyResponse {
    pub fn new(pool: impl Into<String>, entries: Vec<(String, Value)>) -> Self {
        Self {
            pool: pool.into(),
            entries: entries
                .into_iter()
                .map(|(key, value)| EntryResponse { key, value })
                .collect(),
        }
    }
}

/// Response body for batch writes and deletes
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub pool: String,
    /// Number of keys in the request
    pub count: usize,
    pub ok: bool,
}

impl BatchResponse {
    pub fn new(pool: impl Into<String>, count: usize, ok: bool) -> Self {
        Self {
            pool: pool.into(),
            count,
            ok,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_keeps_false_value() {
        let resp = GetResponse::new("p1", "a", json!(false));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, json!({"pool": "p1", "key": "a", "value": false}));
    }

    #[test]
    fn test_set_response_messages() {
        assert!(SetResponse::new("my_key", true).message.contains("successfully"));
        assert!(SetResponse::new("my_key", false).message.contains("not stored"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("deleted_key", true);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("deleted_key"));
        assert!(json.contains("\"deleted\":true"));
    }

    #[test]
    fn test_get_many_response_order() {
        let resp = GetManyResponse::new(
            "p1",
            vec![("b".to_string(), json!(1)), ("a".to_string(), json!(2))],
        );
        let keys: Vec<&str> = resp.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
