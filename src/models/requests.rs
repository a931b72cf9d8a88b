//! Request DTOs for the cache pool API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::Ttl;
use crate::error::Result;

/// Converts an optional raw TTL from a request body.
fn parse_ttl(raw: Option<&Value>) -> Result<Option<Ttl>> {
    raw.map(Ttl::try_from).transpose()
}

/// Request body for storing one item (PUT /pools/:pool/items/:key)
///
/// # Fields
/// - `value`: Any JSON value, `false` included
/// - `ttl`: Seconds or an ISO-8601 duration; the pool default if omitted
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The value to store
    pub value: Value,
    /// Optional TTL, kept raw so a bad one is reported as an invalid TTL
    #[serde(default)]
    pub ttl: Option<Value>,
}

impl SetRequest {
    /// The requested TTL, `None` for the pool default.
    pub fn ttl(&self) -> Result<Option<Ttl>> {
        parse_ttl(self.ttl.as_ref())
    }
}

/// Query string for reading one item (GET /pools/:pool/items/:key)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    /// JSON text returned when the key is missing; `null` if omitted
    #[serde(default)]
    pub default: Option<String>,
}

impl GetQuery {
    /// Parses the default value, falling back to a plain string when it is
    /// not valid JSON.
    pub fn default_value(&self) -> Value {
        match &self.default {
            None => Value::Null,
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone())),
        }
    }
}

/// Request body for reading several items (POST /pools/:pool/batch/get)
#[derive(Debug, Clone, Deserialize)]
pub struct GetManyRequest {
    pub keys: Vec<String>,
    /// Returned for missing keys
    #[serde(default)]
    pub default: Value,
}

/// One key/value pair in a batch write
#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    pub key: String,
    pub value: Value,
}

/// Request body for storing several items (PUT /pools/:pool/batch)
#[derive(Debug, Clone, Deserialize)]
pub struct SetManyRequest {
    pub entries: Vec<ItemEntry>,
    #[serde(default)]
    pub ttl: Option<Value>,
}

impl SetManyRequest {
    /// Converts the entries to the pairs a cache expects.
    pub fn into_pairs(self) -> Result<(Vec<(String, Value)>, Option<Ttl>)> {
        let ttl = parse_ttl(self.ttl.as_ref())?;
        let pairs = self
            .entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect();
        Ok((pairs, ttl))
    }
}

/// Request body for deleting several items (POST /pools/:pool/batch/delete)
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteManyRequest {
    pub keys: Vec<String>,
}
