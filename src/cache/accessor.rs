//! Existence-Safe Accessor
//!
//! The transient store answers "not found" with the same value it returns
//! for a transient that holds `false`. When that value comes back, the
//! option record backing the transient tells the two apart.
//!
//! The two reads are not isolated from each other: a concurrent writer can
//! create or drop the record in between, so the answer may be stale. The
//! stores are shared with other consumers and offer no cross-record
//! transactions, so this is left as is.

use serde_json::Value;

use crate::error::StoreError;
use crate::store::{value_option_name, OptionsStore, TransientStore, NOT_FOUND};

// == Lookup ==
/// Outcome of an existence-checked read.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// The key holds this value
    Present(Value),
    /// The key was never set or has expired
    Absent,
}

impl Lookup {
    /// Returns the value, or `default` if absent.
    pub fn unwrap_or(self, default: Value) -> Value {
        match self {
            Lookup::Present(value) => value,
            Lookup::Absent => default,
        }
    }
}

// == Get With Existence ==
/// Reads `storage_key`, telling a stored `false` apart from a missing key.
///
/// `probe` is returned by the options store when the record is missing, so
/// it must be a value no record will ever hold.
pub fn get_with_existence<T, O>(
    transients: &T,
    options: &O,
    storage_key: &str,
    probe: &Value,
) -> Result<Lookup, StoreError>
where
    T: TransientStore + ?Sized,
    O: OptionsStore + ?Sized,
{
    let value = transients.transient_get(storage_key)?;
    if value != NOT_FOUND {
        return Ok(Lookup::Present(value));
    }

    let record = options
        .option_get(&value_option_name(storage_key), probe)
        .map_err(|e| match e {
            StoreError::Unavailable(reason) => StoreError::Unavailable(format!(
                "Could not verify existence of transient \"{storage_key}\": {reason}"
            )),
            StoreError::Rejected(reason) => StoreError::Rejected(format!(
                "Could not verify existence of transient \"{storage_key}\": {reason}"
            )),
        })?;

    if record == *probe {
        Ok(Lookup::Absent)
    } else {
        Ok(Lookup::Present(value))
    }
}
