//! Lenient decoders for backend flag columns
//!
//! The backend stores booleans as `uint8` and ids as `0` when unset, so the
//! same field can arrive as `true`, `1` or `"1"` depending on the handler.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Decode `bool | 0/1 | "0"/"1"/"true"/"false"` into a bool
pub(crate) fn bool_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawFlag>::deserialize(deserializer)? {
        None => false,
        Some(RawFlag::Bool(b)) => b,
        Some(RawFlag::Int(i)) => i != 0,
        Some(RawFlag::Text(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
    })
}

/// Decode an id where `0` or `null` means "not set"
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.filter(|id| *id != 0))
}
