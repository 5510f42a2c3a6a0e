//! JSON text for arbitrarily deep trees
//!
//! serde_json serializes and parses nested values recursively, one set of
//! stack frames per level, and stops parsing at 128 levels by default. These
//! helpers lift the limit and run serde through `serde_stacker`, which moves
//! the work onto a fresh heap-allocated stack segment whenever the current one
//! runs low.

use serde::{Serialize, de::DeserializeOwned, ser::Error as _};

/// Compact JSON text
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    value.serialize(serde_stacker::Serializer::new(&mut serde_json::Serializer::new(&mut buf)))?;
    into_string(buf)
}

/// Indented JSON text
pub fn to_string_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    value.serialize(serde_stacker::Serializer::new(&mut serde_json::Serializer::pretty(&mut buf)))?;
    into_string(buf)
}

/// Parse JSON text without a nesting limit
pub fn from_str<T: DeserializeOwned>(json: &str) -> serde_json::Result<T> {
    from_slice(json.as_bytes())
}

/// Parse JSON bytes without a nesting limit
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn into_string(buf: Vec<u8>) -> serde_json::Result<String> {
    String::from_utf8(buf).map_err(serde_json::Error::custom)
}
