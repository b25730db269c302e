//! [`Value`] → JSON text.
//!
//! Both encoders go through the `Serialize` impl for [`Value`], so maps are
//! written in stored order with duplicate keys kept. Output re-parses to an
//! equal value: whole floats keep their `.0` and strings are escaped.
//! Non-finite floats have no JSON spelling and are written as `null`.

use crate::error::Result;
use crate::value::Value;

/// Encode a value as compact JSON.
///
/// ```
/// use dynjson_core::{encode, parse};
/// let value = parse(r#"{"a": [1, 2.5, true]}"#).unwrap();
/// assert_eq!(encode(&value).unwrap(), r#"{"a":[1,2.5,true]}"#);
/// ```
pub fn encode(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Encode a value as JSON indented by two spaces per level.
pub fn encode_pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
