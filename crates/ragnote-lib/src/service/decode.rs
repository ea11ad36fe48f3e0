use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RagError, Result};

/// Extract the JSON object embedded in `raw`.
///
/// The candidate document is the span from the first `{` to the last `}`
/// inclusive, which tolerates log lines or other text printed around a
/// single object. Concatenated objects and top-level arrays are not
/// supported.
pub fn decode(raw: &str) -> Result<Value> {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(RagError::malformed("no JSON object in response body"));
    };
    if end < start {
        return Err(RagError::malformed("no JSON object in response body"));
    }

    serde_json::from_str(&raw[start..=end])
        .map_err(|e| RagError::malformed(format!("response body is not valid JSON: {e}")))
}

/// Decode `raw` and deserialize it into a typed response.
pub fn decode_as<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value = decode(raw)?;
    serde_json::from_value(value)
        .map_err(|e| RagError::malformed(format!("unexpected response shape: {e}")))
}
