//! Decoding errors shared by the JSON boundary and the enum decoder

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Raw text did not conform to the expected schema.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A non-empty token matched none of the enum's tokens
    #[error("unknown {type_name} token `{token}`")]
    UnknownToken {
        type_name: &'static str,
        token: String,
    },

    /// A required enum field carried an empty token
    #[error("empty {type_name} token")]
    EmptyToken { type_name: &'static str },

    /// The JSON text itself was malformed or did not match the schema
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode JSON text into `T`, surfacing failures as [`DecodeError`].
pub fn decode_json<T: DeserializeOwned>(json: &str) -> Result<T, DecodeError> {
    Ok(serde_json::from_str(json)?)
}

/// Decode every entry of `items`, failing on the first malformed one.
pub fn decode_json_all<T, I>(items: I) -> Result<Vec<T>, DecodeError>
where
    T: DeserializeOwned,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| decode_json(item.as_ref()))
        .collect()
}
