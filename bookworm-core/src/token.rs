//! Case-insensitive string-to-enum decoding
//!
//! Every decodable enum declares a static token table through
//! [`EnumToken`] (usually generated by `#[derive(EnumToken)]`). Lookups walk
//! that table; no runtime type inspection is involved.
//!
//! # Decoding policy
//!
//! - absent or empty token: `Ok(None)`
//! - token matching an entry, ignoring case: `Ok(Some(member))`
//! - anything else: [`DecodeError::UnknownToken`], never a default member
//!
//! # Serde
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Chapter {
//!     #[serde(rename = "chapterType", default, with = "bookworm::token::optional")]
//!     chapter_type: Option<ChapterType>,
//! }
//! ```

use crate::decode::DecodeError;

/// An enum whose members are named by string tokens.
pub trait EnumToken: Copy + 'static {
    /// Type name used in error messages
    const TYPE_NAME: &'static str;

    /// Lowercase token for each member, in declaration order.
    ///
    /// Tokens must be unique ignoring case; see [`token_conflict`].
    fn tokens() -> &'static [(&'static str, Self)];

    /// The token this member encodes to
    fn token(&self) -> &'static str;

    /// Find the member whose token matches `token` ignoring case.
    ///
    /// The first match in table order wins.
    fn from_token(token: &str) -> Option<Self> {
        Self::tokens()
            .iter()
            .find(|(candidate, _)| same_token(candidate, token))
            .map(|(_, member)| *member)
    }
}

fn same_token(candidate: &str, token: &str) -> bool {
    if token.is_ascii() {
        candidate.eq_ignore_ascii_case(token)
    } else {
        candidate.to_lowercase() == token.to_lowercase()
    }
}

/// Decode an optional raw token into a member of `T`.
pub fn decode_token<T: EnumToken>(token: Option<&str>) -> Result<Option<T>, DecodeError> {
    match token {
        None | Some("") => Ok(None),
        Some(raw) => T::from_token(raw)
            .map(Some)
            .ok_or_else(|| DecodeError::UnknownToken {
                type_name: T::TYPE_NAME,
                token: raw.to_string(),
            }),
    }
}

/// Return the first token of `T` that collides, ignoring case, with an
/// earlier one. `None` means the table is well formed.
pub fn token_conflict<T: EnumToken>() -> Option<&'static str> {
    let tokens = T::tokens();
    tokens.iter().enumerate().find_map(|(i, (name, _))| {
        tokens[..i]
            .iter()
            .any(|(earlier, _)| same_token(earlier, name))
            .then_some(*name)
    })
}

/// Serde adapter for `Option<T>` fields. Pair with `#[serde(default)]` so
/// that a missing field decodes to `None`.
pub mod optional {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode_token, EnumToken};

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: EnumToken,
        S: Serializer,
    {
        match value {
            Some(member) => serializer.serialize_some(member.token()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: EnumToken,
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        decode_token(raw.as_deref()).map_err(D::Error::custom)
    }
}

/// Serde adapter for fields that must carry a member.
pub mod required {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode_token, EnumToken};
    use crate::decode::DecodeError;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: EnumToken,
        S: Serializer,
    {
        serializer.serialize_str(value.token())
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: EnumToken,
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        decode_token(Some(&raw))
            .map_err(D::Error::custom)?
            .ok_or_else(|| {
                D::Error::custom(DecodeError::EmptyToken {
                    type_name: T::TYPE_NAME,
                })
            })
    }
}
