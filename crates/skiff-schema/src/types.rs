//! Newtype wrappers for string values, providing compile-time type safety.
//!
//! All newtypes serialize/deserialize as plain strings. [`Identifier`] is
//! validated on every construction path, including deserialization.

use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

macro_rules! string_impls {
    ($name:ident) => {
        impl $name {
            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Hex-encoded content hash of a file, as recorded in a [`Digest`](crate::Digest).
///
/// The hash algorithm is chosen by whoever verifies it; this type only
/// carries the string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

string_impls!(Fingerprint);

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Characters that delimit placeholder tokens and so can never appear in an id.
pub const RESERVED_CHARS: [char; 3] = ['{', '}', ':'];

/// A short name usable as the key of a `#{id}` placeholder token.
///
/// The raw string is kept verbatim: no case folding or trimming happens, so
/// two identifiers are equal only if their bytes are.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(value: impl Into<String>) -> Result<Self, SchemaError> {
        let value = value.into();
        if value.contains(RESERVED_CHARS) {
            return Err(SchemaError::InvalidIdentifier(value));
        }
        Ok(Self(value))
    }
}

string_impls!(Identifier);

impl FromStr for Identifier {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = SchemaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl std::borrow::Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rejects_reserved_characters() {
        for bad in ["a:b", "a{b", "a}b", "{", "}", ":", "#{x}"] {
            let err = Identifier::parse(bad).unwrap_err();
            assert!(
                matches!(err, SchemaError::InvalidIdentifier(ref v) if v == bad),
                "expected rejection of {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn identifier_roundtrips_verbatim() {
        let id = Identifier::parse("valid-name").unwrap();
        assert_eq!(id.as_str(), "valid-name");
        assert_eq!(id.to_string(), "valid-name");

        let padded = Identifier::parse(" Mixed Case ").unwrap();
        assert_eq!(padded.as_str(), " Mixed Case ");
    }

    #[test]
    fn identifier_from_str_and_try_from_agree() {
        let a: Identifier = "cpython".parse().unwrap();
        let b = Identifier::try_from("cpython").unwrap();
        assert_eq!(a, b);
        assert!(Identifier::try_from(String::from("py:3")).is_err());
    }

    #[test]
    fn identifier_serde_validates() {
        let id = Identifier::parse("node").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"node\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let bad: Result<Identifier, _> = serde_json::from_str("\"no:de\"");
        assert!(bad.is_err());
    }

    #[test]
    fn fingerprint_display_and_as_ref() {
        let fp = Fingerprint::new("abc123");
        assert_eq!(fp.to_string(), "abc123");
        assert_eq!(AsRef::<str>::as_ref(&fp), "abc123");
        assert_eq!(fp, "abc123");
        assert_eq!(fp.into_inner(), "abc123");
    }
}
