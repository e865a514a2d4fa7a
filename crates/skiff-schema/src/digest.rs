use crate::types::Fingerprint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected size and content hash of a file, checked by whoever fetches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Digest {
    pub size: u64,
    pub fingerprint: Fingerprint,
}

impl Digest {
    pub fn new(size: u64, fingerprint: impl Into<Fingerprint>) -> Self {
        Self {
            size,
            fingerprint: fingerprint.into(),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.fingerprint, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        let a = Digest::new(42, "deadbeef");
        let b = Digest::new(42, "deadbeef");
        assert_eq!(a, b);
        assert_ne!(a, Digest::new(43, "deadbeef"));
        assert_ne!(a, Digest::new(42, "cafebabe"));
    }

    #[test]
    fn display_includes_fingerprint_and_size() {
        assert_eq!(Digest::new(7, "abc").to_string(), "abc:7");
    }

    #[test]
    fn deserializes_from_table_shape() {
        let digest: Digest =
            serde_json::from_str(r#"{"size": 1024, "fingerprint": "ff00"}"#).unwrap();
        assert_eq!(digest, Digest::new(1024, "ff00"));

        let extra: Result<Digest, _> =
            serde_json::from_str(r#"{"size": 1, "fingerprint": "a", "algo": "sha256"}"#);
        assert!(extra.is_err());
    }
}
