use crate::file::File;
use crate::placeholder::{self, Token};
use crate::types::Identifier;
use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fetchable, digest-verified file bound to an identifier.
///
/// Commands refer to a distribution with `#{id}` or `#{id:key}`; expansion
/// rewrites those into references to the distribution's [`File`], which the
/// bundler later resolves to a location on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Distribution {
    pub id: Identifier,
    pub file: File,
    pub url: String,
    /// Named subpaths inside the distribution, e.g. `python` → `bin/python3`.
    #[serde(default)]
    pub placeholders: BTreeMap<Identifier, String>,
}

impl Distribution {
    pub fn new(id: Identifier, file: File, url: impl Into<String>) -> Self {
        Self {
            id,
            file,
            url: url.into(),
            placeholders: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, key: Identifier, subpath: impl Into<String>) -> Self {
        self.placeholders.insert(key, subpath.into());
        self
    }

    /// Rewrite the tokens in `value` that reference this distribution.
    ///
    /// `#{id}` becomes the file placeholder (`{file-id}`) and `#{id:key}`
    /// becomes `{file-id}/<subpath>`. Tokens for other ids are left as they
    /// are. A key missing from `placeholders` is an error.
    pub fn expand_placeholders(&self, value: &str) -> Result<String, SchemaError> {
        placeholder::expand_with(value, |token| self.expand_token(token))
    }

    /// Expand a single token, or return `Ok(None)` if it names another id.
    pub fn expand_token(&self, token: Token<'_>) -> Result<Option<String>, SchemaError> {
        if token.id != self.id.as_str() {
            return Ok(None);
        }
        let file_placeholder = self.file.placeholder();
        let Some(key) = token.key else {
            return Ok(Some(file_placeholder));
        };
        let subpath = self
            .placeholders
            .get(key)
            .ok_or_else(|| SchemaError::UnknownPlaceholder {
                distribution: self.id.to_string(),
                key: key.to_owned(),
            })?;
        Ok(Some(format!("{file_placeholder}/{subpath}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpython() -> Distribution {
        Distribution::new(
            Identifier::parse("cpython").unwrap(),
            File::new("cpython-3.12.tar.gz").with_key("cpython"),
            "https://example.com/cpython-3.12.tar.gz",
        )
        .with_placeholder(Identifier::parse("bin").unwrap(), "bin/python3")
    }

    #[test]
    fn expands_plain_and_keyed_tokens() {
        let d = cpython();
        assert_eq!(
            d.expand_placeholders("#{cpython:bin}").unwrap(),
            "{cpython}/bin/python3"
        );
        assert_eq!(d.expand_placeholders("#{cpython}").unwrap(), "{cpython}");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = cpython()
            .expand_placeholders("#{cpython:missing}")
            .unwrap_err();
        match err {
            SchemaError::UnknownPlaceholder { distribution, key } => {
                assert_eq!(distribution, "cpython");
                assert_eq!(key, "missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn strings_without_matching_tokens_are_unchanged() {
        let d = cpython();
        for s in [
            "",
            "plain text",
            "{cpython}",
            "#{cpython3}",
            "#{cpytho}",
            "#{node:bin}",
            "#{cpython:}",
            "#cpython",
        ] {
            assert_eq!(d.expand_placeholders(s).unwrap(), s);
        }
    }

    #[test]
    fn expands_every_occurrence() {
        let d = cpython();
        assert_eq!(
            d.expand_placeholders("#{cpython:bin} -c 'import sys' --home #{cpython}")
                .unwrap(),
            "{cpython}/bin/python3 -c 'import sys' --home {cpython}"
        );
    }

    #[test]
    fn ids_with_regex_metacharacters_match_literally() {
        let d = Distribution::new(
            Identifier::parse("py.3+").unwrap(),
            File::new("py.tar"),
            "https://example.com/py.tar",
        );
        assert_eq!(d.expand_placeholders("#{py.3+}").unwrap(), "{py.tar}");
        assert_eq!(d.expand_placeholders("#{pyx3+}").unwrap(), "#{pyx3+}");
    }

    #[test]
    fn file_name_is_used_when_key_is_absent() {
        let d = Distribution::new(
            Identifier::parse("jdk").unwrap(),
            File::new("jdk-21.zip"),
            "https://example.com/jdk-21.zip",
        )
        .with_placeholder(Identifier::parse("java").unwrap(), "bin/java");
        assert_eq!(d.expand_placeholders("#{jdk:java}").unwrap(), "{jdk-21.zip}/bin/java");
    }

    #[test]
    fn subpath_value_is_joined_verbatim() {
        let d = Distribution::new(
            Identifier::parse("jdk").unwrap(),
            File::new("jdk-21.zip").with_key("jdk"),
            "https://example.com/jdk-21.zip",
        )
        .with_placeholder(Identifier::parse("root").unwrap(), "")
        .with_placeholder(Identifier::parse("java").unwrap(), "/bin/java");
        assert_eq!(d.expand_placeholders("#{jdk:root}").unwrap(), "{jdk}/");
        assert_eq!(d.expand_placeholders("#{jdk:java}").unwrap(), "{jdk}//bin/java");
    }

    #[test]
    fn expansion_is_idempotent_after_first_pass() {
        let d = cpython();
        let once = d.expand_placeholders("#{cpython:bin}").unwrap();
        assert_eq!(d.expand_placeholders(&once).unwrap(), once);
    }
}
