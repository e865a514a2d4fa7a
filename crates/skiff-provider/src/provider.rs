use crate::static_table::StaticProvider;
use crate::templated::TemplatedProvider;
use crate::ProviderError;
use serde::de::DeserializeOwned;
use skiff_schema::{Distribution, Identifier, Platform};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Maps a target platform to the distribution an interpreter should use there.
///
/// Implementations must be pure in `platform`: for a fixed configuration,
/// repeated calls with the same platform return equal distributions (same
/// URL, digest and placeholders). A platform the provider has nothing for
/// yields `None`; that is an expected outcome, not an error.
pub trait Provider: Send + Sync + fmt::Debug {
    fn kind(&self) -> ProviderKind;

    /// The identifier every distribution from this provider carries.
    fn identifier(&self) -> &Identifier;

    /// Whether fetching should be deferred until the distribution is first used.
    fn lazy(&self) -> bool;

    fn distribution(&self, platform: Platform) -> Option<Distribution>;

    /// Platforms for which [`Provider::distribution`] returns `Some`, in
    /// [`Platform`] order.
    fn supported_platforms(&self) -> Vec<Platform>;
}

/// The provider implementations a manifest can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Static,
    Templated,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [Self::Static, Self::Templated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Templated => "templated",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "templated" => Ok(Self::Templated),
            other => Err(ProviderError::UnknownKind(other.to_owned())),
        }
    }
}

/// Build a provider of the given kind from its keyword configuration.
///
/// The accepted keys depend on `kind`; unknown or ill-typed keys are
/// rejected here rather than at resolution time.
pub fn create_provider(
    kind: ProviderKind,
    identifier: Identifier,
    lazy: bool,
    config: toml::Table,
) -> Result<Arc<dyn Provider>, ProviderError> {
    debug!("creating {kind} provider for '{identifier}' (lazy={lazy})");
    match kind {
        ProviderKind::Static => Ok(Arc::new(StaticProvider::create(identifier, lazy, config)?)),
        ProviderKind::Templated => {
            Ok(Arc::new(TemplatedProvider::create(identifier, lazy, config)?))
        }
    }
}

pub(crate) fn parse_config<T: DeserializeOwned>(
    identifier: &Identifier,
    config: toml::Table,
) -> Result<T, ProviderError> {
    T::deserialize(toml::Value::Table(config)).map_err(|source| ProviderError::Config {
        provider: identifier.to_string(),
        source,
    })
}

pub(crate) fn invalid(identifier: &Identifier, reason: impl Into<String>) -> ProviderError {
    ProviderError::InvalidConfig {
        provider: identifier.to_string(),
        reason: reason.into(),
    }
}

/// Last path segment of a URL, without query string or fragment.
pub(crate) fn file_name_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_roundtrip() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_fails() {
        let err = "pbs".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, ProviderError::UnknownKind(ref k) if k == "pbs"));
    }

    #[test]
    fn file_name_strips_query_and_fragment() {
        assert_eq!(
            file_name_from_url("https://example.com/a/node.tar.gz?sig=1#x"),
            Some("node.tar.gz")
        );
        assert_eq!(file_name_from_url("https://example.com/dir/"), None);
    }

    #[test]
    fn config_errors_name_the_provider() {
        let id = Identifier::parse("cpython").unwrap();
        let table: toml::Table = toml::from_str("bogus = 1").unwrap();
        let err = create_provider(ProviderKind::Static, id, false, table).unwrap_err();
        assert!(err.to_string().contains("cpython"), "{err}");
    }

    #[test]
    fn supported_platforms_agree_with_distribution() {
        let static_config: toml::Table = toml::from_str(
            r#"
[distributions.linux-x86_64]
url = "https://example.com/jdk-linux.tar.gz"
[distributions.windows-x86_64]
url = "https://example.com/jdk-windows.zip"
"#,
        )
        .unwrap();
        let templated_config: toml::Table = toml::from_str(
            r#"
url = "https://example.com/node-{platform}.tar.xz"
[platforms.linux-aarch64]
[platforms.macos-x86_64]
"#,
        )
        .unwrap();

        let id = Identifier::parse("rt").unwrap();
        for (kind, config) in [
            (ProviderKind::Static, static_config),
            (ProviderKind::Templated, templated_config),
        ] {
            let provider = create_provider(kind, id.clone(), false, config).unwrap();
            let expected: Vec<Platform> = Platform::ALL
                .into_iter()
                .filter(|p| provider.distribution(*p).is_some())
                .collect();
            assert_eq!(provider.supported_platforms(), expected, "{kind}");
            assert_eq!(expected.len(), 2, "{kind}");
        }
    }
}
