use crate::provider::{file_name_from_url, invalid, parse_config, Provider, ProviderKind};
use crate::ProviderError;
use serde::Deserialize;
use skiff_schema::{Digest, Distribution, File, FileType, Identifier, Platform, Source};
use std::collections::BTreeMap;

/// Provider backed by an explicit per-platform table of distributions.
///
/// ```toml
/// [placeholders]
/// python = "python/bin/python3"
///
/// [distributions.linux-x86_64]
/// url = "https://example.com/cpython-3.12-linux-x86_64.tar.gz"
/// digest = { size = 1024, fingerprint = "ab12..." }
/// ```
///
/// Every distribution is built once at creation time, so lookups hand out
/// clones of the same value.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    identifier: Identifier,
    lazy: bool,
    distributions: BTreeMap<Platform, Distribution>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticConfig {
    #[serde(default)]
    placeholders: BTreeMap<Identifier, String>,
    distributions: BTreeMap<Platform, StaticEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticEntry {
    url: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    file_type: Option<FileType>,
    #[serde(default)]
    digest: Option<Digest>,
    #[serde(default)]
    placeholders: BTreeMap<Identifier, String>,
}

impl StaticProvider {
    pub fn create(
        identifier: Identifier,
        lazy: bool,
        config: toml::Table,
    ) -> Result<Self, ProviderError> {
        let config: StaticConfig = parse_config(&identifier, config)?;

        let mut distributions = BTreeMap::new();
        for (platform, entry) in config.distributions {
            let url = entry.url.trim().to_owned();
            if url.is_empty() {
                return Err(invalid(&identifier, format!("{platform}: url must not be empty")));
            }
            let name = match entry.name {
                Some(name) => name,
                None => file_name_from_url(&url)
                    .ok_or_else(|| {
                        invalid(
                            &identifier,
                            format!("{platform}: cannot derive a file name from '{url}'"),
                        )
                    })?
                    .to_owned(),
            };

            let mut file = File::new(name)
                .with_key(identifier.as_str())
                .with_source(Source::Fetch);
            file.file_type = entry.file_type.or_else(|| FileType::infer(&file.name));
            file.digest = entry.digest;

            let mut placeholders = config.placeholders.clone();
            placeholders.extend(entry.placeholders);

            distributions.insert(
                platform,
                Distribution {
                    id: identifier.clone(),
                    file,
                    url,
                    placeholders,
                },
            );
        }

        Ok(Self {
            identifier,
            lazy,
            distributions,
        })
    }
}

impl Provider for StaticProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Static
    }

    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn lazy(&self) -> bool {
        self.lazy
    }

    fn distribution(&self, platform: Platform) -> Option<Distribution> {
        self.distributions.get(&platform).cloned()
    }

    fn supported_platforms(&self) -> Vec<Platform> {
        self.distributions.keys().copied().collect()
    }
}
