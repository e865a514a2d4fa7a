use crate::provider::{file_name_from_url, invalid, parse_config, Provider, ProviderKind};
use crate::ProviderError;
use serde::Deserialize;
use skiff_schema::{Digest, Distribution, File, FileType, Identifier, Platform, Source};
use std::collections::BTreeMap;

const PLATFORM_FIELD: &str = "{platform}";
const VERSION_FIELD: &str = "{version}";

/// Provider that renders one URL template per supported platform.
///
/// ```toml
/// url = "https://example.com/node/v{version}/node-v{version}-{platform}.tar.gz"
/// version = "20.11.0"
/// placeholders = { node = "bin/node" }
///
/// [platforms.linux-x86_64]
/// name = "linux-x64"
/// digest = { size = 4096, fingerprint = "cd34..." }
///
/// [platforms.macos-aarch64]
/// name = "darwin-arm64"
/// ```
///
/// `name` is the vendor's spelling of the platform substituted for
/// `{platform}`; it defaults to the platform's own name. Platforms missing
/// from the `platforms` table resolve to `None`.
#[derive(Debug, Clone)]
pub struct TemplatedProvider {
    identifier: Identifier,
    lazy: bool,
    url: String,
    version: Option<String>,
    file_name: Option<String>,
    file_type: Option<FileType>,
    placeholders: BTreeMap<Identifier, String>,
    platforms: BTreeMap<Platform, TemplatedTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplatedConfig {
    url: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default, rename = "type")]
    file_type: Option<FileType>,
    #[serde(default)]
    placeholders: BTreeMap<Identifier, String>,
    platforms: BTreeMap<Platform, TemplatedTarget>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplatedTarget {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    digest: Option<Digest>,
}

impl TemplatedProvider {
    pub fn create(
        identifier: Identifier,
        lazy: bool,
        config: toml::Table,
    ) -> Result<Self, ProviderError> {
        let config: TemplatedConfig = parse_config(&identifier, config)?;

        let url = config.url.trim().to_owned();
        if url.is_empty() {
            return Err(invalid(&identifier, "url must not be empty"));
        }
        if config.platforms.len() > 1 && !url.contains(PLATFORM_FIELD) {
            return Err(invalid(
                &identifier,
                format!(
                    "url '{url}' has no {PLATFORM_FIELD} field but {} platforms are configured",
                    config.platforms.len()
                ),
            ));
        }
        let uses_version = url.contains(VERSION_FIELD)
            || config
                .file_name
                .as_deref()
                .is_some_and(|n| n.contains(VERSION_FIELD));
        if uses_version && config.version.is_none() {
            return Err(invalid(
                &identifier,
                format!("template uses {VERSION_FIELD} but no version is configured"),
            ));
        }

        let provider = Self {
            identifier,
            lazy,
            url,
            version: config.version,
            file_name: config.file_name,
            file_type: config.file_type,
            placeholders: config.placeholders,
            platforms: config.platforms,
        };

        // Render every target once so a bad template fails here, not on first use.
        for platform in provider.platforms.keys() {
            provider.render(*platform)?;
        }
        Ok(provider)
    }

    fn substitute(&self, template: &str, platform_name: &str) -> String {
        let rendered = template.replace(PLATFORM_FIELD, platform_name);
        match &self.version {
            Some(version) => rendered.replace(VERSION_FIELD, version),
            None => rendered,
        }
    }

    fn render(&self, platform: Platform) -> Result<Option<Distribution>, ProviderError> {
        let Some(target) = self.platforms.get(&platform) else {
            return Ok(None);
        };
        let platform_name = target.name.as_deref().unwrap_or(platform.as_str());
        let url = self.substitute(&self.url, platform_name);

        let name = match &self.file_name {
            Some(template) => self.substitute(template, platform_name),
            None => file_name_from_url(&url)
                .ok_or_else(|| {
                    invalid(
                        &self.identifier,
                        format!("{platform}: cannot derive a file name from '{url}'"),
                    )
                })?
                .to_owned(),
        };

        let mut file = File::new(name)
            .with_key(self.identifier.as_str())
            .with_source(Source::Fetch);
        file.file_type = self.file_type.or_else(|| FileType::infer(&file.name));
        file.digest = target.digest.clone();

        Ok(Some(Distribution {
            id: self.identifier.clone(),
            file,
            url,
            placeholders: self.placeholders.clone(),
        }))
    }
}

impl Provider for TemplatedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Templated
    }

    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn lazy(&self) -> bool {
        self.lazy
    }

    fn distribution(&self, platform: Platform) -> Option<Distribution> {
        // Every configured target rendered successfully in `create`.
        self.render(platform).ok().flatten()
    }

    fn supported_platforms(&self) -> Vec<Platform> {
        self.platforms.keys().copied().collect()
    }
}
