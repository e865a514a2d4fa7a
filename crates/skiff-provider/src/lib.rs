//! Distribution providers for skiff interpreters.
//!
//! This crate implements the resolution layer: the `Provider` trait that maps
//! a target `Platform` to an optional `Distribution`, the closed set of
//! provider kinds selectable by name from a manifest (`ProviderKind`), and
//! two generic kinds: `static` (an explicit per-platform table) and
//! `templated` (URLs rendered from a `{platform}`/`{version}` template).

pub mod provider;
pub mod static_table;
pub mod templated;

pub use provider::{create_provider, Provider, ProviderKind};
pub use static_table::StaticProvider;
pub use templated::TemplatedProvider;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider kind '{0}', expected one of: static, templated")]
    UnknownKind(String),
    #[error("invalid configuration for provider '{provider}': {source}")]
    Config {
        provider: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration for provider '{provider}': {reason}")]
    InvalidConfig { provider: String, reason: String },
    #[error("schema error: {0}")]
    Schema(#[from] skiff_schema::SchemaError),
}
