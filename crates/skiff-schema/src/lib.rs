//! Value types for describing a self-contained application bundle.
//!
//! This crate defines the schema layer: content digests (`Digest`), archive
//! kinds (`FileType`), placeholder keys (`Identifier`), bundle files (`File`),
//! layered environment transforms (`Env`), commands (`Command`), target
//! platforms (`Platform`), and fetchable distributions (`Distribution`) along
//! with the `#{id}` / `#{id:key}` placeholder expansion they perform.

pub mod command;
pub mod digest;
pub mod distribution;
pub mod env;
pub mod file;
pub mod placeholder;
pub mod platform;
pub mod types;

pub use command::Command;
pub use digest::Digest;
pub use distribution::Distribution;
pub use env::{Env, EnvBuilder, EnvPattern};
pub use file::{File, FileType, Source};
pub use platform::Platform;
pub use types::{Fingerprint, Identifier};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("an identifier can not contain any of '{{', '}}' or ':', given: '{0}'")]
    InvalidIdentifier(String),
    #[error("no file type matches extension '{0}'")]
    UnknownExtension(String),
    #[error("distribution '{distribution}' has no placeholder named '{key}'")]
    UnknownPlaceholder { distribution: String, key: String },
    #[error("invalid env removal pattern '{pattern}': {source}")]
    InvalidEnvPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown platform: '{0}'")]
    UnknownPlatform(String),
}
