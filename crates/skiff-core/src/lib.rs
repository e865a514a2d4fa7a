//! Application assembly and per-platform resolution for skiff bundles.
//!
//! This crate ties the schema and provider layers together: `Interpreter`
//! binds a provider to an id, `Application` is the immutable aggregate root
//! handed over by a manifest parser, and `resolve` turns an application and a
//! target `Platform` into a `Resolution`: the distributions to fetch now, the
//! ones to fetch on first use, and every command with its distribution
//! placeholders rewritten into file placeholders.

pub mod application;
pub mod interpreter;
pub mod resolve;

pub use application::{Application, ApplicationBuilder};
pub use interpreter::Interpreter;
pub use resolve::{expand_placeholders, resolve, Resolution};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("schema error: {0}")]
    Schema(#[from] skiff_schema::SchemaError),
    #[error("provider error: {0}")]
    Provider(#[from] skiff_provider::ProviderError),
    #[error("application '{application}' does not target platform {platform}")]
    PlatformNotTargeted {
        application: String,
        platform: skiff_schema::Platform,
    },
    #[error("duplicate file id: {0}")]
    DuplicateFileId(String),
    #[error("duplicate interpreter id: {0}")]
    DuplicateInterpreterId(String),
    #[error("duplicate command name: {0}")]
    DuplicateCommandName(String),
    #[error("interpreter '{interpreter}' resolved a distribution with id '{distribution}'")]
    InterpreterIdMismatch {
        interpreter: String,
        distribution: String,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
