use crate::CoreError;
use skiff_provider::{create_provider, Provider, ProviderKind};
use skiff_schema::{Distribution, Identifier, Platform};
use std::sync::Arc;

/// A provider bound to the id commands use to reference its distribution.
///
/// Laziness belongs to the provider: eager interpreters are fetched before
/// the application first runs, lazy ones on first use.
#[derive(Debug, Clone)]
pub struct Interpreter {
    pub id: Identifier,
    pub provider: Arc<dyn Provider>,
}

impl Interpreter {
    pub fn new(id: Identifier, provider: Arc<dyn Provider>) -> Self {
        Self { id, provider }
    }

    /// Create the provider and the interpreter in one step under the same id.
    pub fn create(
        id: Identifier,
        kind: ProviderKind,
        lazy: bool,
        config: toml::Table,
    ) -> Result<Self, CoreError> {
        let provider = create_provider(kind, id.clone(), lazy, config)?;
        Ok(Self::new(id, provider))
    }

    pub fn lazy(&self) -> bool {
        self.provider.lazy()
    }

    pub fn distribution(&self, platform: Platform) -> Option<Distribution> {
        self.provider.distribution(platform)
    }
}
