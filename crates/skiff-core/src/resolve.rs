use crate::application::Application;
use crate::CoreError;
use serde::Serialize;
use skiff_schema::placeholder;
use skiff_schema::{Command, Distribution, File, Identifier, Platform, SchemaError};
use tracing::{debug, info, warn};

/// An application resolved for one target platform, ready for the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub application: String,
    pub platform: Platform,
    pub load_dotenv: bool,
    /// Distributions to fetch before the application first runs.
    pub eager: Vec<Distribution>,
    /// Distributions to fetch when a command first needs them.
    pub lazy: Vec<Distribution>,
    /// Interpreters whose provider has nothing for this platform.
    pub unavailable: Vec<Identifier>,
    pub files: Vec<File>,
    pub commands: Vec<Command>,
    pub bindings: Vec<Command>,
}

impl Resolution {
    pub fn distributions(&self) -> impl Iterator<Item = &Distribution> {
        self.eager.iter().chain(self.lazy.iter())
    }

    pub fn default_command(&self) -> Option<&Command> {
        self.commands.iter().find(|c| c.name.is_none())
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }

    /// Serialize to the JSON document handed to the bundling stage.
    pub fn canonical_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Rewrite every distribution token in `value` in a single pass.
///
/// Each `#{id}` / `#{id:key}` token is expanded by the distribution whose id
/// matches; tokens naming no distribution are left unexpanded.
pub fn expand_placeholders(
    distributions: &[Distribution],
    value: &str,
) -> Result<String, SchemaError> {
    placeholder::expand_with(value, |token| {
        match distributions.iter().find(|d| d.id.as_str() == token.id) {
            Some(dist) => dist.expand_token(token),
            None => Ok(None),
        }
    })
}

/// Resolve `app` for `platform`.
///
/// Each interpreter is asked once for its distribution; the results are split
/// by laziness and every command and binding is expanded against all of them.
pub fn resolve(app: &Application, platform: Platform) -> Result<Resolution, CoreError> {
    if !app.targets(platform) {
        return Err(CoreError::PlatformNotTargeted {
            application: app.name().to_owned(),
            platform,
        });
    }
    info!("resolving application '{}' for {platform}", app.name());

    let mut eager = Vec::new();
    let mut lazy = Vec::new();
    let mut unavailable = Vec::new();

    for interp in app.interpreters() {
        let Some(dist) = interp.distribution(platform) else {
            debug!("interpreter '{}' has no distribution for {platform}", interp.id);
            unavailable.push(interp.id.clone());
            continue;
        };
        if dist.id != interp.id {
            return Err(CoreError::InterpreterIdMismatch {
                interpreter: interp.id.to_string(),
                distribution: dist.id.to_string(),
            });
        }
        debug!(
            "interpreter '{}' -> {} (lazy={})",
            interp.id,
            dist.url,
            interp.lazy()
        );
        if interp.lazy() {
            lazy.push(dist);
        } else {
            eager.push(dist);
        }
    }

    let available: Vec<Distribution> = eager.iter().chain(lazy.iter()).cloned().collect();
    let expand = |command: &Command| {
        command.try_map_strings(|value| {
            for token in placeholder::tokens(value) {
                if unavailable.iter().any(|id| id.as_str() == token.id) {
                    warn!(
                        "'{value}' references interpreter '{}' which has no distribution for {platform}",
                        token.id
                    );
                }
            }
            expand_placeholders(&available, value)
        })
    };

    let commands = app
        .commands()
        .iter()
        .map(&expand)
        .collect::<Result<Vec<_>, _>>()?;
    let bindings = app
        .bindings()
        .iter()
        .map(&expand)
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "resolved '{}' for {platform}: {} eager, {} lazy, {} unavailable",
        app.name(),
        eager.len(),
        lazy.len(),
        unavailable.len()
    );

    Ok(Resolution {
        application: app.name().to_owned(),
        platform,
        load_dotenv: app.load_dotenv(),
        eager,
        lazy,
        unavailable,
        files: app.files().to_vec(),
        commands,
        bindings,
    })
}
