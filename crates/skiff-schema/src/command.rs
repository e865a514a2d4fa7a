use crate::env::Env;
use serde::{Deserialize, Serialize};

/// An executable invocation carried by a bundle.
///
/// `exe`, `args` and env values may contain `#{id}` placeholder tokens that
/// are rewritten before the command reaches the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Command {
    pub exe: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: Env,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Command {
    pub fn new(exe: impl Into<String>) -> Self {
        Self {
            exe: exe.into(),
            args: Vec::new(),
            env: Env::default(),
            name: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rewrite every string that may carry placeholders: `exe`, each arg, and
    /// each `default`/`replace` env value. Name and description are kept.
    pub fn try_map_strings<E, F>(&self, mut f: F) -> Result<Command, E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        let exe = f(self.exe.as_str())?;
        let args = self
            .args
            .iter()
            .map(|arg| f(arg.as_str()))
            .collect::<Result<Vec<_>, E>>()?;
        let env = self.env.try_map_values(&mut f)?;
        Ok(Command {
            exe,
            args,
            env,
            name: self.name.clone(),
            description: self.description.clone(),
        })
    }
}
