use crate::interpreter::Interpreter;
use crate::CoreError;
use skiff_schema::{Command, File, Platform};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// The aggregate root of a bundle: everything a manifest describes.
///
/// Built once through [`ApplicationBuilder`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Application {
    name: String,
    description: Option<String>,
    load_dotenv: bool,
    platforms: BTreeSet<Platform>,
    commands: Vec<Command>,
    interpreters: Vec<Interpreter>,
    files: Vec<File>,
    bindings: Vec<Command>,
}

impl Application {
    /// Start building an application.
    ///
    /// `default_platform` is the target used when no platforms are set
    /// explicitly; callers typically pass the host platform.
    pub fn builder(name: impl Into<String>, default_platform: Platform) -> ApplicationBuilder {
        ApplicationBuilder {
            name: name.into(),
            description: None,
            load_dotenv: false,
            default_platform,
            platforms: BTreeSet::new(),
            commands: Vec::new(),
            interpreters: Vec::new(),
            files: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn load_dotenv(&self) -> bool {
        self.load_dotenv
    }

    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    pub fn targets(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn interpreters(&self) -> &[Interpreter] {
        &self.interpreters
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub fn bindings(&self) -> &[Command] {
        &self.bindings
    }

    /// The command run when the bundle is invoked without selecting one.
    pub fn default_command(&self) -> Option<&Command> {
        self.commands.iter().find(|c| c.name.is_none())
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }

    pub fn interpreter(&self, id: &str) -> Option<&Interpreter> {
        self.interpreters.iter().find(|i| i.id.as_str() == id)
    }

    pub fn file(&self, id: &str) -> Option<&File> {
        self.files.iter().find(|f| f.id() == id)
    }

    /// Check the cross-entity invariants no single entity can check alone.
    ///
    /// File ids, interpreter ids, and command names (within `commands` and
    /// within `bindings`) must be unique; at most one command may be unnamed.
    /// For every targeted platform, each interpreter's distribution must carry
    /// the interpreter's id, and its file id must not collide with a bundle file.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut file_ids = HashSet::new();
        for file in &self.files {
            if !file_ids.insert(file.id()) {
                return Err(CoreError::DuplicateFileId(file.id().to_owned()));
            }
        }

        let mut interpreter_ids = HashSet::new();
        for interp in &self.interpreters {
            if !interpreter_ids.insert(interp.id.as_str()) {
                return Err(CoreError::DuplicateInterpreterId(interp.id.to_string()));
            }
        }

        check_command_names(&self.commands)?;
        check_command_names(&self.bindings)?;

        for interp in &self.interpreters {
            for platform in &self.platforms {
                let Some(dist) = interp.distribution(*platform) else {
                    continue;
                };
                if dist.id != interp.id {
                    return Err(CoreError::InterpreterIdMismatch {
                        interpreter: interp.id.to_string(),
                        distribution: dist.id.to_string(),
                    });
                }
                if file_ids.contains(dist.file.id()) {
                    return Err(CoreError::DuplicateFileId(dist.file.id().to_owned()));
                }
            }
        }

        debug!(
            "application '{}' valid: {} files, {} interpreters, {} commands",
            self.name,
            self.files.len(),
            self.interpreters.len(),
            self.commands.len()
        );
        Ok(())
    }
}

fn check_command_names(commands: &[Command]) -> Result<(), CoreError> {
    let mut names = HashSet::new();
    for cmd in commands {
        if !names.insert(cmd.name.as_deref()) {
            let name = cmd.name.as_deref().unwrap_or("<default>");
            return Err(CoreError::DuplicateCommandName(name.to_owned()));
        }
    }
    Ok(())
}

/// Accumulates the parts of an [`Application`]; see [`Application::builder`].
#[derive(Debug, Clone)]
pub struct ApplicationBuilder {
    name: String,
    description: Option<String>,
    load_dotenv: bool,
    default_platform: Platform,
    platforms: BTreeSet<Platform>,
    commands: Vec<Command>,
    interpreters: Vec<Interpreter>,
    files: Vec<File>,
    bindings: Vec<Command>,
}

impl ApplicationBuilder {
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn load_dotenv(mut self, load_dotenv: bool) -> Self {
        self.load_dotenv = load_dotenv;
        self
    }

    #[must_use]
    pub fn platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms.extend(platforms);
        self
    }

    /// Add a command; an identical command already present is not added twice.
    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        if !self.commands.contains(&command) {
            self.commands.push(command);
        }
        self
    }

    #[must_use]
    pub fn interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreters.push(interpreter);
        self
    }

    #[must_use]
    pub fn file(mut self, file: File) -> Self {
        self.files.push(file);
        self
    }

    /// Add a binding command; identical bindings are stored once.
    #[must_use]
    pub fn binding(mut self, binding: Command) -> Self {
        if !self.bindings.contains(&binding) {
            self.bindings.push(binding);
        }
        self
    }

    /// Finish the application and check it with [`Application::validate`].
    pub fn build(self) -> Result<Application, CoreError> {
        let platforms = if self.platforms.is_empty() {
            BTreeSet::from([self.default_platform])
        } else {
            self.platforms
        };
        let app = Application {
            name: self.name,
            description: self.description,
            load_dotenv: self.load_dotenv,
            platforms,
            commands: self.commands,
            interpreters: self.interpreters,
            files: self.files,
            bindings: self.bindings,
        };
        app.validate()?;
        Ok(app)
    }
}
