//! Ordered command registry assembled from static sources.
//!
//! Commands are not discovered by scanning the filesystem: every source
//! (the engine, each installed module) contributes an explicit list of
//! factory functions, run in order at build time.

use atrium_types::config::EngineConfig;
use atrium_types::error::{AtriumError, Result};

use crate::command::Command;

/// Constructor for one command handler, given the shared engine config.
pub type CommandFactory = fn(&EngineConfig) -> Result<Box<dyn Command>>;

/// A named group of command factories: the engine, or one module.
pub struct CommandSource {
    /// Where these commands come from ("engine" or a module name).
    pub origin: String,
    /// Factories run in order during the registry build.
    pub factories: Vec<CommandFactory>,
}

impl CommandSource {
    pub fn new(origin: impl Into<String>, factories: Vec<CommandFactory>) -> Self {
        Self {
            origin: origin.into(),
            factories,
        }
    }
}

/// Ordered registry of command handlers.
///
/// Iteration order is registration order. When two handlers share an alias,
/// the earlier registration wins and the later alias is unreachable.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.aliases())
            .finish()
    }
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Instantiate every factory of every source, in order.
    ///
    /// A factory failure aborts the build with an error naming the offending
    /// source; a half-built registry is never returned.
    pub fn build(config: &EngineConfig, sources: &[CommandSource]) -> Result<Self> {
        let mut registry = Self::new();
        for source in sources {
            for factory in &source.factories {
                let cmd = factory(config).map_err(|e| {
                    AtriumError::Registry(format!(
                        "command from source \"{}\" failed to initialize: {e}",
                        source.origin,
                    ))
                })?;
                registry.register(cmd);
            }
            log::debug!(
                "registered {} commands from source \"{}\"",
                source.factories.len(),
                source.origin,
            );
        }
        Ok(registry)
    }

    /// Append a command handler.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.push(cmd);
    }

    /// First handler whose alias list contains `name` exactly
    /// (case-sensitive).
    pub fn find(&self, name: &str) -> Option<&dyn Command> {
        self.commands
            .iter()
            .find(|cmd| cmd.commands().iter().any(|alias| *alias == name))
            .map(|cmd| cmd.as_ref())
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Iterate handlers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(|cmd| cmd.as_ref())
    }

    /// Every alias of every handler, in registration order.
    pub fn aliases(&self) -> Vec<String> {
        self.commands
            .iter()
            .flat_map(|cmd| {
                cmd.commands()
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Render the "Available commands:" listing, one alias group per line,
    /// in registration order.
    pub fn render_listing(&self) -> String {
        let mut out = String::from("Available commands:\n");
        for cmd in &self.commands {
            out.push_str(&format!(
                "  {:<24} {}\n",
                cmd.commands().join(", "),
                cmd.description(),
            ));
        }
        out.trim_end().to_string()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
