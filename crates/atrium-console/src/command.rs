//! Command trait and execution environment.

use atrium_engine::{AssetPipeline, CacheStore, SchemaMigrator};
use atrium_types::config::EngineConfig;
use atrium_types::error::Result;

/// Output produced by a command.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
}

/// Shared environment passed to every command dispatch.
///
/// Services are optional; a command that needs an absent service reports
/// that instead of failing.
pub struct Environment<'a> {
    /// Engine configuration.
    pub config: &'a EngineConfig,
    /// Cache store service.
    pub cache: Option<&'a dyn CacheStore>,
    /// Asset pipeline service.
    pub assets: Option<&'a dyn AssetPipeline>,
    /// Schema migrator service.
    pub database: Option<&'a dyn SchemaMigrator>,
}

/// A single console command handler.
pub trait Command {
    /// Alias list this command responds to. The first entry is the canonical
    /// name; the list is never empty.
    fn commands(&self) -> Vec<&str>;

    /// One-line description for the command listing.
    fn description(&self) -> &str;

    /// Usage string (e.g. "cache \[status|clear\]").
    fn usage(&self) -> &str;

    /// Render detailed help, optionally narrowed to a sub-topic. An unknown
    /// topic falls back to the general help.
    fn help(&self, topic: Option<&str>) -> String {
        let _ = topic;
        format!(
            "{}\n  {}\n  Usage: {}",
            self.commands().join(", "),
            self.description(),
            self.usage(),
        )
    }

    /// Execute the command with its positional arguments.
    fn dispatch(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput>;
}
