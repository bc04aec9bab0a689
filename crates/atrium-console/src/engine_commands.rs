//! Built-in engine commands.

use atrium_types::config::EngineConfig;
use atrium_types::error::{AtriumError, Result};

use crate::command::{Command, CommandOutput, Environment};
use crate::registry::{CommandFactory, CommandSource};

/// The engine's own command source. Module sources are appended after this
/// one, so engine aliases always win a duplicate.
pub fn engine_source() -> CommandSource {
    CommandSource::new(
        "engine",
        vec![
            new_status as CommandFactory,
            new_cache,
            new_assets,
            new_database,
        ],
    )
}

fn new_status(_config: &EngineConfig) -> Result<Box<dyn Command>> {
    Ok(Box::new(StatusCmd))
}

fn new_cache(_config: &EngineConfig) -> Result<Box<dyn Command>> {
    Ok(Box::new(CacheCmd))
}

fn new_assets(_config: &EngineConfig) -> Result<Box<dyn Command>> {
    Ok(Box::new(AssetsCmd))
}

fn new_database(_config: &EngineConfig) -> Result<Box<dyn Command>> {
    Ok(Box::new(DatabaseCmd))
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

struct StatusCmd;
impl Command for StatusCmd {
    fn commands(&self) -> Vec<&str> {
        vec!["status"]
    }
    fn description(&self) -> &str {
        "Show engine status"
    }
    fn usage(&self) -> &str {
        "status"
    }
    fn dispatch(&self, _args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let mut lines = Vec::new();
        lines.push(format!("Site: {}", env.config.site_name));
        lines.push(format!(
            "Installed: {}",
            if env.config.installed { "yes" } else { "no" }
        ));
        if env.config.modules.is_empty() {
            lines.push("Modules: (none)".to_string());
        } else {
            lines.push(format!("Modules: {}", env.config.modules.join(", ")));
        }
        lines.push(format!("Data dir: {}", env.config.data_dir.display()));
        Ok(CommandOutput::Text(lines.join("\n")))
    }
}

// ---------------------------------------------------------------------------
// cache
// ---------------------------------------------------------------------------

struct CacheCmd;
impl Command for CacheCmd {
    fn commands(&self) -> Vec<&str> {
        vec!["cache"]
    }
    fn description(&self) -> &str {
        "Inspect or clear the engine cache"
    }
    fn usage(&self) -> &str {
        "cache [status|clear]"
    }
    fn help(&self, topic: Option<&str>) -> String {
        match topic {
            Some("clear") => {
                "cache clear\n  Remove every cached entry and report how many were removed."
                    .to_string()
            },
            _ => format!(
                "cache\n  {}\n  Usage: {}\n  Topics: clear",
                self.description(),
                self.usage(),
            ),
        }
    }
    fn dispatch(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(cache) = env.cache else {
            return Ok(CommandOutput::Text(
                "cache: no cache service available".to_string(),
            ));
        };
        match args.first().copied() {
            None | Some("status") => {
                let count = cache.entry_count()?;
                Ok(CommandOutput::Text(format!("Cache entries: {count}")))
            },
            Some("clear") => {
                let removed = cache.clear()?;
                Ok(CommandOutput::Text(format!(
                    "Cache cleared: {removed} entries removed"
                )))
            },
            Some(_) => Err(AtriumError::Command(
                "usage: cache [status|clear]".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// assets
// ---------------------------------------------------------------------------

struct AssetsCmd;
impl Command for AssetsCmd {
    fn commands(&self) -> Vec<&str> {
        vec!["assets"]
    }
    fn description(&self) -> &str {
        "Publish or bundle site assets"
    }
    fn usage(&self) -> &str {
        "assets [install|compile]"
    }
    fn help(&self, topic: Option<&str>) -> String {
        match topic {
            Some("install") => {
                "assets install\n  Copy asset sources into the public directory, preserving the\n  relative layout."
                    .to_string()
            },
            Some("compile") => {
                "assets compile\n  Concatenate stylesheet and script sources into bundle.css and\n  bundle.js under the public directory."
                    .to_string()
            },
            _ => format!(
                "assets\n  {}\n  Usage: {}\n  Topics: install, compile",
                self.description(),
                self.usage(),
            ),
        }
    }
    fn dispatch(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(assets) = env.assets else {
            return Ok(CommandOutput::Text(
                "assets: no asset service available".to_string(),
            ));
        };
        match args.first().copied() {
            None | Some("install") => {
                let copied = assets.install()?;
                Ok(CommandOutput::Text(format!(
                    "Assets installed: {copied} files"
                )))
            },
            Some("compile") => {
                let bundled = assets.compile()?;
                Ok(CommandOutput::Text(format!(
                    "Assets compiled: {bundled} sources bundled"
                )))
            },
            Some(_) => Err(AtriumError::Command(
                "usage: assets [install|compile]".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// database
// ---------------------------------------------------------------------------

struct DatabaseCmd;
impl Command for DatabaseCmd {
    fn commands(&self) -> Vec<&str> {
        vec!["database", "db"]
    }
    fn description(&self) -> &str {
        "Show or apply schema migrations"
    }
    fn usage(&self) -> &str {
        "database [status|migrate]"
    }
    fn help(&self, topic: Option<&str>) -> String {
        match topic {
            Some("migrate") => {
                "database migrate\n  Apply every pending migration, in file-name order.".to_string()
            },
            Some("status") => {
                "database status\n  List applied and pending migrations.".to_string()
            },
            _ => format!(
                "database, db\n  {}\n  Usage: {}\n  Topics: status, migrate",
                self.description(),
                self.usage(),
            ),
        }
    }
    fn dispatch(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let Some(database) = env.database else {
            return Ok(CommandOutput::Text(
                "database: no migration service available".to_string(),
            ));
        };
        match args.first().copied() {
            None | Some("status") => {
                let applied = database.applied()?;
                let pending = database.pending()?;
                let mut lines = Vec::new();
                lines.push(format!("Applied migrations: {}", applied.len()));
                if pending.is_empty() {
                    lines.push("Pending migrations: (none)".to_string());
                } else {
                    lines.push(format!("Pending migrations: {}", pending.len()));
                    for name in &pending {
                        lines.push(format!("  {name}"));
                    }
                }
                Ok(CommandOutput::Text(lines.join("\n")))
            },
            Some("migrate") => {
                let applied = database.migrate()?;
                if applied == 0 {
                    Ok(CommandOutput::Text("Nothing to migrate.".to_string()))
                } else {
                    Ok(CommandOutput::Text(format!(
                        "Migrations applied: {applied}"
                    )))
                }
            },
            Some(_) => Err(AtriumError::Command(
                "usage: database [status|migrate]".to_string(),
            )),
        }
    }
}
