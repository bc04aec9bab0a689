//! Command sets contributed by first-party modules.
//!
//! The installed-modules list in the config names which sets are active; a
//! module with no known command set contributes nothing and is skipped.

use std::fs;

use atrium_types::config::EngineConfig;
use atrium_types::error::{AtriumError, Result};

use crate::command::{Command, CommandOutput, Environment};
use crate::registry::{CommandFactory, CommandSource};

/// Command sources for the installed modules, in config order.
pub fn module_sources(modules: &[String]) -> Vec<CommandSource> {
    let mut sources = Vec::new();
    for module in modules {
        match module.as_str() {
            "maintenance" => sources.push(CommandSource::new(
                "maintenance",
                vec![new_maintenance as CommandFactory],
            )),
            other => log::debug!("module \"{other}\" provides no console commands"),
        }
    }
    sources
}

fn new_maintenance(_config: &EngineConfig) -> Result<Box<dyn Command>> {
    Ok(Box::new(MaintenanceCmd))
}

// ---------------------------------------------------------------------------
// maintenance
// ---------------------------------------------------------------------------

/// Marker file name under the data dir; the web frontend serves a holding
/// page while it exists.
const MARKER: &str = "maintenance.lock";

struct MaintenanceCmd;
impl Command for MaintenanceCmd {
    fn commands(&self) -> Vec<&str> {
        vec!["maintenance"]
    }
    fn description(&self) -> &str {
        "Toggle site maintenance mode"
    }
    fn usage(&self) -> &str {
        "maintenance [status|on|off]"
    }
    fn help(&self, topic: Option<&str>) -> String {
        match topic {
            Some("on") => {
                "maintenance on\n  Put the site into maintenance mode by writing the marker file."
                    .to_string()
            },
            Some("off") => {
                "maintenance off\n  Remove the marker file and restore normal serving.".to_string()
            },
            _ => format!(
                "maintenance\n  {}\n  Usage: {}\n  Topics: on, off",
                self.description(),
                self.usage(),
            ),
        }
    }
    fn dispatch(&self, args: &[&str], env: &mut Environment<'_>) -> Result<CommandOutput> {
        let marker = env.config.data_dir.join(MARKER);
        match args.first().copied() {
            None | Some("status") => {
                let state = if marker.exists() { "on" } else { "off" };
                Ok(CommandOutput::Text(format!("Maintenance mode is {state}")))
            },
            Some("on") => {
                fs::create_dir_all(&env.config.data_dir)?;
                fs::write(&marker, b"")?;
                log::info!("maintenance mode enabled");
                Ok(CommandOutput::Text("Maintenance mode enabled".to_string()))
            },
            Some("off") => {
                if marker.exists() {
                    fs::remove_file(&marker)?;
                }
                log::info!("maintenance mode disabled");
                Ok(CommandOutput::Text("Maintenance mode disabled".to_string()))
            },
            Some(_) => Err(AtriumError::Command(
                "usage: maintenance [status|on|off]".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CommandRegistry;

    fn text(output: CommandOutput) -> String {
        match output {
            CommandOutput::Text(s) => s,
            CommandOutput::None => panic!("expected text output"),
        }
    }

    #[test]
    fn unknown_modules_are_skipped() {
        let modules = vec![
            "blog".to_string(),
            "maintenance".to_string(),
            "shop".to_string(),
        ];
        let sources = module_sources(&modules);
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].origin, "maintenance");
    }

    #[test]
    fn no_modules_no_sources() {
        assert!(module_sources(&[]).is_empty());
    }

    #[test]
    fn maintenance_toggle_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            data_dir: tmp.path().join("data"),
            ..EngineConfig::default()
        };
        let modules = vec!["maintenance".to_string()];
        let registry = CommandRegistry::build(&config, &module_sources(&modules)).unwrap();
        let cmd = registry.find("maintenance").unwrap();
        let mut env = Environment {
            config: &config,
            cache: None,
            assets: None,
            database: None,
        };

        assert_eq!(
            text(cmd.dispatch(&[], &mut env).unwrap()),
            "Maintenance mode is off"
        );
        assert_eq!(
            text(cmd.dispatch(&["on"], &mut env).unwrap()),
            "Maintenance mode enabled"
        );
        assert!(config.data_dir.join("maintenance.lock").exists());
        assert_eq!(
            text(cmd.dispatch(&["status"], &mut env).unwrap()),
            "Maintenance mode is on"
        );
        assert_eq!(
            text(cmd.dispatch(&["off"], &mut env).unwrap()),
            "Maintenance mode disabled"
        );
        assert!(!config.data_dir.join("maintenance.lock").exists());
        // Turning it off twice is fine.
        assert_eq!(
            text(cmd.dispatch(&["off"], &mut env).unwrap()),
            "Maintenance mode disabled"
        );
    }

    #[test]
    fn maintenance_rejects_unknown_subcommand() {
        let tmp = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            data_dir: tmp.path().to_path_buf(),
            ..EngineConfig::default()
        };
        let registry =
            CommandRegistry::build(&config, &module_sources(&["maintenance".to_string()]))
                .unwrap();
        let mut env = Environment {
            config: &config,
            cache: None,
            assets: None,
            database: None,
        };
        let err = registry
            .find("maintenance")
            .unwrap()
            .dispatch(&["toggle"], &mut env)
            .unwrap_err();
        assert!(format!("{err}").contains("usage: maintenance"));
    }
}
