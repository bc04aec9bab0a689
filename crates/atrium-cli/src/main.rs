//! Atrium CMS console entry point.
//!
//! Loads the engine config, assembles the command registry from the engine
//! source plus one source per installed module, and hands the parsed
//! arguments to the dispatcher. Every outcome except a successful dispatch
//! terminates here; a dispatched command's result becomes the exit status.

use std::path::Path;

use anyhow::Result;

use atrium_console::{
    CommandOutput, CommandRegistry, Environment, Invocation, Outcome, dispatch, engine_source,
    module_sources,
};
use atrium_engine::LocalEngine;
use atrium_types::config::{EngineConfig, parse_config};

/// Environment variable overriding the config file location.
const CONFIG_ENV: &str = "ATRIUM_CONFIG";
const CONFIG_FILE: &str = "atrium.toml";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config()?;
    log::info!("Atrium console starting (site: {})", config.site_name);

    print_banner();

    let mut sources = vec![engine_source()];
    sources.extend(module_sources(&config.modules));
    let registry = CommandRegistry::build(&config, &sources)?;
    log::info!("{} commands registered", registry.len());

    let engine = LocalEngine::new(&config);
    let mut env = Environment {
        config: &config,
        cache: Some(&engine),
        assets: Some(&engine),
        database: Some(&engine),
    };

    let invocation = Invocation::from_args(std::env::args());
    match dispatch(&registry, &invocation, config.installed, &mut env)? {
        Outcome::NotInstalled => {
            println!("Please install the system first.");
            std::process::exit(1);
        },
        Outcome::Listing(listing) => println!("{listing}"),
        Outcome::Help(text) => println!("{text}"),
        Outcome::HelpUnknown { name } => println!("Command \"{name}\" not found."),
        Outcome::Dispatched(CommandOutput::Text(text)) => println!("{text}"),
        Outcome::Dispatched(CommandOutput::None) => {},
        Outcome::Unknown {
            name,
            suggestions,
            listing,
        } => {
            if suggestions.is_empty() {
                println!("Command \"{name}\" not found.");
            } else {
                println!(
                    "Command \"{name}\" not found. Did you mean: {}?",
                    suggestions.join(" or "),
                );
            }
            println!();
            println!("{listing}");
        },
    }

    Ok(())
}

/// Read the engine config. A missing file yields the default (not installed)
/// config so the installation gate fires instead of an error.
fn load_config() -> Result<EngineConfig> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
    if !Path::new(&path).exists() {
        log::warn!("config file {path} not found; engine treated as not installed");
        return Ok(EngineConfig::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    Ok(parse_config(&raw)?)
}

fn print_banner() {
    println!("================================================================");
    println!("  Atrium CMS -- Commands Manager");
    println!("================================================================");
    println!();
}
