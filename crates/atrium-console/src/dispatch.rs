//! Dispatcher state machine over an explicit invocation context.
//!
//! The dispatcher is a pure function of its inputs: the registry, the parsed
//! argument vector, and the installation gate. It never reads process-global
//! state, so every outcome is reachable from a test.

use atrium_types::error::Result;

use crate::command::{CommandOutput, Environment};
use crate::phonetic::{SuggestionIndex, soundex};
use crate::registry::CommandRegistry;

/// Parsed process arguments.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// argv\[0\].
    pub program: String,
    /// argv\[1..\].
    pub args: Vec<String>,
}

impl Invocation {
    /// Build from an argument iterator where the first item is the program
    /// name.
    pub fn from_args<I>(argv: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut iter = argv.into_iter();
        let program = iter.next().unwrap_or_else(|| "atrium".to_string());
        Self {
            program,
            args: iter.collect(),
        }
    }

    /// The requested command name (argv\[1\]).
    pub fn command(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// What the dispatcher decided. The binary maps these to output lines and an
/// exit status.
#[derive(Debug)]
pub enum Outcome {
    /// Installation gate failed; nothing was dispatched.
    NotInstalled,
    /// The full command listing (no-argument and bare `help` cases).
    Listing(String),
    /// Rendered help text for one command.
    Help(String),
    /// `help <name>` for a name that matches nothing.
    HelpUnknown { name: String },
    /// A command ran; its output is propagated.
    Dispatched(CommandOutput),
    /// The requested name matched no alias.
    Unknown {
        name: String,
        /// Aliases sharing the request's phonetic key, in registry order.
        suggestions: Vec<String>,
        listing: String,
    },
}

/// Resolve and run one invocation against the registry.
///
/// Outcomes are evaluated in strict order: installation gate, no-argument
/// listing, `help`, exact dispatch, phonetic suggestions. Resolution for
/// dispatch is exact and case-sensitive; a phonetic match is only ever a
/// suggestion.
pub fn dispatch(
    registry: &CommandRegistry,
    invocation: &Invocation,
    installed: bool,
    env: &mut Environment<'_>,
) -> Result<Outcome> {
    if !installed {
        return Ok(Outcome::NotInstalled);
    }

    let Some(name) = invocation.command() else {
        return Ok(Outcome::Listing(registry.render_listing()));
    };

    if name == "help" {
        return Ok(run_help(registry, invocation));
    }

    if let Some(cmd) = registry.find(name) {
        let args: Vec<&str> = invocation.args[1..].iter().map(String::as_str).collect();
        log::debug!("dispatching \"{name}\" with {} argument(s)", args.len());
        return Ok(Outcome::Dispatched(cmd.dispatch(&args, env)?));
    }

    let index = SuggestionIndex::from_registry(registry, soundex);
    Ok(Outcome::Unknown {
        name: name.to_string(),
        suggestions: index.suggest(name),
        listing: registry.render_listing(),
    })
}

/// The `help` sub-state: bare `help` lists everything, `help <name>` renders
/// that command's help with an optional sub-topic.
fn run_help(registry: &CommandRegistry, invocation: &Invocation) -> Outcome {
    let Some(target) = invocation.args.get(1) else {
        return Outcome::Listing(registry.render_listing());
    };
    match registry.find(target) {
        Some(cmd) => {
            let topic = invocation.args.get(2).map(String::as_str);
            Outcome::Help(cmd.help(topic))
        },
        None => Outcome::HelpUnknown {
            name: target.clone(),
        },
    }
}
