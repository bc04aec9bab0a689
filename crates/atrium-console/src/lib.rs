//! Console command registry and dispatcher for the Atrium engine.
//!
//! Commands implement the `Command` trait and are assembled into an ordered
//! `CommandRegistry` from per-source factory lists (one source for the
//! engine, one per installed module). The dispatcher resolves a requested
//! name against every handler's alias list and either dispatches, renders
//! help, or reports an unmatched command with phonetic suggestions.

mod command;
mod dispatch;
mod engine_commands;
mod module_commands;
mod phonetic;
mod registry;

/// A single console command handler trait.
pub use command::Command;
/// Output produced by a command.
pub use command::CommandOutput;
/// Shared environment passed to every command dispatch.
pub use command::Environment;
/// Dispatcher entry point and its invocation/outcome types.
pub use dispatch::{Invocation, Outcome, dispatch};
/// The engine's built-in command source.
pub use engine_commands::engine_source;
/// Command sources contributed by installed modules.
pub use module_commands::module_sources;
/// Phonetic key function type, the shipped soundex key, and the alias index.
pub use phonetic::{PhoneticKey, SuggestionIndex, soundex};
/// Ordered registry of command handlers and its build inputs.
pub use registry::{CommandFactory, CommandRegistry, CommandSource};
