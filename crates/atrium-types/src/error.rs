//! Error types for the Atrium engine.

use std::io;

/// Errors produced by the Atrium console framework.
#[derive(Debug, thiserror::Error)]
pub enum AtriumError {
    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AtriumError>;
