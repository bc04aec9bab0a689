//! Engine service abstractions for Atrium.
//!
//! Console commands reach the rest of the engine only through the service
//! traits defined here. `LocalEngine` is the filesystem-backed
//! implementation wired up by the CLI.

mod services;

pub use services::{AssetPipeline, CacheStore, LocalEngine, SchemaMigrator};
