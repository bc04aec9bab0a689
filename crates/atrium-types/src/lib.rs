//! Foundation types for the Atrium CMS engine.
//!
//! This crate contains the types shared by all Atrium crates: the engine
//! configuration and the error types.

pub mod config;
pub mod error;
