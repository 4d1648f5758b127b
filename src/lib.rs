//! Backup profile resolution engine.
//!
//! Reads hierarchical, inheritable backup profiles from a TOML file and
//! resolves them into the command-line flags of an external backup engine.
//! Nothing here runs the engine itself.
//!
//! The public API is organised into three layers:
//!
//! - **[`config`]**: decode the file, resolve inheritance, serialize flags
//! - **[`error`]**: the [`error::ConfigError`] kinds raised by resolution
//! - **[`commands`]**: top-level subcommand orchestration (`profiles`, `show`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
