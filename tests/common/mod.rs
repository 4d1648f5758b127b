// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed configuration and a fluent builder
// so each integration test can set up an isolated `profiles.toml` without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use backup_profiles::config::{Config, Profile};

/// Name of the configuration file written by the builder.
pub const CONFIG_FILE: &str = "profiles.toml";

/// An isolated configuration directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory containing `profiles.toml`.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty configuration file.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join(CONFIG_FILE), "").expect("write profiles.toml");
        Self { root }
    }

    /// Path to the configuration directory.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Canonical configuration directory, as relative paths resolve against it.
    pub fn base_dir(&self) -> PathBuf {
        dunce::canonicalize(self.root.path()).expect("canonicalize temp dir")
    }

    /// Path to `profiles.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join(CONFIG_FILE)
    }

    /// Load the configuration file.
    pub fn load_config(&self) -> Config {
        Config::load(&self.config_path()).expect("load config")
    }

    /// Load the configuration and resolve `name`, which must exist.
    pub fn profile(&self, name: &str) -> Profile {
        self.load_config()
            .require_profile(name)
            .expect("resolve profile")
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with an empty configuration.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Overwrite `profiles.toml` with `content`.
    pub fn with_config(self, content: &str) -> Self {
        std::fs::write(self.ctx.config_path(), content).expect("write profiles.toml");
        self
    }

    /// Create an empty file relative to the configuration directory.
    pub fn with_file(self, relative: &str) -> Self {
        let path = self.ctx.root.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, "").expect("write file");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
