//! Domain-specific error types for profile resolution.
//!
//! The resolution core ([`crate::config`]) returns [`ConfigError`]. The
//! file-loading boundary and the CLI commands work with [`anyhow::Error`],
//! into which [`ConfigError`] converts via the standard `?` operator.
//!
//! # Error kinds
//!
//! ```text
//! ConfigError
//! ├── ProfileNotFound      - requested name is absent (caller decides)
//! ├── UnknownParent        - `inherit` names a profile that does not exist
//! ├── CyclicInheritance    - `inherit` chain revisits a profile
//! ├── MalformedSection     - a value has the wrong shape for its use
//! ├── Parse                - TOML syntax error
//! └── Io                   - configuration file could not be read
//! ```

use thiserror::Error;

/// Errors that arise from configuration loading and profile resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested profile name is not defined in the configuration.
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    /// A profile inherits from a name that is not a profile.
    #[error("Profile '{profile}' inherits from unknown profile '{parent}'")]
    UnknownParent {
        /// Profile holding the `inherit` reference.
        profile: String,
        /// Name that could not be found.
        parent: String,
    },

    /// The `inherit` chain loops back on itself.
    #[error("Cyclic inheritance: {}", .0.join(" -> "))]
    CyclicInheritance(Vec<String>),

    /// A value has an incompatible shape for its expected use.
    #[error("Malformed section [{location}]: {message}")]
    MalformedSection {
        /// Dotted location of the offending value (e.g. `"profile.backup"`).
        location: String,
        /// Human-readable description of the problem.
        message: String,
    },

    /// The configuration file contains a TOML syntax error.
    #[error("Invalid TOML in {file}: {message}")]
    Parse {
        /// File (or `"<string>"`) that failed to parse.
        file: String,
        /// Parser error message.
        message: String,
    },

    /// An I/O error occurred while reading the configuration file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Build a [`ConfigError::MalformedSection`].
    pub(crate) fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSection {
            location: location.into(),
            message: message.into(),
        }
    }
}
