//! Subcommand implementations.
pub mod profiles;
pub mod show;
pub mod version;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::platform;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates configuration loading and host detection so that each
/// command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration file.
    pub config: Config,
    /// Value substituted for `host = true` in command sections.
    pub host: String,
}

impl CommandSetup {
    /// Load the configuration file and determine the current host.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed,
    /// or if its `[global]` section is malformed.
    pub fn init(global: &GlobalOpts) -> Result<Self> {
        debug!("loading configuration from {}", global.config.display());
        let config = Config::load(&global.config)?;
        info!("configuration: {}", global.config.display());
        debug!("base directory: {}", config.base_dir.display());

        let host = global.host.clone().or_else(platform::hostname).unwrap_or_else(|| {
            warn!("could not determine the host name; 'host = true' will be omitted");
            String::new()
        });
        debug!("host: {host:?}");

        Ok(Self { config, host })
    }
}
