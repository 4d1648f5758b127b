//! Command-line interface definition.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the backup profile resolver.
#[derive(Parser, Debug)]
#[command(
    name = "backup-profiles",
    about = "Resolve inheritable backup profiles into command-line flags",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "profiles.toml")]
    pub config: std::path::PathBuf,

    /// Host name substituted for `host = true` (defaults to this machine's name)
    #[arg(long, global = true)]
    pub host: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List profiles, their command sections and groups
    Profiles,
    /// Show the resolved flags of a profile
    Show(ShowOpts),
    /// Print version information
    Version,
}

/// Options for the `show` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ShowOpts {
    /// Profile name
    pub profile: String,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_defaults_to_profiles_toml() {
        let cli = Cli::parse_from(["backup-profiles", "profiles"]);
        assert_eq!(cli.global.config, std::path::PathBuf::from("profiles.toml"));
        assert!(cli.global.host.is_none());
        assert!(matches!(cli.command, Command::Profiles));
    }

    #[test]
    fn parse_config_short() {
        let cli = Cli::parse_from(["backup-profiles", "-c", "/etc/backup.toml", "profiles"]);
        assert_eq!(cli.global.config, std::path::PathBuf::from("/etc/backup.toml"));
    }

    #[test]
    fn parse_show_with_json() {
        let cli = Cli::parse_from(["backup-profiles", "show", "home", "--json"]);
        assert!(
            matches!(&cli.command, Command::Show(_)),
            "Expected Show command"
        );
        if let Command::Show(opts) = cli.command {
            assert_eq!(opts.profile, "home");
            assert!(opts.json);
        }
    }

    #[test]
    fn show_requires_profile() {
        assert!(Cli::try_parse_from(["backup-profiles", "show"]).is_err());
    }

    #[test]
    fn parse_host_after_subcommand() {
        let cli = Cli::parse_from(["backup-profiles", "show", "home", "--host", "nas"]);
        assert_eq!(cli.global.host.as_deref(), Some("nas"));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["backup-profiles", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["backup-profiles", "-v", "profiles"]);
        assert!(cli.verbose);
    }
}
