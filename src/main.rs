//! `backup-profiles` command-line entry point.
use anyhow::Result;
use backup_profiles::{cli, commands, logging};
use clap::Parser;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);

    match args.command {
        cli::Command::Profiles => commands::profiles::run(&args.global),
        cli::Command::Show(opts) => commands::show::run(&args.global, &opts),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
