//! Command: list profiles and groups.
use anyhow::Result;
use std::io::Write;

use crate::cli::GlobalOpts;
use crate::config::Config;

use super::CommandSetup;

/// Run the `profiles` command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or `[groups]` is
/// malformed.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let setup = CommandSetup::init(global)?;
    let stdout = std::io::stdout();
    render(&setup.config, &mut stdout.lock())
}

/// Write the profile and group listing to `out`.
///
/// # Errors
///
/// Returns an error if `[groups]` is malformed or writing fails.
pub fn render(config: &Config, out: &mut impl Write) -> Result<()> {
    match config.profile_keys() {
        Some(names) => {
            let sections = config.profile_sections().unwrap_or_default();
            writeln!(out, "Profiles:")?;
            let width = names.iter().map(String::len).max().unwrap_or(0);
            for name in &names {
                match sections.get(name) {
                    Some(commands) => {
                        writeln!(out, "  {name:<width$}  ({})", commands.join(", "))?;
                    }
                    None => writeln!(out, "  {name}")?,
                }
            }
        }
        None => writeln!(out, "No profiles defined")?,
    }

    if let Some(groups) = config.profile_groups()? {
        writeln!(out)?;
        writeln!(out, "Groups:")?;
        let width = groups.keys().map(String::len).max().unwrap_or(0);
        for (name, members) in &groups {
            writeln!(out, "  {name:<width$}  {}", members.join(", "))?;
        }
    }
    Ok(())
}
