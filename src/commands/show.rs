//! Command: show the resolved flags of one profile.
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::cli::{GlobalOpts, ShowOpts};
use crate::config::sections::{BACKUP, RETENTION};
use crate::config::{Flags, Profile};

use super::CommandSetup;

/// Everything `show` reports about a resolved profile.
#[derive(Debug, Serialize)]
pub struct ProfileReport {
    /// Profile name as requested.
    pub name: String,
    /// Inheritance chain, self first.
    pub lineage: Vec<String>,
    /// Flags passed to every command.
    pub common: Flags,
    /// Flags per declared command; retention is included whenever it has any.
    pub commands: BTreeMap<String, Flags>,
    /// Positional `backup` arguments.
    pub source: Vec<String>,
    /// Environment variables set for the backup engine.
    pub env: BTreeMap<String, String>,
}

impl ProfileReport {
    /// Build the report for `profile`, substituting `host` for `host = true`.
    #[must_use]
    pub fn new(profile: &Profile, host: &str) -> Self {
        let mut commands: BTreeMap<String, Flags> = profile
            .commands()
            .into_iter()
            .filter(|command| *command != RETENTION)
            .map(|command| (command.to_string(), profile.command_flags(command, host)))
            .collect();
        let retention = profile.retention_flags(host);
        if !retention.is_empty() {
            commands.insert(RETENTION.to_string(), retention);
        }

        Self {
            name: profile.name.clone(),
            lineage: profile.lineage.clone(),
            common: profile.common_flags(),
            commands,
            source: profile.backup_source(),
            env: profile.env.clone(),
        }
    }

    /// Render the report as indented text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "Profile: {}", self.name)?;
        if self.lineage.len() > 1 {
            writeln!(out, "Inherits: {}", self.lineage.join(" <- "))?;
        }
        if !self.env.is_empty() {
            writeln!(out)?;
            writeln!(out, "Environment:")?;
            for (key, value) in &self.env {
                writeln!(out, "  {key}={value}")?;
            }
        }
        writeln!(out)?;
        writeln!(out, "Common flags:")?;
        write_flags(out, &self.common)?;
        for (command, flags) in &self.commands {
            writeln!(out)?;
            writeln!(out, "{command}:")?;
            write_flags(out, flags)?;
            if command == BACKUP {
                for source in &self.source {
                    writeln!(out, "  {source}")?;
                }
            }
        }
        Ok(())
    }
}

fn write_flags(out: &mut impl Write, flags: &Flags) -> std::io::Result<()> {
    if flags.is_empty() {
        return writeln!(out, "  (none)");
    }
    for (name, values) in flags {
        if values.is_empty() {
            writeln!(out, "  --{name}")?;
        }
        for value in values {
            writeln!(out, "  --{name} {value}")?;
        }
    }
    Ok(())
}

/// Run the `show` command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the profile does
/// not exist or cannot be resolved.
pub fn run(global: &GlobalOpts, opts: &ShowOpts) -> Result<()> {
    let setup = CommandSetup::init(global)?;
    let profile = setup.config.require_profile(&opts.profile)?;
    let report = ProfileReport::new(&profile, &setup.host);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if opts.json {
        serde_json::to_writer_pretty(&mut out, &report).context("serializing profile")?;
        writeln!(out)?;
    } else {
        report.write_text(&mut out)?;
    }
    Ok(())
}
