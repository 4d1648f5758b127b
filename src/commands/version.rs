//! Command: print version information.

/// Version string, preferring the one injected at build time.
#[must_use]
pub fn version() -> &'static str {
    option_env!("BACKUP_PROFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the backup-profiles version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("backup-profiles {}", version());
}
