//! Host platform details: path syntax and host name.
use std::fmt;

/// Path syntax family of the build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Slash-separated paths, `$VAR` expansion.
    Unix,
    /// Backslash-separated paths with drive letters, `%VAR%` left untouched.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl Os {
    /// The path syntax of the target this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// Primary path separator.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Unix => '/',
            Self::Windows => '\\',
        }
    }

    /// Whether `c` separates path components on this platform.
    #[must_use]
    pub const fn is_separator(self, c: char) -> bool {
        match self {
            Self::Unix => c == '/',
            Self::Windows => c == '\\' || c == '/',
        }
    }
}

/// Best-effort name of the current host.
///
/// Reads `HOSTNAME` then `COMPUTERNAME`, falling back to the `hostname`
/// command. The domain part, if any, is dropped.
#[must_use]
pub fn hostname() -> Option<String> {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|h| !h.trim().is_empty())
        .or_else(hostname_command)
        .map(|h| short_hostname(&h))
}

fn hostname_command() -> Option<String> {
    let output = std::process::Command::new("hostname").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() { None } else { Some(name) }
}

fn short_hostname(name: &str) -> String {
    let name = name.trim();
    name.split('.').next().unwrap_or(name).to_string()
}
