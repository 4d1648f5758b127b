//! Relative-path fixups against a base directory.
//!
//! Which syntax applies is decided by the build target ([`Os::current`]);
//! both variants are reachable through [`fix_path_for`] so they can be
//! exercised on any host.
use crate::platform::Os;

/// Normalize `path` against `prefix` using the native path syntax and the
/// process environment.
///
/// See [`fix_path_for`] for the rules.
#[must_use]
pub fn fix_path(path: &str, prefix: &str) -> String {
    fix_path_for(Os::current(), path, prefix, |name| std::env::var(name).ok())
}

/// Normalize `path` against `prefix` for the given path syntax.
///
/// - empty input stays empty
/// - Unix: `$VAR` / `${VAR}` are expanded with `lookup` (unset expands to
///   nothing); a path starting with a variable is returned expanded and
///   never joined, as are `~`-prefixed and absolute paths
/// - Windows: `%VAR%`-prefixed, `~`-prefixed, drive-absolute and UNC paths
///   are returned as-is; variables are never expanded
/// - anything else is joined onto `prefix` with the platform separator
pub fn fix_path_for<F>(os: Os, path: &str, prefix: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if path.is_empty() {
        return String::new();
    }
    let value = match os {
        Os::Unix => expand_env(path, &lookup),
        Os::Windows => path.to_string(),
    };
    if os == Os::Unix && path.starts_with('$') {
        return value;
    }
    if value.is_empty() || value.starts_with('~') || is_absolute(os, &value) {
        return value;
    }
    if os == Os::Windows && value.starts_with('%') {
        return value;
    }
    join(os, prefix, &value)
}

fn is_absolute(os: Os, path: &str) -> bool {
    match os {
        Os::Unix => path.starts_with('/'),
        Os::Windows => {
            let mut chars = path.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(drive), Some(':'), Some(sep)) => {
                    drive.is_ascii_alphabetic() && os.is_separator(sep)
                }
                (Some(a), Some(b), _) => os.is_separator(a) && os.is_separator(b),
                _ => false,
            }
        }
    }
}

fn join(os: Os, prefix: &str, path: &str) -> String {
    let mut rest = path.trim_start_matches(|c| os.is_separator(c));
    while let Some(stripped) = rest.strip_prefix('.') {
        match stripped.chars().next() {
            Some(c) if os.is_separator(c) => {
                rest = stripped.trim_start_matches(|c| os.is_separator(c));
            }
            None => {
                rest = stripped;
            }
            Some(_) => break,
        }
    }
    let base = prefix.trim_end_matches(|c| os.is_separator(c));
    match (base.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{base}{}{rest}", os.separator()),
    }
}

/// Expand `$VAR` and `${VAR}` occurrences. Unset variables expand to nothing.
fn expand_env<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains('$') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            let mut closed = false;
            for inner in chars.by_ref() {
                if inner == '}' {
                    closed = true;
                    break;
                }
                name.push(inner);
            }
            if !closed {
                out.push_str("${");
                out.push_str(&name);
                continue;
            }
        } else {
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push('$');
                continue;
            }
        }
        out.push_str(&lookup(&name).unwrap_or_default());
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            "TEMP_TEST_DIR" => Some("/home".to_string()),
            "USER" => Some("backup".to_string()),
            _ => None,
        }
    }

    #[test]
    fn unix_paths() {
        let cases = [
            ("", ""),
            ("dir", "prefix/dir"),
            ("./dir", "prefix/dir"),
            ("/dir", "/dir"),
            ("~/dir", "~/dir"),
            ("$TEMP_TEST_DIR/dir", "/home/dir"),
            ("${TEMP_TEST_DIR}/dir", "/home/dir"),
            ("/srv/$USER", "/srv/backup"),
        ];
        for (source, expected) in cases {
            assert_eq!(
                fix_path_for(Os::Unix, source, "prefix", env),
                expected,
                "source: {source:?}"
            );
        }
    }

    #[test]
    fn unix_unset_variable_expands_to_nothing() {
        assert_eq!(fix_path_for(Os::Unix, "$NOPE/dir", "prefix", env), "/dir");
    }

    #[test]
    fn unix_variable_prefixed_path_is_never_joined() {
        let lookup = |name: &str| (name == "REL").then(|| "data".to_string());
        assert_eq!(fix_path_for(Os::Unix, "$REL/dir", "prefix", lookup), "data/dir");
        assert_eq!(fix_path_for(Os::Unix, "${REL}", "prefix", lookup), "data");
    }

    #[test]
    fn unix_lone_dollar_is_kept() {
        assert_eq!(fix_path_for(Os::Unix, "a$-b", "/p", env), "/p/a$-b");
    }

    #[test]
    fn windows_paths() {
        let cases = [
            (r"", r""),
            (r"dir", r"prefix\dir"),
            (r"\dir", r"prefix\dir"),
            (r"c:\dir", r"c:\dir"),
            (r"C:/dir", r"C:/dir"),
            (r"\\server\share", r"\\server\share"),
            (r"%TEMP_TEST_DIR%\dir", r"%TEMP_TEST_DIR%\dir"),
            (r"~\dir", r"~\dir"),
        ];
        for (source, expected) in cases {
            assert_eq!(
                fix_path_for(Os::Windows, source, "prefix", env),
                expected,
                "source: {source:?}"
            );
        }
    }

    #[test]
    fn prefix_trailing_separator_is_not_doubled() {
        assert_eq!(fix_path_for(Os::Unix, "dir", "/etc/", env), "/etc/dir");
    }

    #[test]
    fn empty_prefix_keeps_relative_path() {
        assert_eq!(fix_path_for(Os::Unix, "dir", "", env), "dir");
    }

    #[test]
    fn native_absolute_path_unchanged() {
        let absolute = if cfg!(windows) { r"c:\dir" } else { "/dir" };
        assert_eq!(fix_path(absolute, "prefix"), absolute);
    }
}
