#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for loading a configuration file and resolving
//! profiles through their inheritance chains.

mod common;

use backup_profiles::config::flags;
use backup_profiles::error::ConfigError;
use common::TestContextBuilder;

const CONFIG: &str = r#"
[global]
default-command = "backup"

[groups]
all = ["root", "self"]

[default]
repository = "/srv/restic"
password-file = "key"
verbose = true

[default.env]
tmpdir = "/tmp/restic"

[root]
inherit = "default"
initialize = true
[root.backup]
source = ["/etc", "home"]
exclude-file = "excludes"
tag = ["system", "daily"]
one-file-system = true
check-before = true
[root.retention]
keep-daily = 7
host = true
[root.snapshots]
host = "archive"

[self]
inherit = "root"
Repository = "/srv/self"
[self.backup]
source = "/home/me"
one-file-system = false
"#;

#[test]
fn global_settings_are_loaded() {
    let ctx = TestContextBuilder::new().with_config(CONFIG).build();
    let config = ctx.load_config();
    assert_eq!(config.global.default_command, "backup");
    assert!(!config.global.initialize);
}

#[test]
fn catalog_lists_profiles_and_groups() {
    let ctx = TestContextBuilder::new().with_config(CONFIG).build();
    let config = ctx.load_config();
    assert_eq!(
        config.profile_keys().unwrap(),
        ["default", "root", "self"]
    );
    let sections = config.profile_sections().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections["root"], ["backup", "retention", "snapshots"]);
    assert_eq!(sections["self"], ["backup"]);
    assert_eq!(config.profile_groups().unwrap().unwrap()["all"], ["root", "self"]);
}

#[test]
fn nearest_definition_wins() {
    let ctx = TestContextBuilder::new().with_config(CONFIG).build();
    let profile = ctx.profile("self");
    assert_eq!(profile.lineage, ["self", "root", "default"]);
    assert_eq!(profile.repository, "/srv/self");
    assert!(profile.initialize);
    assert!(profile.verbose);
    assert_eq!(profile.env["TMPDIR"], "/tmp/restic");
    assert!(profile.section_bool("backup", "check-before"));
}

#[cfg(unix)]
#[test]
fn relative_paths_resolve_against_config_directory() {
    let ctx = TestContextBuilder::new().with_config(CONFIG).build();
    let base = ctx.base_dir();
    let profile = ctx.profile("root");
    assert_eq!(
        profile.password_file,
        base.join("key").to_string_lossy()
    );
    assert_eq!(
        profile.backup_source(),
        [
            "/etc".to_string(),
            base.join("home").to_string_lossy().to_string()
        ]
    );
}

#[cfg(unix)]
#[test]
fn backup_arguments_for_child_profile() {
    let ctx = TestContextBuilder::new().with_config(CONFIG).build();
    let base = ctx.base_dir();
    let profile = ctx.profile("self");
    let exclude = base.join("excludes").to_string_lossy().to_string();
    let key = base.join("key").to_string_lossy().to_string();
    assert_eq!(
        profile.command_arguments("backup", "box"),
        [
            "--password-file",
            key.as_str(),
            "--repo",
            "/srv/self",
            "--verbose",
            "--exclude-file",
            exclude.as_str(),
            "--tag",
            "system",
            "--tag",
            "daily",
            "/home/me",
        ]
    );
}

#[test]
fn fixed_paths_point_at_files_next_to_config() {
    let ctx = TestContextBuilder::new()
        .with_config("[home]\npassword-file = \"keys/home.key\"\n[home.backup]\nfiles-from = \"lists/home.txt\"\n")
        .with_file("keys/home.key")
        .with_file("lists/home.txt")
        .build();
    let profile = ctx.profile("home");
    assert!(std::path::Path::new(&profile.password_file).is_file());
    let files_from = profile.command_flags("backup", "box");
    assert!(std::path::Path::new(&files_from["files-from"][0]).is_file());
}

#[test]
fn retention_inherits_host_and_backup_source() {
    let ctx = TestContextBuilder::new().with_config(CONFIG).build();
    let profile = ctx.profile("self");
    let retention = profile.retention_flags("box");
    assert_eq!(retention["keep-daily"], ["7"]);
    assert_eq!(retention["host"], ["box"]);
    assert_eq!(retention["path"], ["/home/me"]);

    let snapshots = profile.command_flags("snapshots", "box");
    assert_eq!(flags::to_arguments(&snapshots), ["--host", "archive"]);
}

#[test]
fn missing_profile_is_reported() {
    let ctx = TestContextBuilder::new().with_config(CONFIG).build();
    let config = ctx.load_config();
    assert!(config.profile("nope").unwrap().is_none());
    assert!(config.profile("groups").unwrap().is_none());
    let err = config.require_profile("nope").unwrap_err();
    assert_eq!(err.to_string(), "Profile 'nope' not found");
}

#[test]
fn broken_chains_fail_whole_resolution() {
    let ctx = TestContextBuilder::new()
        .with_config(
            r#"
[orphan]
inherit = "ghost"

[a]
inherit = "b"
[b]
inherit = "a"
"#,
        )
        .build();
    let config = ctx.load_config();
    assert!(matches!(
        config.profile("orphan"),
        Err(ConfigError::UnknownParent { .. })
    ));
    let err = config.profile("a").unwrap_err();
    assert_eq!(err.to_string(), "Cyclic inheritance: a -> b -> a");
}

#[test]
fn malformed_section_is_rejected() {
    let ctx = TestContextBuilder::new()
        .with_config("[home]\nbackup = \"yes\"\n")
        .build();
    let err = ctx.load_config().profile("home").unwrap_err();
    assert!(matches!(err, ConfigError::MalformedSection { .. }));
}

#[test]
fn invalid_toml_is_a_load_error() {
    let ctx = TestContextBuilder::new().with_config("[home\n").build();
    let err = backup_profiles::config::Config::load(&ctx.config_path()).unwrap_err();
    assert!(err.downcast_ref::<ConfigError>().is_some());
}
