//! Embeds the release version into the binary.
use std::process::Command;

fn main() {
    // A release pipeline sets BACKUP_PROFILES_VERSION; local builds use `git describe`.
    if let Ok(version) = std::env::var("BACKUP_PROFILES_VERSION") {
        println!("cargo:rustc-env=BACKUP_PROFILES_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=BACKUP_PROFILES_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=BACKUP_PROFILES_VERSION");
}
