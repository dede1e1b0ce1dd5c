//! Stamps the `--version` string with the source revision and build day.

use std::process::Command;

/// Overrides the revision for builds outside a git checkout (release tarballs).
const REVISION_ENV: &str = "INSIGHTFORGE_REVISION";

fn main() {
    let revision = std::env::var(REVISION_ENV)
        .ok()
        .filter(|r| !r.trim().is_empty())
        .or_else(git_revision)
        .unwrap_or_else(|| "unknown".to_string());
    let built_on = chrono::Utc::now().date_naive();

    println!("cargo:rustc-env=GIT_HASH={revision}");
    println!("cargo:rustc-env=BUILD_DATE={built_on}");
    println!("cargo:rerun-if-env-changed={REVISION_ENV}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

/// Short commit id, marked `-dirty` when the tree has local edits.
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=7"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let revision = String::from_utf8(output.stdout).ok()?;
    let revision = revision.trim();
    (!revision.is_empty()).then(|| revision.to_string())
}
