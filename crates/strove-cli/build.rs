//! Stamps the `--version` string with the commit the binary was built from.
//!
//! Packaging can pin the string with `STROVE_BUILD_VERSION`. Otherwise the
//! crate version is used, suffixed with the short commit hash when the build
//! runs inside a git checkout, e.g. `0.1.0 (3f2a9c1-dirty)`.

use std::process::Command;

const OVERRIDE_VAR: &str = "STROVE_BUILD_VERSION";

fn main() {
    println!("cargo:rerun-if-env-changed={OVERRIDE_VAR}");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let pkg = env!("CARGO_PKG_VERSION");
    let version = match std::env::var(OVERRIDE_VAR) {
        Ok(pinned) if !pinned.trim().is_empty() => pinned.trim().to_string(),
        _ => match commit() {
            Some(commit) => format!("{pkg} ({commit})"),
            None => pkg.to_string(),
        },
    };

    println!("cargo:rustc-env=STROVE_VERSION={version}");
}

/// Short hash of HEAD, with `-dirty` when the work tree has local changes.
fn commit() -> Option<String> {
    let hash = git(&["rev-parse", "--short", "HEAD"])?;
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"]).is_some();
    Some(if dirty { format!("{hash}-dirty") } else { hash })
}

/// Trimmed stdout of a successful git command, `None` when empty or failed.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
