//! Terminal output helpers.
//!
//! Results go to stdout, notices and warnings to stderr.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a notice to stderr.
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a `label: value` line.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as JSON, on one line unless `pretty`.
pub fn json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
