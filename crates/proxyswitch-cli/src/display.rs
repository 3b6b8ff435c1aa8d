//! Status line output.

use std::fmt::Display;

use colored::Colorize;

/// Prints a success line to stdout.
pub fn success(message: &str) {
    println!("✅ {}", message.green());
}

/// Prints a failure line with its cause to stderr.
pub fn failure(context: &str, err: &impl Display) {
    eprintln!("❌ {}: {err}", context.red());
}

/// Prints a usage line to stderr.
pub fn usage(usage: &str) {
    eprintln!("{} {usage}", "Usage:".bold());
}
