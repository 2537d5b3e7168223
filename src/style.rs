//! Terminal styling utilities for consistent CLI output

use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Print a success message to stderr, keeping stdout free for the SVG
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green().bold(), msg);
}

/// Print a hint message to stderr (dimmed)
pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".dimmed(), msg.dimmed());
}

/// Print a status update
pub fn status(msg: &str) {
    eprintln!("{} {}", "→".blue(), msg);
}

/// Format a path for display (bright white)
pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Format a label-value pair for summaries
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

/// Print a section header
pub fn section(title: &str) {
    eprintln!("\n{}", title.bold());
}

/// Format a URL for display
pub fn url(u: &str) -> String {
    u.bright_blue().underline().to_string()
}

/// Overwrite the current stderr line with a layout percentage.
/// Does nothing when stderr is not a terminal.
pub fn progress(percent: u32) {
    let mut stderr = io::stderr();
    if !stderr.is_terminal() {
        return;
    }
    write!(stderr, "\r{} {:>3}%", "layout".dimmed(), percent)
        .and_then(|_| stderr.flush())
        .ok();
}

/// End an in-place progress line
pub fn progress_done() {
    if io::stderr().is_terminal() {
        eprintln!();
    }
}
