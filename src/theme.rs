//! Terminal styling
//!
//! Thin wrappers over `colored`. Colors are dropped automatically when stdout is
//! not a terminal or `NO_COLOR` is set.

use colored::Colorize;

/// Text formatting utilities
pub struct Theme;

impl Theme {
    pub fn primary(text: &str) -> String {
        text.bold().to_string()
    }

    pub fn success(text: &str) -> String {
        text.green().to_string()
    }

    pub fn warning(text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn muted(text: &str) -> String {
        text.dimmed().to_string()
    }

    pub fn value(text: &str) -> String {
        text.cyan().to_string()
    }

    pub fn path(text: &str) -> String {
        text.underline().to_string()
    }

    pub fn header(text: &str) -> String {
        text.bold().yellow().to_string()
    }

    pub fn command(text: &str) -> String {
        text.bold().cyan().to_string()
    }

    pub fn error(text: &str) -> String {
        text.red().bold().to_string()
    }

    /// Plain divider line
    pub fn divider(width: usize) -> String {
        "-".repeat(width).dimmed().to_string()
    }

    /// Plain double divider
    pub fn divider_bold(width: usize) -> String {
        "=".repeat(width)
    }
}
