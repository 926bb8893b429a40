//! Interactive menu feature.
//!
//! This module owns the command overview shown when no command is given.

use super::Cli;
use crate::theme::Theme;

impl Cli {
    /// Show the command overview when no command is provided
    pub fn show_interactive_menu() {
        println!();
        println!(
            "{}",
            Theme::header("Webpurge - Clean Injected Markup from Web Trees")
        );
        println!("{}", Theme::divider_bold(60));
        println!();
        println!("{}", Theme::primary("Available Commands:"));
        println!();
        println!(
            "  {}  {}  {}",
            Theme::command("scan"),
            Theme::muted("or"),
            Theme::command("s"),
        );
        println!(
            "     {} Report infected pages and junk files (safe, dry-run)",
            Theme::muted("→")
        );
        println!();
        println!(
            "  {}  {}  {}",
            Theme::command("clean"),
            Theme::muted("or"),
            Theme::command("c"),
        );
        println!(
            "     {} Strip injected blocks and delete junk files",
            Theme::muted("→")
        );
        println!();
        println!("  {}", Theme::command("config"));
        println!("     {} View or reset configuration", Theme::muted("→"));
        println!();
        println!("{}", Theme::divider(60));
        println!(
            "{} {}",
            Theme::muted("Usage:"),
            Theme::value("webpurge <command> [PATH] [options]")
        );
        println!(
            "{} {}",
            Theme::muted("Help: "),
            Theme::value("webpurge <command> --help")
        );
        println!();
    }
}
