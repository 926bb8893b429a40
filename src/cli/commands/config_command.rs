//! Config command feature.
//!
//! This module owns and handles the "webpurge config" command behavior.

use super::load_config;
use crate::config::Config;
use crate::theme::Theme;
use anyhow::Context;
use std::path::PathBuf;

pub(crate) fn handle_config(
    config_file: Option<PathBuf>,
    show: bool,
    reset: bool,
    path: bool,
) -> anyhow::Result<()> {
    let location = match &config_file {
        Some(file) => file.clone(),
        None => Config::config_path()?,
    };

    if reset {
        Config::default()
            .save_to(&location)
            .with_context(|| format!("Failed to reset {}", location.display()))?;
        println!(
            "{} {}",
            Theme::success("Configuration reset:"),
            Theme::path(&location.display().to_string())
        );
    }

    if path {
        println!("{}", location.display());
    }

    if show || (!reset && !path) {
        let config = if location.exists() {
            load_config(config_file.as_deref())?
        } else {
            Config::default()
        };
        println!("{}", Theme::header("Current Configuration"));
        println!("{}", Theme::divider_bold(60));
        println!();
        println!(
            "File: {}{}",
            Theme::path(&location.display().to_string()),
            if location.exists() {
                ""
            } else {
                " (not created, using defaults)"
            }
        );
        println!();
        println!("Cleaning:");
        println!("  Fail fast: {}", config.cleaning.fail_fast);
        println!();
        println!("Exclusions:");
        if config.exclusions.patterns.is_empty() {
            println!("  (none)");
        } else {
            for pattern in &config.exclusions.patterns {
                println!("  {}", pattern);
            }
        }
        println!();
    }

    Ok(())
}
