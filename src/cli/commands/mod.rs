//! Command feature handlers.
//!
//! Each module owns one command feature.

pub mod clean_command;
pub mod config_command;
pub mod scan_command;

use crate::config::Config;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Load the config named by `--config`, or the default one.
///
/// An explicit file must parse; the default location falls back to defaults.
pub(crate) fn load_config(config_file: Option<&Path>) -> anyhow::Result<Config> {
    match config_file {
        Some(path) => Config::load_from(path),
        None => Ok(Config::load()),
    }
}

/// Resolve the tree to work on, defaulting to the current directory.
pub(crate) fn resolve_root(path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Failed to determine the current directory"),
    }
}
