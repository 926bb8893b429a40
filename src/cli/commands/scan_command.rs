//! Scan command feature.
//!
//! This module owns and handles the "webpurge scan" command behavior: a dry run
//! of clean that reports what would change and never touches the tree.

use super::{load_config, resolve_root};
use crate::cleaner::{CleanOptions, TreeCleaner};
use crate::output::{self, OutputMode};
use crate::session;
use std::path::PathBuf;

pub(crate) fn handle_scan(
    path: Option<PathBuf>,
    config_file: Option<PathBuf>,
    json: bool,
    exclude: Vec<String>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let root = resolve_root(path)?;
    let mut config = load_config(config_file.as_deref())?;
    config.apply_cli_overrides(None, &exclude);

    let cleaner = TreeCleaner::new(CleanOptions::from_config(&config, true))?;
    let mode = if json { OutputMode::Json } else { mode };
    let summary = session::run_with_terminal(cleaner, root, mode)?;

    if json {
        output::print_json(&summary)?;
    } else {
        output::print_human(&summary, mode);
    }

    Ok(())
}
