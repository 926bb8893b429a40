//! Clean command feature.
//!
//! This module owns and handles the "webpurge clean" command behavior.

use super::{load_config, resolve_root};
use crate::cleaner::{validate_root, CleanOptions, TreeCleaner};
use crate::cli::read_line_from_stdin;
use crate::output::{self, OutputMode};
use crate::session;
use crate::theme::Theme;
use std::path::PathBuf;

pub(crate) const BACKUP_WARNING: &str = "Before starting the cleaning process, make sure to \
    back up your files to prevent unintended data loss.";
pub(crate) const CONFIRM_PROMPT: &str =
    "Cleaning will permanently delete files. Are you sure you want to proceed? [yes/no]: ";

/// `true` for an affirmative answer to the confirmation prompt.
pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub(crate) fn handle_clean(
    path: Option<PathBuf>,
    config_file: Option<PathBuf>,
    yes: bool,
    json: bool,
    fail_fast: bool,
    exclude: Vec<String>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let root = resolve_root(path)?;
    let mut config = load_config(config_file.as_deref())?;
    config.apply_cli_overrides(fail_fast.then_some(true), &exclude);

    let cleaner = TreeCleaner::new(CleanOptions::from_config(&config, false))?;
    validate_root(&root)?;

    let mode = if json { OutputMode::Json } else { mode };

    if !yes {
        if json {
            anyhow::bail!("Refusing to prompt for confirmation in JSON mode; pass --yes");
        }

        println!("{}", Theme::warning(BACKUP_WARNING));
        println!("Target: {}", Theme::path(&root.display().to_string()));
        print!("{}", CONFIRM_PROMPT);
        let answer = match read_line_from_stdin() {
            Ok(line) => line,
            Err(_) => {
                // No usable stdin counts as "no"
                println!("\nCancelled (failed to read input).");
                return Ok(());
            }
        };
        if !is_affirmative(&answer) {
            println!("Cancelled.");
            return Ok(());
        }
    }

    log::debug!(
        "Cleaning {} (fail_fast={}, {} exclusion(s))",
        root.display(),
        config.cleaning.fail_fast,
        config.exclusions.patterns.len()
    );
    let summary = session::run_with_terminal(cleaner, root, mode)?;

    if json {
        output::print_json(&summary)?;
    } else {
        output::print_human(&summary, mode);
    }

    Ok(())
}
