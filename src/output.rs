use crate::theme::Theme;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Actions and warnings
    Verbose,     // Plus skipped files
    VeryVerbose, // Plus encoding fallbacks and per-file progress
    Json,        // Machine-readable summary only
}

/// Everything a cleaning run did, accumulated by the tree walker.
#[derive(Debug, Clone, Serialize)]
pub struct CleanSummary {
    pub root: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    /// Files counted before the walk started
    pub total_files: u64,
    /// Files visited plus suspicious files removed; may drift past `total_files`
    pub processed_files: u64,
    /// Pages decoded and stripped (or checked, in a dry run)
    pub pages_checked: u64,
    /// Pages that contained at least one injected block
    pub pages_modified: u64,
    pub blocks_removed: u64,
    pub bytes_removed: u64,
    /// Files with an unsupported extension
    pub files_skipped: u64,
    /// Pages that could not be read, decoded or written
    pub files_failed: u64,
    pub symlinks_skipped: u64,
    pub excluded_paths: u64,
    pub suspicious_files_removed: u64,
    pub suspicious_dirs_removed: u64,
    /// Listing/removal errors that were logged and skipped
    pub errors: Vec<String>,
}

impl CleanSummary {
    pub fn new(root: PathBuf, dry_run: bool, total_files: u64) -> Self {
        Self {
            root,
            dry_run,
            started_at: Local::now(),
            finished_at: None,
            total_files,
            processed_files: 0,
            pages_checked: 0,
            pages_modified: 0,
            blocks_removed: 0,
            bytes_removed: 0,
            files_skipped: 0,
            files_failed: 0,
            symlinks_skipped: 0,
            excluded_paths: 0,
            suspicious_files_removed: 0,
            suspicious_dirs_removed: 0,
            errors: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.pages_modified == 0
            && self.suspicious_files_removed == 0
            && self.suspicious_dirs_removed == 0
    }

    pub fn bytes_removed_human(&self) -> String {
        bytesize::to_string(self.bytes_removed, true)
    }
}

pub fn print_human(summary: &CleanSummary, mode: OutputMode) {
    if matches!(mode, OutputMode::Quiet | OutputMode::Json) {
        return;
    }

    let title = if summary.dry_run {
        "Webpurge Scan Results"
    } else {
        "Webpurge Clean Results"
    };
    let (modified_label, files_label, dirs_label) = if summary.dry_run {
        (
            "Infected pages",
            "Suspicious files found",
            "Suspicious folders found",
        )
    } else {
        (
            "Pages cleaned",
            "Suspicious files removed",
            "Suspicious folders removed",
        )
    };

    println!();
    println!("{}", Theme::header(title));
    println!("{}", Theme::divider_bold(60));
    println!("  {:<28}{}", "Root", Theme::path(&summary.root.display().to_string()));
    println!("  {:<28}{}", "Pages checked", Theme::value(&summary.pages_checked.to_string()));
    println!("  {:<28}{}", modified_label, Theme::value(&summary.pages_modified.to_string()));
    println!(
        "  {:<28}{} ({})",
        "Injected blocks",
        Theme::value(&summary.blocks_removed.to_string()),
        summary.bytes_removed_human()
    );
    println!(
        "  {:<28}{}",
        files_label,
        Theme::value(&summary.suspicious_files_removed.to_string())
    );
    println!(
        "  {:<28}{}",
        dirs_label,
        Theme::value(&summary.suspicious_dirs_removed.to_string())
    );

    if mode != OutputMode::Normal {
        println!("  {:<28}{}", "Unsupported files skipped", summary.files_skipped);
        println!("  {:<28}{}", "Symlinks skipped", summary.symlinks_skipped);
        println!("  {:<28}{}", "Excluded paths", summary.excluded_paths);
        println!(
            "  {:<28}{}/{}",
            "Files processed", summary.processed_files, summary.total_files
        );
    }

    if summary.files_failed > 0 {
        println!(
            "  {:<28}{}",
            "Unreadable pages",
            Theme::warning(&summary.files_failed.to_string())
        );
    }
    if !summary.errors.is_empty() {
        println!(
            "  {:<28}{}",
            "Errors",
            Theme::error(&summary.errors.len().to_string())
        );
    }

    if let Some(finished) = summary.finished_at {
        let elapsed = finished - summary.started_at;
        println!(
            "  {:<28}{}",
            "Elapsed",
            Theme::muted(&format!("{:.2}s", elapsed.num_milliseconds() as f64 / 1000.0))
        );
    }
    println!("{}", Theme::divider(60));

    if summary.is_clean() {
        println!("{}", Theme::success("No injected content found."));
    } else if summary.dry_run {
        println!(
            "{}",
            Theme::warning("Run 'webpurge clean' on this directory to remove it.")
        );
    }
}

pub fn print_json(summary: &CleanSummary) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
