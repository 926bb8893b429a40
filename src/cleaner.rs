//! Recursive tree cleaning
//!
//! The walker visits a directory tree depth first. Every file is sanitized as it is
//! reached, subdirectories are cleaned before their parent is judged, and a
//! directory is removed as a whole only after its own contents were processed.
//!
//! After the entries of a directory are processed, a second pass removes loose
//! files with machine-generated names. This pass runs at every level of the tree,
//! not only at the root.

mod deletion;
mod path_precheck;

pub(crate) use path_precheck::validate_root;

use crate::classifier::{is_dot_s_dir, is_suspicious_os_name};
use crate::config::{Config, ExclusionMatcher};
use crate::error::{CleanError, Result};
use crate::events::{CleanEvent, EventSink, LogLevel};
use crate::output::CleanSummary;
use crate::patterns::PatternSet;
use crate::sanitizer::{SanitizeOutcome, Sanitizer};
use crate::utils;
use chrono::Local;
use deletion::{delete_path, DeleteOutcome};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Knobs for a cleaning run.
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Report what would change without touching the filesystem
    pub dry_run: bool,
    /// Abort on the first listing/removal error instead of logging it
    pub fail_fast: bool,
    /// Globs for paths that are left alone
    pub exclusions: Vec<String>,
}

impl CleanOptions {
    pub fn from_config(config: &Config, dry_run: bool) -> Self {
        Self {
            dry_run,
            fail_fast: config.cleaning.fail_fast,
            exclusions: config.exclusions.patterns.clone(),
        }
    }
}

/// File counters shared by the whole recursion.
///
/// `total` is counted once before the walk. Files deleted by the walk itself are
/// counted again when removed, so `processed` can end above `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub total: u64,
    pub processed: u64,
}

impl ProgressState {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            processed: 0,
        }
    }

    /// Truncated percentage, clamped to 100. An empty tree is complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (self.processed.saturating_mul(100) / self.total).min(100) as u8
    }
}

/// Outcome of judging a directory after its contents were processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirVerdict {
    /// Named `.s`, or everything left in it is machine-generated
    Remove,
    Keep,
    /// Contains an excluded path somewhere below; no ancestor may be removed
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    /// Symlinks and reparse points are never followed
    Link,
}

#[derive(Debug)]
struct Entry {
    path: PathBuf,
    name: OsString,
    kind: EntryKind,
}

/// Immediate entries of `dir`, sorted by name.
fn list_entries(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        let kind = if utils::is_link_like(&file_type, &path) {
            EntryKind::Link
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        entries.push(Entry {
            name: entry.file_name(),
            path,
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Count every non-directory entry under `root`, without following links.
pub fn count_files(root: &Path, exclusions: &ExclusionMatcher) -> u64 {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !exclusions.is_excluded(root, e.path()))
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .count() as u64
}

/// Per-run state threaded through the recursion.
struct Run<'a> {
    root: &'a Path,
    sink: &'a dyn EventSink,
    progress: ProgressState,
    summary: CleanSummary,
}

/// Walks a tree, sanitizing pages and removing machine-generated entries.
#[derive(Debug, Clone)]
pub struct TreeCleaner {
    sanitizer: Sanitizer,
    exclusions: ExclusionMatcher,
    options: CleanOptions,
}

impl TreeCleaner {
    pub fn new(options: CleanOptions) -> Result<Self> {
        let exclusions = ExclusionMatcher::new(&options.exclusions)?;
        Ok(Self {
            sanitizer: Sanitizer::default().dry_run(options.dry_run),
            exclusions,
            options,
        })
    }

    /// Replace the built-in injection patterns.
    pub fn with_patterns(mut self, patterns: PatternSet) -> Self {
        self.sanitizer = Sanitizer::new(patterns).dry_run(self.options.dry_run);
        self
    }

    /// Clean everything below `root`. The root itself is never removed.
    ///
    /// Fails if the root is unusable or cannot be listed. Errors deeper in the tree
    /// are logged and collected in the summary unless `fail_fast` is set.
    pub fn clean(&self, root: &Path, sink: &dyn EventSink) -> Result<CleanSummary> {
        validate_root(root)?;

        let total = count_files(root, &self.exclusions);
        log::debug!("{} files under {}", total, root.display());
        sink.emit(CleanEvent::Started { total_files: total });

        let mut run = Run {
            root,
            sink,
            progress: ProgressState::new(total),
            summary: CleanSummary::new(root.to_path_buf(), self.options.dry_run, total),
        };

        let verdict = self.clean_dir(root, 0, &mut run)?;
        log::debug!("root verdict {:?} (root is never removed)", verdict);

        let mut summary = run.summary;
        summary.processed_files = run.progress.processed;
        summary.finished_at = Some(Local::now());
        Ok(summary)
    }

    /// Clean `dir` and judge it. Each visited file gets a `Processed file:` line
    /// at trace level after sanitizing; the user-facing "Cleaned file" line comes
    /// from the sanitizer, so it is not repeated here.
    fn clean_dir(&self, dir: &Path, depth: usize, run: &mut Run) -> Result<DirVerdict> {
        let Some(entries) = self.list(dir, depth, run)? else {
            return Ok(DirVerdict::Keep);
        };

        let mut protected = false;
        // Removable subdirectories still on disk (dry run or failed removal)
        let mut pending_dirs: HashSet<OsString> = HashSet::new();

        for entry in entries {
            if self.exclusions.is_excluded(run.root, &entry.path) {
                run.sink.log(
                    LogLevel::Skip,
                    format!("Skipping excluded path: {}", entry.path.display()),
                );
                run.summary.excluded_paths += 1;
                protected = true;
                continue;
            }

            match entry.kind {
                EntryKind::Dir => match self.clean_dir(&entry.path, depth + 1, run)? {
                    DirVerdict::Remove => {
                        if self.remove(&entry.path, true, run)? {
                            pending_dirs.insert(entry.name);
                        }
                    }
                    DirVerdict::Keep => {}
                    DirVerdict::Protected => protected = true,
                },
                EntryKind::File => {
                    run.progress.processed += 1;
                    let outcome = self.sanitizer.sanitize(&entry.path, run.sink);
                    record_outcome(&mut run.summary, outcome);
                    run.sink.log(
                        LogLevel::Trace,
                        format!("Processed file: {}", entry.path.display()),
                    );
                    tick(run);
                }
                EntryKind::Link => {
                    run.progress.processed += 1;
                    run.sink.log(
                        LogLevel::Skip,
                        format!("Skipping symbolic link: {}", entry.path.display()),
                    );
                    run.summary.symlinks_skipped += 1;
                    tick(run);
                }
            }
        }

        let Some(remaining) = self.list(dir, depth, run)? else {
            return Ok(DirVerdict::Keep);
        };

        let mut all_suspicious = true;
        for entry in &remaining {
            if self.exclusions.is_excluded(run.root, &entry.path) {
                protected = true;
                continue;
            }
            match entry.kind {
                EntryKind::Dir => {
                    if !pending_dirs.contains(&entry.name) {
                        all_suspicious = false;
                    }
                }
                EntryKind::File | EntryKind::Link => {
                    if !is_suspicious_os_name(&entry.name) {
                        all_suspicious = false;
                        continue;
                    }
                    self.remove(&entry.path, false, run)?;
                    run.progress.processed += 1;
                    tick(run);
                }
            }
        }

        if protected {
            return Ok(DirVerdict::Protected);
        }
        let is_dot_s = dir.file_name().map_or(false, is_dot_s_dir);
        if is_dot_s || all_suspicious {
            Ok(DirVerdict::Remove)
        } else {
            Ok(DirVerdict::Keep)
        }
    }

    /// List `dir`. `None` means the error was logged and the directory should be
    /// kept; the root is never recoverable.
    fn list(&self, dir: &Path, depth: usize, run: &mut Run) -> Result<Option<Vec<Entry>>> {
        match list_entries(dir) {
            Ok(entries) => Ok(Some(entries)),
            Err(e) => {
                let err = CleanError::list_dir(dir, e);
                if depth == 0 {
                    return Err(err);
                }
                self.recover(err, run)?;
                Ok(None)
            }
        }
    }

    /// Remove a suspicious entry. Returns true if it is still on disk afterwards.
    fn remove(&self, path: &Path, is_dir: bool, run: &mut Run) -> Result<bool> {
        let what = if is_dir { "directory" } else { "file" };
        match delete_path(path, is_dir, self.options.dry_run) {
            Ok(DeleteOutcome::Deleted) => {
                run.sink.log(
                    LogLevel::Action,
                    format!("Removed suspicious {}: {}", what, path.display()),
                );
                count_removal(&mut run.summary, is_dir);
                Ok(false)
            }
            Ok(DeleteOutcome::Simulated) => {
                run.sink.log(
                    LogLevel::Action,
                    format!("Would remove suspicious {}: {}", what, path.display()),
                );
                count_removal(&mut run.summary, is_dir);
                Ok(true)
            }
            Ok(DeleteOutcome::SkippedMissing) => {
                run.sink.log(
                    LogLevel::Skip,
                    format!("Already gone: {}", path.display()),
                );
                Ok(false)
            }
            Err(e) => {
                self.recover(CleanError::remove(path, e), run)?;
                Ok(true)
            }
        }
    }

    fn recover(&self, err: CleanError, run: &mut Run) -> Result<()> {
        if self.options.fail_fast {
            return Err(err);
        }
        log::debug!("continuing after error: {}", err);
        run.sink.log(LogLevel::Error, err.to_string());
        run.summary.errors.push(err.to_string());
        Ok(())
    }
}

fn tick(run: &Run) {
    run.sink.emit(CleanEvent::Progress {
        percent: run.progress.percent(),
        processed: run.progress.processed,
        total: run.progress.total,
    });
}

fn record_outcome(summary: &mut CleanSummary, outcome: SanitizeOutcome) {
    match outcome {
        SanitizeOutcome::Cleaned {
            blocks_removed,
            bytes_removed,
            ..
        } => {
            summary.pages_checked += 1;
            if blocks_removed > 0 {
                summary.pages_modified += 1;
                summary.blocks_removed += blocks_removed as u64;
                summary.bytes_removed += bytes_removed;
            }
        }
        SanitizeOutcome::Skipped => summary.files_skipped += 1,
        SanitizeOutcome::Failed => summary.files_failed += 1,
    }
}

fn count_removal(summary: &mut CleanSummary, is_dir: bool) {
    if is_dir {
        summary.suspicious_dirs_removed += 1;
    } else {
        summary.suspicious_files_removed += 1;
    }
}

/// Clean `root` with default options.
pub fn clean(root: &Path, sink: &dyn EventSink) -> Result<CleanSummary> {
    TreeCleaner::new(CleanOptions::default())?.clean(root, sink)
}
