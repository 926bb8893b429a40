//! Background cleaning session
//!
//! The cleaner runs on a worker thread and reports through a channel. The calling
//! thread drains the channel and renders log lines and the progress bar, so the
//! terminal stays responsive while files are processed. Events are one-way: the
//! worker never waits for the renderer.

use crate::cleaner::TreeCleaner;
use crate::error::{CleanError, Result};
use crate::events::{ChannelSink, CleanEvent, LogLevel};
use crate::output::{CleanSummary, OutputMode};
use crate::progress;
use crate::theme::Theme;
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// A cleaning run in progress on a worker thread.
pub struct CleanHandle {
    events: Receiver<CleanEvent>,
    worker: JoinHandle<Result<CleanSummary>>,
}

/// Start `cleaner` on `root` in the background.
pub fn spawn(cleaner: TreeCleaner, root: PathBuf) -> CleanHandle {
    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || {
        let sink = ChannelSink::new(tx);
        cleaner.clean(&root, &sink)
    });
    CleanHandle { events: rx, worker }
}

impl CleanHandle {
    /// Feed every event to `on_event` until the worker finishes, then return its result.
    pub fn wait(self, mut on_event: impl FnMut(CleanEvent)) -> Result<CleanSummary> {
        // The iterator ends when the worker drops its sender.
        for event in self.events.iter() {
            on_event(event);
        }
        self.worker.join().map_err(|_| CleanError::WorkerPanicked)?
    }
}

/// Smallest log level shown for each output mode.
pub fn min_level(mode: OutputMode) -> LogLevel {
    match mode {
        OutputMode::Quiet | OutputMode::Json => LogLevel::Error,
        OutputMode::Normal => LogLevel::Action,
        OutputMode::Verbose => LogLevel::Skip,
        OutputMode::VeryVerbose => LogLevel::Trace,
    }
}

/// Renders cleaning events to the terminal.
pub struct TerminalRenderer {
    mode: OutputMode,
    spinner: Option<ProgressBar>,
    bar: Option<ProgressBar>,
}

impl TerminalRenderer {
    pub fn new(mode: OutputMode) -> Self {
        let spinner = if matches!(mode, OutputMode::Quiet | OutputMode::Json) {
            None
        } else {
            Some(progress::create_spinner("Counting files..."))
        };
        Self {
            mode,
            spinner,
            bar: None,
        }
    }

    pub fn handle(&mut self, event: CleanEvent) {
        match event {
            CleanEvent::Started { total_files } => {
                if let Some(spinner) = self.spinner.take() {
                    spinner.finish_and_clear();
                    self.bar = Some(progress::create_percent_bar(&format!(
                        "0/{} files",
                        total_files
                    )));
                }
            }
            CleanEvent::Progress {
                percent,
                processed,
                total,
            } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(u64::from(percent));
                    bar.set_message(format!("{}/{} files", processed, total));
                }
            }
            CleanEvent::Log { level, message } => self.print_log(level, &message),
        }
    }

    fn print_log(&self, level: LogLevel, message: &str) {
        if level < min_level(self.mode) {
            return;
        }

        let line = match level {
            LogLevel::Error => Theme::error(message),
            LogLevel::Warning => Theme::warning(message),
            LogLevel::Action => message.to_string(),
            LogLevel::Skip | LogLevel::Trace => Theme::muted(message),
        };

        // A hidden bar (no terminal) swallows println
        match (&self.bar, level) {
            (Some(bar), _) if !bar.is_hidden() => bar.println(line),
            (_, LogLevel::Error) => eprintln!("{}", line),
            (_, _) => println!("{}", line),
        }
    }

    pub fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Run `cleaner` on a worker thread while rendering its events in this thread.
pub fn run_with_terminal(
    cleaner: TreeCleaner,
    root: PathBuf,
    mode: OutputMode,
) -> Result<CleanSummary> {
    let mut renderer = TerminalRenderer::new(mode);
    let result = spawn(cleaner, root).wait(|event| renderer.handle(event));
    renderer.finish();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::CleanOptions;
    use std::fs;

    #[test]
    fn test_min_level_by_mode() {
        assert_eq!(min_level(OutputMode::Quiet), LogLevel::Error);
        assert_eq!(min_level(OutputMode::Normal), LogLevel::Action);
        assert_eq!(min_level(OutputMode::Verbose), LogLevel::Skip);
        assert_eq!(min_level(OutputMode::VeryVerbose), LogLevel::Trace);
    }

    #[test]
    fn test_background_run_delivers_events_then_summary() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join("bad.html"),
            "<script>var u_global_data = {};</script><p>ok</p>",
        )
        .unwrap();
        fs::write(temp_dir.path().join("good.html"), "<p>ok</p>").unwrap();

        let cleaner = TreeCleaner::new(CleanOptions::default()).unwrap();
        let mut events = Vec::new();
        let summary = spawn(cleaner, temp_dir.path().to_path_buf())
            .wait(|e| events.push(e))
            .unwrap();

        assert_eq!(events.first(), Some(&CleanEvent::Started { total_files: 2 }));
        assert_eq!(
            events.last(),
            Some(&CleanEvent::Progress {
                percent: 100,
                processed: 2,
                total: 2
            })
        );
        assert_eq!(summary.pages_modified, 1);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("bad.html")).unwrap(),
            "<p>ok</p>"
        );
    }

    #[test]
    fn test_background_run_reports_root_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cleaner = TreeCleaner::new(CleanOptions::default()).unwrap();
        let result = spawn(cleaner, temp_dir.path().join("missing")).wait(|_| {});
        assert!(matches!(result, Err(CleanError::RootNotFound { .. })));
    }

    #[test]
    fn test_quiet_renderer_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join(".s")).unwrap();
        fs::write(temp_dir.path().join(".s/a.js"), "x").unwrap();

        let cleaner = TreeCleaner::new(CleanOptions::default()).unwrap();
        let summary =
            run_with_terminal(cleaner, temp_dir.path().to_path_buf(), OutputMode::Quiet).unwrap();

        assert_eq!(summary.suspicious_dirs_removed, 1);
        assert!(!temp_dir.path().join(".s").exists());
    }
}
