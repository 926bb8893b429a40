//! Webpurge library crate
//!
//! Strips injected script and banner blocks from static web pages and removes the
//! machine-generated files and folders left next to them. The crate provides both
//! the `webpurge` CLI binary and a library API for programmatic use.
//!
//! ```no_run
//! use std::path::Path;
//! use webpurge::{CleanOptions, MemorySink, TreeCleaner};
//!
//! let cleaner = TreeCleaner::new(CleanOptions::default()).unwrap();
//! let sink = MemorySink::new();
//! let summary = cleaner.clean(Path::new("./public_html"), &sink).unwrap();
//! println!("{} page(s) cleaned", summary.pages_modified);
//! ```

pub mod classifier;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod patterns;
pub mod progress;
pub mod sanitizer;
pub mod session;
pub mod theme;
pub mod utils;

pub use cleaner::{CleanOptions, DirVerdict, ProgressState, TreeCleaner};
pub use error::CleanError;
pub use events::{CleanEvent, EventSink, LogLevel, MemorySink};
pub use output::CleanSummary;
pub use patterns::{PatternRule, PatternSet};
pub use sanitizer::{SanitizeOutcome, Sanitizer};
