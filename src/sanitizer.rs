//! Single-file sanitizing
//!
//! Reads a page with an encoding fallback chain, strips injected markup with a
//! [`PatternSet`], and writes the result back as UTF-8. The rewrite goes through a
//! temporary file in the same directory so a failed write never truncates the page.

use crate::events::{EventSink, LogLevel};
use crate::patterns::PatternSet;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Extensions (lowercase, without the dot) of files that get sanitized.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["html", "htm", "xml"];

/// Encodings tried when reading a page, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1251,
}

impl TextEncoding {
    /// ISO-8859-1 maps every byte, so in practice Windows-1251 is never reached.
    pub const FALLBACK_ORDER: [TextEncoding; 3] = [
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Windows1251,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Windows1251 => "windows-1251",
        }
    }

    /// Strict decode: `None` if any byte sequence is invalid for this encoding.
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Windows1251 => encoding_rs::WINDOWS_1251
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}

/// Result of sanitizing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeOutcome {
    /// Decoded, stripped and (outside dry runs) written back.
    Cleaned {
        encoding: TextEncoding,
        blocks_removed: usize,
        bytes_removed: u64,
    },
    /// Extension is not on the allow-list; the file was not touched.
    Skipped,
    /// Unreadable, undecodable or unwritable; the original is left as it was.
    Failed,
}

impl SanitizeOutcome {
    pub fn modified(&self) -> bool {
        matches!(self, SanitizeOutcome::Cleaned { blocks_removed, .. } if *blocks_removed > 0)
    }
}

/// True if `path` has one of the [`SUPPORTED_EXTENSIONS`] (case-insensitive).
pub fn is_sanitizable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .map_or(false, |e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
}

/// Decode `bytes` with the first encoding in [`TextEncoding::FALLBACK_ORDER`] that
/// accepts them. Failed attempts are reported through `on_failure`.
pub fn decode_with_fallback(
    bytes: &[u8],
    mut on_failure: impl FnMut(TextEncoding),
) -> Option<(String, TextEncoding)> {
    for encoding in TextEncoding::FALLBACK_ORDER {
        match encoding.decode(bytes) {
            Some(text) => return Some((text, encoding)),
            None => on_failure(encoding),
        }
    }
    None
}

/// Replace `path` with `contents` via a temporary sibling and a rename.
pub fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".webpurge-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(path) {
        if let Err(e) = tmp.as_file().set_permissions(meta.permissions()) {
            log::debug!("could not copy permissions to {}: {}", path.display(), e);
        }
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Strips injected markup from individual files.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    patterns: PatternSet,
    dry_run: bool,
}

impl Sanitizer {
    pub fn new(patterns: PatternSet) -> Self {
        Self {
            patterns,
            dry_run: false,
        }
    }

    /// In a dry run nothing is written; outcomes describe what would change.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn sanitize(&self, path: &Path, sink: &dyn EventSink) -> SanitizeOutcome {
        if !is_sanitizable(path) {
            sink.log(
                LogLevel::Skip,
                format!("Skipping unsupported file extension: {}", path.display()),
            );
            return SanitizeOutcome::Skipped;
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                sink.log(
                    LogLevel::Warning,
                    format!("Error opening file {}: {}", path.display(), e),
                );
                return SanitizeOutcome::Failed;
            }
        };

        let decoded = decode_with_fallback(&bytes, |encoding| {
            sink.log(
                LogLevel::Trace,
                format!(
                    "Could not decode file {} with encoding {}. Trying next encoding.",
                    path.display(),
                    encoding.label()
                ),
            );
        });
        let Some((text, encoding)) = decoded else {
            sink.log(
                LogLevel::Warning,
                format!(
                    "Failed to read the file {}. It might be a binary file.",
                    path.display()
                ),
            );
            return SanitizeOutcome::Failed;
        };

        let (stripped, report) = self.patterns.strip_counted(&text);
        let blocks_removed = report.total();
        let bytes_removed = (text.len() - stripped.len()) as u64;

        if self.dry_run {
            if blocks_removed > 0 {
                sink.log(
                    LogLevel::Action,
                    format!(
                        "Would clean file: {} ({} injected block(s))",
                        path.display(),
                        blocks_removed
                    ),
                );
            } else {
                sink.log(LogLevel::Skip, format!("Checked file: {}", path.display()));
            }
            return SanitizeOutcome::Cleaned {
                encoding,
                blocks_removed,
                bytes_removed,
            };
        }

        // UTF-8 input with nothing stripped would be rewritten byte for byte.
        let unchanged = blocks_removed == 0 && encoding == TextEncoding::Utf8;
        if !unchanged {
            if let Err(e) = write_atomically(path, stripped.as_bytes()) {
                sink.log(
                    LogLevel::Error,
                    format!("Error writing to file {}: {}", path.display(), e),
                );
                return SanitizeOutcome::Failed;
            }
        }

        if blocks_removed > 0 {
            sink.log(
                LogLevel::Action,
                format!(
                    "Cleaned file: {} ({} injected block(s) removed)",
                    path.display(),
                    blocks_removed
                ),
            );
        } else {
            sink.log(LogLevel::Skip, format!("Cleaned file: {}", path.display()));
        }

        SanitizeOutcome::Cleaned {
            encoding,
            blocks_removed,
            bytes_removed,
        }
    }
}
