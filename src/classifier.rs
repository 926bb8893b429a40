//! Machine-generated name detection
//!
//! Injected sites tend to be littered with files and folders whose names are long
//! strings of random characters. A name is considered suspicious when it is longer
//! than [`SUSPICIOUS_NAME_MIN_LEN`] characters and contains at least one non-word
//! character: anything other than a Unicode letter (`L`), number (`N`) or `_`.
//! Combining marks and connector punctuation other than `_` are non-word
//! characters, so a decomposed (NFD) accent makes a long name suspicious.

use lazy_static::lazy_static;
use regex::Regex;
use std::ffi::OsStr;

/// Names must be strictly longer than this to be considered suspicious.
pub const SUSPICIOUS_NAME_MIN_LEN: usize = 30;

/// Directories with this exact name are always removed.
pub const DOT_S_DIR: &str = ".s";

lazy_static! {
    // Word chars are letters, numbers and `_`; the regex crate's `\w` also takes marks and `Pc`.
    static ref NON_WORD_CHAR: Regex = Regex::new(r"[^\p{L}\p{N}_]").unwrap();
}

/// Returns true if `name` looks machine-generated.
///
/// Length is measured in characters, not bytes.
pub fn is_suspicious_name(name: &str) -> bool {
    name.chars().count() > SUSPICIOUS_NAME_MIN_LEN && NON_WORD_CHAR.is_match(name)
}

/// Same as [`is_suspicious_name`] for raw file names. Non-UTF-8 names are judged
/// on their lossy conversion, where every invalid sequence becomes U+FFFD (a
/// non-word character).
pub fn is_suspicious_os_name(name: &OsStr) -> bool {
    is_suspicious_name(&name.to_string_lossy())
}

/// True for the `.s` directory name dropped by the injector.
pub fn is_dot_s_dir(name: &OsStr) -> bool {
    name == OsStr::new(DOT_S_DIR)
}
