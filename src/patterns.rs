//! Injected markup patterns
//!
//! A [`PatternSet`] is an ordered list of [`PatternRule`]s. Each rule deletes every
//! non-overlapping match from the text, and the output of one rule is the input of
//! the next. This is a heuristic filter, not an HTML parser: obfuscated injections
//! slip through, and legitimate blocks containing a marker string are removed too.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

/// Markers that identify an injected `<script>` block.
pub const SCRIPT_MARKERS: &[&str] = &[
    "u_global_data",
    "adbetnetshowed=1",
    "utarget",
    "yadro",
    "s200.ucoz.net",
    "www.ucoz.ru",
];

/// Marker that identifies an injected centered `<div>` banner.
pub const DIV_MARKER: &str = "s200.ucoz.net";

lazy_static! {
    static ref DEFAULT_RULES: Vec<PatternRule> = vec![
        PatternRule::new(
            "injected-script",
            &format!(
                r"(?s)<script.*?({}).*?</script>",
                SCRIPT_MARKERS
                    .iter()
                    .map(|m| regex::escape(m))
                    .collect::<Vec<_>>()
                    .join("|")
            ),
        )
        .unwrap(),
        PatternRule::new(
            "injected-banner",
            &format!(
                r#"(?s)<div align="center">.*?{}.*?</div>"#,
                regex::escape(DIV_MARKER)
            ),
        )
        .unwrap(),
    ];
}

/// A named deletion rule over multi-line text.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
}

impl PatternRule {
    pub fn new(name: &str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            regex: Regex::new(pattern)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delete every match, returning the new text and the number of matches removed.
    pub fn apply<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        let count = self.regex.find_iter(text).count();
        if count == 0 {
            return (Cow::Borrowed(text), 0);
        }
        (self.regex.replace_all(text, ""), count)
    }
}

/// Per-rule match counts from [`PatternSet::strip_counted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StripReport {
    pub matches: Vec<(String, usize)>,
}

impl StripReport {
    pub fn total(&self) -> usize {
        self.matches.iter().map(|(_, n)| n).sum()
    }
}

/// Ordered collection of [`PatternRule`]s.
#[derive(Debug, Clone)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl Default for PatternSet {
    /// The built-in rules for the ucoz/yadro ad injections.
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl PatternSet {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Apply every rule in order.
    pub fn strip<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.strip_counted(text).0
    }

    /// Apply every rule in order and report how many blocks each one removed.
    pub fn strip_counted<'t>(&self, text: &'t str) -> (Cow<'t, str>, StripReport) {
        let mut report = StripReport::default();
        let mut current: Cow<'t, str> = Cow::Borrowed(text);

        for rule in &self.rules {
            let count;
            current = match current {
                Cow::Borrowed(s) => {
                    let (out, n) = rule.apply(s);
                    count = n;
                    out
                }
                Cow::Owned(s) => {
                    let replaced = match rule.apply(&s) {
                        (Cow::Owned(out), n) => Some((out, n)),
                        (Cow::Borrowed(_), _) => None,
                    };
                    match replaced {
                        Some((out, n)) => {
                            count = n;
                            Cow::Owned(out)
                        }
                        None => {
                            count = 0;
                            Cow::Owned(s)
                        }
                    }
                }
            };
            report.matches.push((rule.name().to_string(), count));
        }

        (current, report)
    }
}
