use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CleanError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cleaning: Cleaning,

    #[serde(default)]
    pub exclusions: Exclusions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cleaning {
    /// Abort the whole run on the first listing/removal error
    #[serde(default)]
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exclusions {
    /// Globs for paths that are never sanitized, removed or descended into
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Config {
    /// Default config file location, e.g. ~/.config/webpurge/config.toml on Linux
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "webpurge")
            .context("Could not determine the user config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load config from the default location or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Failed to load config file {}: {:#}", path.display(), e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Load config from an explicit file. Unlike [`Config::load`], errors are returned.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, toml).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply CLI option overrides. Exclusions are merged, not replaced.
    pub fn apply_cli_overrides(&mut self, fail_fast: Option<bool>, exclude: &[String]) {
        if let Some(fail_fast) = fail_fast {
            self.cleaning.fail_fast = fail_fast;
        }
        self.exclusions.patterns.extend(exclude.iter().cloned());
    }

    /// Check if a path matches any exclusion pattern
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        ExclusionMatcher::new(&self.exclusions.patterns)
            .map(|m| m.is_excluded(root, path))
            .unwrap_or(false)
    }
}

/// Compiled exclusion globs.
///
/// A path is excluded when a glob matches its path relative to the cleaning root,
/// its full path, or its bare file name.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    set: GlobSet,
    empty: bool,
}

impl Default for ExclusionMatcher {
    fn default() -> Self {
        Self {
            set: GlobSet::empty(),
            empty: true,
        }
    }
}

impl ExclusionMatcher {
    pub fn new(patterns: &[String]) -> std::result::Result<Self, CleanError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| CleanError::InvalidExclusion {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| CleanError::InvalidExclusion {
            pattern: patterns.join(", "),
            source,
        })?;

        Ok(Self {
            set,
            empty: patterns.is_empty(),
        })
    }

    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        if self.empty {
            return false;
        }
        if let Ok(relative) = path.strip_prefix(root) {
            if !relative.as_os_str().is_empty() && self.set.is_match(relative) {
                return true;
            }
        }
        if self.set.is_match(path) {
            return true;
        }
        path.file_name().map_or(false, |name| self.set.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(!config.cleaning.fail_fast);
        assert!(config.exclusions.patterns.is_empty());
    }

    #[test]
    fn test_config_parse_partial() {
        let config: Config = toml::from_str("[cleaning]\nfail_fast = true\n").unwrap();
        assert!(config.cleaning.fail_fast);
        assert!(config.exclusions.patterns.is_empty());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.exclusions.patterns.push("**/uploads/**".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_config_load_from_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "cleaning = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_config_apply_cli_overrides() {
        let mut config = Config::default();
        config.exclusions.patterns.push("*.bak".to_string());
        config.apply_cli_overrides(Some(true), &["**/media/**".to_string()]);

        assert!(config.cleaning.fail_fast);
        assert_eq!(config.exclusions.patterns, vec!["*.bak", "**/media/**"]);

        config.apply_cli_overrides(None, &[]);
        assert!(config.cleaning.fail_fast);
    }

    #[test]
    fn test_exclusion_patterns() {
        let root = Path::new("/srv/site");
        let mut config = Config::default();
        config.exclusions.patterns.push("**/important/**".to_string());
        config.exclusions.patterns.push("*.bak".to_string());
        config.exclusions.patterns.push("uploads".to_string());

        assert!(config.is_excluded(root, Path::new("/srv/site/a/important/file.html")));
        assert!(config.is_excluded(root, Path::new("/srv/site/old/index.html.bak")));
        assert!(config.is_excluded(root, Path::new("/srv/site/uploads")));
        assert!(!config.is_excluded(root, Path::new("/srv/site/other/file.html")));
    }

    #[test]
    fn test_invalid_exclusion_pattern() {
        let err = ExclusionMatcher::new(&["a[".to_string()]).unwrap_err();
        assert!(err.to_string().contains("a["));
    }

    #[test]
    fn test_empty_matcher_excludes_nothing() {
        let matcher = ExclusionMatcher::default();
        assert!(!matcher.is_excluded(Path::new("/r"), Path::new("/r/x")));
    }
}
