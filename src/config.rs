//! Run configuration.
//!
//! Settings can come from a TOML file passed with `--config` and from
//! command-line flags. Every key is optional; a run with neither uses the
//! built-in assets, the stock footer and no exclusions.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Downloads"           # Title of the top-level page (default: "/")
//! footer = "<p>Mirror</p>"      # Footer HTML for every page (default: stock footer)
//! ignore = ["site/private"]     # Paths left out of every listing
//! ignore_hidden = false         # Leave out names starting with "."
//! assets_dir = "theme"          # Templates and icons to use instead of the built-ins
//! ```
//!
//! ## Precedence
//!
//! Flags win over the file for scalar settings. `--ignore` adds to the file's
//! `ignore` list, and `--ignore-hidden` can switch exclusion on but not off.
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for one indexing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Title of the top-level page. Other pages are titled by their path.
    pub title: Option<String>,
    /// Footer HTML for every page, replacing the stock footer.
    pub footer: Option<String>,
    /// Paths left out of every listing, matched exactly.
    pub ignore: Vec<PathBuf>,
    /// Leave out names starting with `.`.
    pub ignore_hidden: bool,
    /// Directory with templates and icons replacing the built-in ones.
    pub assets_dir: Option<PathBuf>,
}

/// Values given on the command line, layered over an [`IndexConfig`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub title: Option<String>,
    pub footer: Option<String>,
    pub ignore: Vec<PathBuf>,
    pub ignore_hidden: bool,
    pub assets_dir: Option<PathBuf>,
}

impl IndexConfig {
    /// Reject values that would produce broken pages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if self.footer.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::Validation("footer must not be empty".into()));
        }
        if self.ignore.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Validation(
                "ignore entries must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line values on top of this config, then re-validate.
    pub fn with_overrides(mut self, overrides: Overrides) -> Result<Self, ConfigError> {
        if overrides.title.is_some() {
            self.title = overrides.title;
        }
        if overrides.footer.is_some() {
            self.footer = overrides.footer;
        }
        if overrides.assets_dir.is_some() {
            self.assets_dir = overrides.assets_dir;
        }
        self.ignore.extend(overrides.ignore);
        self.ignore_hidden |= overrides.ignore_hidden;
        self.validate()?;
        Ok(self)
    }
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<IndexConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: IndexConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config with every key and its default.
///
/// Used by the `--gen-config` flag.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-index configuration
# ==========================
# All settings are optional. Pass this file with --config.
# Command-line flags override the values here; --ignore adds to the list.
# Unknown keys will cause an error.

# Title of the top-level page. Other pages are titled by their path
# from the indexed directory ("/docs/api"). Default: "/".
# title = "Downloads"

# Footer HTML for every page. Default: the built-in footer naming the
# simple-index version.
# footer = "<p>Served from the mirror.</p>"

# Paths left out of every listing. A path is matched exactly against each
# entry as the walk reaches it, so spell it relative to the same directory
# you pass the root from (or use absolute paths for both).
ignore = []

# Leave out files and directories whose name starts with ".".
ignore_hidden = false

# Directory with index.template.html, file.template.html,
# footer.template.html, icons.toml and images/ to use instead of the
# built-in look.
# assets_dir = "theme"
"##
}
