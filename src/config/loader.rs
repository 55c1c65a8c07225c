//! Configuration loader
//!
//! An optional TOML file supplies defaults for the enumeration options.
//! Every key may be omitted:
//!
//! ```toml
//! rules_file = ".uploaderignore"
//! follow_symlinks = false
//! case_insensitive = false
//! dotfiles = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::enumerator::{EnumerateOptions, DEFAULT_RULES_FILE};
use crate::error::{ConfigError, UploaderError};
use crate::rules::CaseMode;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Rules file name at the root folder
    #[serde(default = "default_rules_file")]
    pub rules_file: String,

    /// Descend into symlinked directories
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Lowercase patterns and paths before matching
    #[serde(default)]
    pub case_insensitive: bool,

    /// Keep dotfiles unless a rule says otherwise
    #[serde(default = "default_true")]
    pub dotfiles: bool,
}

fn default_rules_file() -> String {
    DEFAULT_RULES_FILE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_file: default_rules_file(),
            follow_symlinks: false,
            case_insensitive: false,
            dotfiles: true,
        }
    }
}

impl Config {
    /// Load configuration from `path` if given, otherwise return defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, UploaderError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, UploaderError> {
        let content = fs::read_to_string(path).map_err(|e| {
            UploaderError::Config(ConfigError::FileRead {
                path: path.display().to_string(),
                source: e,
            })
        })?;

        toml::from_str(&content).map_err(Into::into)
    }

    /// Options for one enumeration run
    pub fn to_options(&self) -> EnumerateOptions {
        EnumerateOptions {
            rules_file: self.rules_file.clone(),
            follow_symlinks: self.follow_symlinks,
            case_mode: CaseMode::from_insensitive(self.case_insensitive),
            dotfiles: self.dotfiles,
        }
    }
}
