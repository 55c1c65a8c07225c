//! # CLI Module
//!
//! This module defines the command-line interface using `clap`.
//!
//! ## Submodules
//!
//! - [`commands`] - Command implementation
//! - [`exit_codes`] - Standardized exit codes
//! - [`output`] - Result formatting
//!
//! ## Option precedence
//!
//! Flags on the command line win over environment variables, which win over
//! the `--config` file, which wins over built-in defaults.
//!
//! ## Examples
//!
//! ```bash
//! # Enumerate with the default .uploaderignore
//! uploader-enumerator /data/register
//!
//! # Custom rules file, follow symlinks, case-insensitive matching
//! uploader-enumerator /data/register --rules-file rules.ini --follow-symlinks --case-insensitive
//!
//! # Write the result to a file
//! uploader-enumerator /data/register -o files.json
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Enumerate the files under a register folder that should be uploaded
#[derive(Parser, Debug)]
#[command(name = "uploader-enumerator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Register folder to enumerate
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Rules file name at the root folder [default: .uploaderignore]
    #[arg(long, env = "UPLOADER_RULES_FILE", value_name = "NAME")]
    pub rules_file: Option<String>,

    /// Follow directory symlinks during traversal
    #[arg(long, overrides_with = "no_follow_symlinks")]
    pub follow_symlinks: bool,

    /// Do not follow directory symlinks (default)
    #[arg(long, overrides_with = "follow_symlinks")]
    pub no_follow_symlinks: bool,

    /// Perform case-sensitive matching (default)
    #[arg(long, conflicts_with = "case_insensitive")]
    pub case_sensitive: bool,

    /// Perform case-insensitive matching
    #[arg(long)]
    pub case_insensitive: bool,

    /// Treat dotfiles like any other file (default)
    #[arg(long, conflicts_with = "no_dotfiles")]
    pub dotfiles: bool,

    /// Exclude dotfiles unless an include rule keeps them
    #[arg(long)]
    pub no_dotfiles: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "UPLOADER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the result on a single line
    #[arg(long)]
    pub compact: bool,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply explicit flags on top of a loaded configuration
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(rules_file) = &self.rules_file {
            config.rules_file = rules_file.clone();
        }

        if self.follow_symlinks {
            config.follow_symlinks = true;
        } else if self.no_follow_symlinks {
            config.follow_symlinks = false;
        }

        if self.case_insensitive {
            config.case_insensitive = true;
        } else if self.case_sensitive {
            config.case_insensitive = false;
        }

        if self.no_dotfiles {
            config.dotfiles = false;
        } else if self.dotfiles {
            config.dotfiles = true;
        }

        config
    }
}
