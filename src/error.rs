//! Error types for the uploader enumerator
//!
//! This module defines custom error types using `thiserror`. Only
//! [`RootError`] aborts an enumeration run; problems met while walking the
//! tree are reported as [`crate::scanner::ScanWarning`] instead.

use thiserror::Error;

/// Main error type for the uploader enumerator
#[derive(Error, Debug)]
pub enum UploaderError {
    /// The root folder could not be used
    #[error("{0}")]
    Root(#[from] RootError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Result output errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Errors raised while resolving the root folder
#[derive(Error, Debug)]
pub enum RootError {
    /// Root path does not exist
    #[error("register-folder '{path}' does not exist")]
    NotFound {
        /// The path as given by the caller
        path: String,
    },

    /// Root path exists but is not a directory
    #[error("register-folder '{path}' is not a directory")]
    NotADirectory {
        /// The path as given by the caller
        path: String,
    },

    /// Root path could not be made absolute or symlink-resolved
    #[error("Failed to resolve register-folder '{path}': {source}")]
    Resolve {
        /// The path as given by the caller
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors that occur while loading the optional configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the config file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Rules file name points outside the root folder
    #[error("rules file '{name}' must be a plain file name inside the register-folder")]
    InvalidRulesFile {
        /// The configured rules file name
        name: String,
    },
}

/// Errors that occur while emitting the result
#[derive(Error, Debug)]
pub enum OutputError {
    /// Failed to serialize the result
    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the output file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        /// Path to the output file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl From<toml::de::Error> for UploaderError {
    fn from(err: toml::de::Error) -> Self {
        UploaderError::Config(ConfigError::Parse(err))
    }
}

impl From<serde_json::Error> for UploaderError {
    fn from(err: serde_json::Error) -> Self {
        UploaderError::Output(OutputError::Serialize(err))
    }
}

impl UploaderError {
    /// Process exit code the CLI uses for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            UploaderError::Root(_) => crate::cli::exit_codes::INVALID_ROOT,
            UploaderError::Config(_) | UploaderError::Output(_) => crate::cli::exit_codes::ERROR,
        }
    }
}
