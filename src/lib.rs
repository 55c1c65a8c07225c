//! Uploader Enumerator Library
//!
//! This crate decides which files under a register folder are upload
//! candidates. A single INI-like rules file at the root lists include and
//! exclude patterns; an include match always wins over an exclude match, and
//! files matched by neither are kept.

pub mod cli;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod rules;
pub mod scanner;

pub use enumerator::{EnumerateOptions, EnumerationResult, Enumerator, DEFAULT_RULES_FILE};
pub use error::UploaderError;
pub use rules::{CaseMode, RuleMatcher, RuleSet, Verdict};
pub use scanner::{Candidate, ScanWarning, Traversal, TraversalOptions, WalkReport};
