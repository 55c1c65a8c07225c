//! Exit codes for the CLI
//!
//! # Exit Code Reference
//!
//! | Code | Constant | Meaning | Example |
//! |------|----------|---------|---------|
//! | 0 | `SUCCESS` | Success | Result printed, possibly with skipped entries |
//! | 1 | `ERROR` | Runtime error | Unreadable config file, output not writable |
//! | 2 | `INVALID_ROOT` | Invalid register folder | Root missing or not a directory |
//!
//! Argument parsing errors are reported by clap with its own exit status.

/// Enumeration completed and the result was written.
///
/// Entries skipped with a warning do not change the exit code.
pub const SUCCESS: i32 = 0;

/// Runtime error (config file, serialization, output file).
pub const ERROR: i32 = 1;

/// The register folder does not exist or is not a directory.
pub const INVALID_ROOT: i32 = 2;
