//! Scanner module - Directory traversal and candidate construction

mod candidate;
mod filesystem;

pub use candidate::Candidate;
pub use filesystem::{ScanWarning, Traversal, TraversalOptions, WalkReport};
