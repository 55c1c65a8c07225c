//! Rules module - Rules file parsing, pattern matching and decisions

pub mod matcher;
pub mod patterns;
pub mod ruleset;
pub mod verdict;

pub use matcher::RuleMatcher;
pub use patterns::{extension_of, CaseMode, PatternKind};
pub use ruleset::{RuleCategory, RuleSet};
pub use verdict::Verdict;
