//! Output formatting module for CLI

pub mod json;

pub use json::JsonOutput;
