//! CLI commands module

pub mod enumerate;
