//! Rules file loader
//!
//! The rules file is INI-like: `[section]` headers followed by one pattern
//! per line. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! # keep build output out of the upload
//! [exclude_folder]
//! build
//!
//! [include_extension]
//! md
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

/// One of the seven recognized rule sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleCategory {
    ExcludeFolder,
    ExcludeFile,
    ExcludeExtension,
    IncludeFolder,
    IncludeFile,
    IncludeExtension,
    IncludePathByFile,
}

impl RuleCategory {
    /// Every category, excludes first
    pub const ALL: [RuleCategory; 7] = [
        RuleCategory::ExcludeFolder,
        RuleCategory::ExcludeFile,
        RuleCategory::ExcludeExtension,
        RuleCategory::IncludeFolder,
        RuleCategory::IncludeFile,
        RuleCategory::IncludeExtension,
        RuleCategory::IncludePathByFile,
    ];

    /// Section name as written in the rules file
    pub fn section_name(self) -> &'static str {
        match self {
            RuleCategory::ExcludeFolder => "exclude_folder",
            RuleCategory::ExcludeFile => "exclude_file",
            RuleCategory::ExcludeExtension => "exclude_extension",
            RuleCategory::IncludeFolder => "include_folder",
            RuleCategory::IncludeFile => "include_file",
            RuleCategory::IncludeExtension => "include_extension",
            RuleCategory::IncludePathByFile => "include_path_by_file",
        }
    }

    /// Look up a category by its section name
    pub fn from_section(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.section_name() == name)
    }

    /// Whether a hit in this category forces inclusion
    pub fn is_include(self) -> bool {
        matches!(
            self,
            RuleCategory::IncludeFolder
                | RuleCategory::IncludeFile
                | RuleCategory::IncludeExtension
                | RuleCategory::IncludePathByFile
        )
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

/// Parsed rules file: one deduplicated pattern set per category.
///
/// Patterns are stored exactly as written (trimmed); case folding happens
/// in [`super::RuleMatcher`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    exclude_folder: BTreeSet<String>,
    exclude_file: BTreeSet<String>,
    exclude_extension: BTreeSet<String>,
    include_folder: BTreeSet<String>,
    include_file: BTreeSet<String>,
    include_extension: BTreeSet<String>,
    include_path_by_file: BTreeSet<String>,
    unknown_sections: BTreeMap<String, BTreeSet<String>>,
}

/// Section the parser is currently filling
enum Section {
    None,
    Known(RuleCategory),
    Unknown(String),
}

impl RuleSet {
    /// A rule set with every category empty, which keeps every file
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the rules file at `path`.
    ///
    /// A missing file yields an empty rule set. A file that exists but
    /// cannot be read (permissions, invalid UTF-8) is logged and also
    /// yields an empty rule set.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => {
                let rules = Self::parse(&content);
                debug!(
                    path = %path.display(),
                    patterns = rules.len(),
                    "Loaded rules file"
                );
                for section in rules.unknown_sections() {
                    debug!(section, "Ignoring unknown rules section");
                }
                rules
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No rules file, keeping every file");
                Self::empty()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read rules file, ignoring it");
                Self::empty()
            }
        }
    }

    /// Parse rules file content
    pub fn parse(content: &str) -> Self {
        let mut rules = Self::empty();
        let mut section = Section::None;

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                section = match RuleCategory::from_section(name) {
                    Some(category) => Section::Known(category),
                    None => Section::Unknown(name.to_string()),
                };
                continue;
            }

            match &section {
                Section::Known(category) => {
                    rules.patterns_mut(*category).insert(line.to_string());
                }
                Section::Unknown(name) => {
                    rules
                        .unknown_sections
                        .entry(name.clone())
                        .or_default()
                        .insert(line.to_string());
                }
                Section::None => {}
            }
        }

        rules
    }

    /// Patterns of one category
    pub fn patterns(&self, category: RuleCategory) -> &BTreeSet<String> {
        match category {
            RuleCategory::ExcludeFolder => &self.exclude_folder,
            RuleCategory::ExcludeFile => &self.exclude_file,
            RuleCategory::ExcludeExtension => &self.exclude_extension,
            RuleCategory::IncludeFolder => &self.include_folder,
            RuleCategory::IncludeFile => &self.include_file,
            RuleCategory::IncludeExtension => &self.include_extension,
            RuleCategory::IncludePathByFile => &self.include_path_by_file,
        }
    }

    fn patterns_mut(&mut self, category: RuleCategory) -> &mut BTreeSet<String> {
        match category {
            RuleCategory::ExcludeFolder => &mut self.exclude_folder,
            RuleCategory::ExcludeFile => &mut self.exclude_file,
            RuleCategory::ExcludeExtension => &mut self.exclude_extension,
            RuleCategory::IncludeFolder => &mut self.include_folder,
            RuleCategory::IncludeFile => &mut self.include_file,
            RuleCategory::IncludeExtension => &mut self.include_extension,
            RuleCategory::IncludePathByFile => &mut self.include_path_by_file,
        }
    }

    /// Return a copy of this rule set with one extra pattern.
    ///
    /// Used for implicit rules (such as `--no-dotfiles`) that are folded in
    /// before matching starts.
    pub fn with_pattern(mut self, category: RuleCategory, pattern: impl Into<String>) -> Self {
        self.patterns_mut(category).insert(pattern.into());
        self
    }

    /// Total number of patterns across recognized categories
    pub fn len(&self) -> usize {
        RuleCategory::ALL
            .iter()
            .map(|c| self.patterns(*c).len())
            .sum()
    }

    /// Whether no recognized category holds a pattern
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of sections that were present but not recognized
    pub fn unknown_sections(&self) -> impl Iterator<Item = &str> {
        self.unknown_sections.keys().map(String::as_str)
    }
}
