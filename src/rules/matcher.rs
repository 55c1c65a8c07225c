//! Rule matcher - evaluates one candidate against a rule set

use std::collections::{BTreeSet, HashSet};

use globset::{GlobSet, GlobSetBuilder};
use tracing::warn;

use super::patterns::{compile_glob, CaseMode, PatternKind};
use super::ruleset::{RuleCategory, RuleSet};
use super::verdict::Verdict;
use crate::scanner::Candidate;

/// Compiled glob patterns of one category, split by [`PatternKind`]
struct GlobRules {
    names: GlobSet,
    paths: GlobSet,
}

impl GlobRules {
    fn compile(category: RuleCategory, patterns: &BTreeSet<String>, case: CaseMode) -> Self {
        let mut names = GlobSetBuilder::new();
        let mut paths = GlobSetBuilder::new();

        for pattern in patterns {
            let folded = case.fold(pattern);
            let Some(glob) = compile_glob(&folded) else {
                continue;
            };
            match PatternKind::classify(&folded) {
                PatternKind::Name => names.add(glob),
                PatternKind::Path => paths.add(glob),
            };
        }

        Self {
            names: build_set(category, names),
            paths: build_set(category, paths),
        }
    }

    /// Name-globs against the basename, path-globs against the full path
    fn matches_file(&self, basename: &str, rel_path: &str) -> bool {
        self.names.is_match(basename) || self.paths.is_match(rel_path)
    }

    /// Name-globs against any ancestor name, path-globs against any
    /// ancestor prefix path
    fn matches_folder(&self, candidate: &Candidate, case: CaseMode) -> bool {
        if !self.names.is_empty()
            && candidate
                .ancestors
                .iter()
                .any(|name| self.names.is_match(&*case.fold(name)))
        {
            return true;
        }
        if self.paths.is_empty() {
            return false;
        }
        candidate
            .ancestor_paths()
            .any(|prefix| self.paths.is_match(&*case.fold(prefix)))
    }
}

fn build_set(category: RuleCategory, builder: GlobSetBuilder) -> GlobSet {
    builder.build().unwrap_or_else(|e| {
        warn!(%category, error = %e, "Failed to build glob set, category disabled");
        GlobSet::empty()
    })
}

fn fold_all(patterns: &BTreeSet<String>, case: CaseMode) -> HashSet<String> {
    patterns.iter().map(|p| case.fold(p).into_owned()).collect()
}

/// Answers "does any include rule match" and "does any exclude rule match"
/// for a candidate.
///
/// Patterns are folded once at construction; candidates are folded per
/// call with the same [`CaseMode`].
pub struct RuleMatcher {
    case: CaseMode,
    include_path_by_file: HashSet<String>,
    include_file: GlobRules,
    include_folder: GlobRules,
    include_extension: HashSet<String>,
    exclude_file: GlobRules,
    exclude_folder: GlobRules,
    exclude_extension: HashSet<String>,
}

impl RuleMatcher {
    pub fn new(rules: &RuleSet, case: CaseMode) -> Self {
        let globs = |category| GlobRules::compile(category, rules.patterns(category), case);
        let exact = |category| fold_all(rules.patterns(category), case);

        Self {
            case,
            include_path_by_file: exact(RuleCategory::IncludePathByFile),
            include_file: globs(RuleCategory::IncludeFile),
            include_folder: globs(RuleCategory::IncludeFolder),
            include_extension: exact(RuleCategory::IncludeExtension),
            exclude_file: globs(RuleCategory::ExcludeFile),
            exclude_folder: globs(RuleCategory::ExcludeFolder),
            exclude_extension: exact(RuleCategory::ExcludeExtension),
        }
    }

    pub fn case_mode(&self) -> CaseMode {
        self.case
    }

    /// True if any include category matches the candidate
    pub fn include_hit(&self, candidate: &Candidate) -> bool {
        let rel_path = self.case.fold(&candidate.rel_path);
        let basename = self.case.fold(&candidate.basename);

        self.include_path_by_file.contains(&*rel_path)
            || self.include_file.matches_file(&basename, &rel_path)
            || self.include_folder.matches_folder(candidate, self.case)
            || self.extension_in(&self.include_extension, candidate)
    }

    /// True if any exclude category matches the candidate
    pub fn exclude_hit(&self, candidate: &Candidate) -> bool {
        let rel_path = self.case.fold(&candidate.rel_path);
        let basename = self.case.fold(&candidate.basename);

        self.exclude_file.matches_file(&basename, &rel_path)
            || self.exclude_folder.matches_folder(candidate, self.case)
            || self.extension_in(&self.exclude_extension, candidate)
    }

    pub fn verdict(&self, candidate: &Candidate) -> Verdict {
        Verdict::new(self.include_hit(candidate), self.exclude_hit(candidate))
    }

    fn extension_in(&self, extensions: &HashSet<String>, candidate: &Candidate) -> bool {
        match &candidate.extension {
            Some(ext) => extensions.contains(&*self.case.fold(ext)),
            None => false,
        }
    }
}
