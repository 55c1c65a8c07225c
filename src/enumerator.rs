//! Enumerator - ties rule loading, traversal and matching together
//!
//! ```no_run
//! use std::path::Path;
//! use uploader_enumerator::{EnumerateOptions, Enumerator};
//!
//! let result = Enumerator::new(EnumerateOptions::default())
//!     .enumerate(Path::new("/data/register"))
//!     .expect("register folder must exist");
//! for file in &result.files {
//!     println!("{file}");
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::error::{ConfigError, RootError, UploaderError};
use crate::rules::{CaseMode, RuleCategory, RuleMatcher, RuleSet};
use crate::scanner::{Candidate, Traversal, TraversalOptions, WalkReport};

/// Rules file name looked up at the root when none is configured
pub const DEFAULT_RULES_FILE: &str = ".uploaderignore";

/// Implicit `exclude_file` pattern used when dotfiles are turned off
const DOTFILES_PATTERN: &str = ".*";

/// Options for one enumeration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerateOptions {
    /// Rules file name, relative to the root
    pub rules_file: String,
    pub follow_symlinks: bool,
    pub case_mode: CaseMode,
    /// When false, files whose name starts with `.` are excluded unless an
    /// include rule keeps them
    pub dotfiles: bool,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            rules_file: DEFAULT_RULES_FILE.to_string(),
            follow_symlinks: false,
            case_mode: CaseMode::Sensitive,
            dotfiles: true,
        }
    }
}

/// Files selected for upload under a root
#[derive(Debug, Serialize)]
pub struct EnumerationResult {
    /// Absolute, symlink-resolved root
    pub root: String,
    /// Kept relative paths, sorted and deduplicated
    pub files: Vec<String>,
    #[serde(skip)]
    pub report: WalkReport,
}

pub struct Enumerator {
    options: EnumerateOptions,
}

impl Enumerator {
    pub fn new(options: EnumerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EnumerateOptions {
        &self.options
    }

    /// Resolve `root` to an absolute, symlink-free directory path
    pub fn resolve_root(root: &Path) -> Result<PathBuf, RootError> {
        let shown = root.display().to_string();

        let metadata = fs::metadata(root).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RootError::NotFound {
                path: shown.clone(),
            },
            _ => RootError::Resolve {
                path: shown.clone(),
                source: e,
            },
        })?;
        if !metadata.is_dir() {
            return Err(RootError::NotADirectory { path: shown });
        }

        fs::canonicalize(root).map_err(|e| RootError::Resolve {
            path: shown,
            source: e,
        })
    }

    /// Check that the rules file name stays at the root: a single normal
    /// path component, no absolute path and no `..`
    pub fn validate_rules_file(name: &str) -> Result<(), ConfigError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(ConfigError::InvalidRulesFile {
                name: name.to_string(),
            }),
        }
    }

    /// Enumerate the files under `root` that should be uploaded.
    ///
    /// Only an unusable root is an error. Unreadable entries are skipped and
    /// listed in [`EnumerationResult::report`].
    pub fn enumerate(&self, root: &Path) -> Result<EnumerationResult, UploaderError> {
        let root = Self::resolve_root(root)?;
        Self::validate_rules_file(&self.options.rules_file)?;
        info!(root = %root.display(), "Enumerating files");

        let mut rules = RuleSet::load(&root.join(&self.options.rules_file));
        if !self.options.dotfiles {
            rules = rules.with_pattern(RuleCategory::ExcludeFile, DOTFILES_PATTERN);
        }
        let matcher = RuleMatcher::new(&rules, self.options.case_mode);
        let rules_path = Candidate::from_relative(&self.options.rules_file).map(|c| c.rel_path);

        let mut traversal = Traversal::new(
            &root,
            TraversalOptions {
                follow_symlinks: self.options.follow_symlinks,
            },
        );
        let mut kept = BTreeSet::new();

        for candidate in traversal.by_ref() {
            let mut verdict = matcher.verdict(&candidate);
            if let Some(rules_path) = &rules_path {
                if matcher.case_mode().eq(&candidate.rel_path, rules_path) {
                    verdict = verdict.with_exclude_hit();
                }
            }

            if verdict.keep() {
                kept.insert(candidate.rel_path);
            } else {
                trace!(path = %candidate.rel_path, ?verdict, "Dropping file");
            }
        }

        let report = traversal.into_report();
        debug!(
            dirs = report.dirs_visited,
            files = report.files_found,
            symlinked_dirs_skipped = report.symlinked_dirs_skipped,
            "Traversal complete"
        );
        info!(
            kept = kept.len(),
            warnings = report.warnings.len(),
            "Enumeration complete"
        );

        let root = match root.to_str() {
            Some(root) => root.to_string(),
            None => {
                let lossy = root.to_string_lossy().into_owned();
                warn!(root = %lossy, "Root path is not valid UTF-8, reporting a lossy form");
                lossy
            }
        };

        Ok(EnumerationResult {
            root,
            files: kept.into_iter().collect(),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn files(dir: &TempDir, options: EnumerateOptions) -> Vec<String> {
        Enumerator::new(options).enumerate(dir.path()).unwrap().files
    }

    #[test]
    fn test_no_rules_keeps_everything() {
        let dir = tree(&[
            ("README.md", "readme"),
            ("src/main.py", "print('hi')"),
            ("build/artifact.o", "bin"),
            (".hidden", "secret"),
        ]);

        assert_eq!(
            files(&dir, EnumerateOptions::default()),
            vec![".hidden", "README.md", "build/artifact.o", "src/main.py"]
        );
    }

    #[test]
    fn test_rules_file_is_implicitly_excluded() {
        let dir = tree(&[
            (".uploaderignore", "[exclude_file]\nsecret.txt\n"),
            ("secret.txt", "secret"),
            ("readme.txt", "ok"),
            ("nested/.uploaderignore", "not the rules file"),
        ]);

        assert_eq!(
            files(&dir, EnumerateOptions::default()),
            vec!["nested/.uploaderignore", "readme.txt"]
        );
    }

    #[test]
    fn test_rules_file_can_be_force_included() {
        let dir = tree(&[
            (".uploaderignore", "[include_path_by_file]\n.uploaderignore\n"),
            ("a.txt", "a"),
        ]);

        assert_eq!(
            files(&dir, EnumerateOptions::default()),
            vec![".uploaderignore", "a.txt"]
        );
    }

    #[test]
    fn test_custom_rules_file_name() {
        let dir = tree(&[
            ("rules.ini", "[exclude_extension]\nlog\n"),
            (".uploaderignore", "[exclude_file]\n*\n"),
            ("app.log", "l"),
            ("keep.txt", "k"),
        ]);
        let options = EnumerateOptions {
            rules_file: "rules.ini".to_string(),
            ..Default::default()
        };

        assert_eq!(files(&dir, options), vec![".uploaderignore", "keep.txt"]);
    }

    #[test]
    fn test_rules_file_outside_root_is_rejected() {
        let dir = tree(&[("sub/a.txt", "a"), ("outside.ini", "[exclude_file]\n*\n")]);
        let root = dir.path().join("sub");
        let outside = dir.path().join("outside.ini");

        for name in ["../outside.ini", outside.to_str().unwrap(), "nested/rules.ini", "."] {
            let options = EnumerateOptions {
                rules_file: name.to_string(),
                ..Default::default()
            };
            let err = Enumerator::new(options).enumerate(&root).unwrap_err();
            assert!(
                matches!(err, UploaderError::Config(ConfigError::InvalidRulesFile { .. })),
                "{name} should be rejected"
            );
        }

        assert!(Enumerator::validate_rules_file("rules.ini").is_ok());
        assert!(Enumerator::validate_rules_file(DEFAULT_RULES_FILE).is_ok());
    }

    #[test]
    fn test_no_dotfiles_adds_overridable_exclude() {
        let dir = tree(&[
            (".uploaderignore", "[include_file]\n.keep\n"),
            (".env", "x"),
            (".keep", "x"),
            (".config/settings.json", "{}"),
            ("visible.txt", "x"),
        ]);
        let options = EnumerateOptions {
            dotfiles: false,
            ..Default::default()
        };

        assert_eq!(
            files(&dir, options),
            vec![".config/settings.json", ".keep", "visible.txt"]
        );
    }

    #[test]
    fn test_case_insensitive_mode() {
        let dir = tree(&[
            (".uploaderignore", "[exclude_folder]\ndocs\n[include_extension]\nmd\n"),
            ("Docs/README.MD", "md"),
            ("Docs/guide.txt", "txt"),
            ("src/main.py", "x"),
        ]);
        let options = EnumerateOptions {
            case_mode: CaseMode::Insensitive,
            ..Default::default()
        };

        assert_eq!(files(&dir, options), vec!["Docs/README.MD", "src/main.py"]);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = Enumerator::new(EnumerateOptions::default())
            .enumerate(&dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, UploaderError::Root(RootError::NotFound { .. })));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let dir = tree(&[("file.txt", "x")]);
        let err = Enumerator::resolve_root(&dir.path().join("file.txt")).unwrap_err();
        assert!(matches!(err, RootError::NotADirectory { .. }));
    }

    #[test]
    fn test_root_is_resolved() {
        let dir = tree(&[("sub/a.txt", "a")]);
        let result = Enumerator::new(EnumerateOptions::default())
            .enumerate(&dir.path().join("sub/../sub"))
            .unwrap();

        let expected = fs::canonicalize(dir.path().join("sub")).unwrap();
        assert_eq!(result.root, expected.to_string_lossy());
        assert_eq!(result.files, vec!["a.txt"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_root_is_reported_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let root = dir.path().join(OsStr::from_bytes(b"reg\xffister"));
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();

        let result = Enumerator::new(EnumerateOptions::default())
            .enumerate(&root)
            .unwrap();
        assert!(result.root.ends_with("reg\u{FFFD}ister"));
        assert_eq!(result.files, vec!["a.txt"]);
    }
}
