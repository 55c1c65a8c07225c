//! File system traversal
//!
//! Walks the root with `walkdir` and yields every non-directory entry as a
//! [`Candidate`]. Nothing is pruned here: excluded folders are still
//! descended into because an include rule may keep a file inside them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use super::Candidate;

/// Options for the directory walk
#[derive(Debug, Clone, Copy, Default)]
pub struct TraversalOptions {
    /// Descend into symlinked directories
    pub follow_symlinks: bool,
}

/// An entry or subtree that was left out of the walk
#[derive(Error, Debug)]
pub enum ScanWarning {
    /// A directory could not be listed; its subtree is skipped
    #[error("Skipping unreadable directory '{}': {source}", path.display())]
    UnreadableDirectory {
        path: PathBuf,
        source: io::Error,
    },

    /// An entry could not be accessed
    #[error("Skipping '{}': {source}", path.display())]
    Inaccessible {
        path: PathBuf,
        source: io::Error,
    },

    /// A path component is not valid UTF-8
    #[error("Skipping '{}': file name is not valid UTF-8", path.display())]
    NonUtf8Name { path: PathBuf },

    /// A followed symlink points back to one of its ancestors
    #[error("Skipping '{}': symlink loop back to '{}'", path.display(), ancestor.display())]
    SymlinkLoop { path: PathBuf, ancestor: PathBuf },
}

impl ScanWarning {
    /// Path of the skipped entry
    pub fn path(&self) -> &Path {
        match self {
            ScanWarning::UnreadableDirectory { path, .. }
            | ScanWarning::Inaccessible { path, .. }
            | ScanWarning::NonUtf8Name { path }
            | ScanWarning::SymlinkLoop { path, .. } => path,
        }
    }
}

/// Statistics collected during a walk
#[derive(Debug, Default)]
pub struct WalkReport {
    pub dirs_visited: usize,
    pub files_found: usize,
    pub symlinked_dirs_skipped: usize,
    pub warnings: Vec<ScanWarning>,
}

/// Iterative walk over a root directory, yielding one [`Candidate`] per file.
///
/// Recoverable problems are logged, recorded in the [`WalkReport`] and
/// skipped; iteration never stops early because of them.
pub struct Traversal {
    root: PathBuf,
    options: TraversalOptions,
    entries: walkdir::IntoIter,
    report: WalkReport,
}

impl Traversal {
    pub fn new(root: &Path, options: TraversalOptions) -> Self {
        let entries = WalkDir::new(root)
            .follow_links(options.follow_symlinks)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        Self {
            root: root.to_path_buf(),
            options,
            entries,
            report: WalkReport::default(),
        }
    }

    pub fn report(&self) -> &WalkReport {
        &self.report
    }

    pub fn into_report(self) -> WalkReport {
        self.report
    }

    fn visit(&mut self, entry: DirEntry) -> Option<Candidate> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            self.report.dirs_visited += 1;
            trace!(path = %entry.path().display(), "Entering directory");
            return None;
        }

        // Only seen when links are not followed
        if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_dir() => {
                    self.report.symlinked_dirs_skipped += 1;
                    debug!(path = %entry.path().display(), "Not following directory symlink");
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(path = %entry.path().display(), error = %e, "Keeping unresolvable symlink as a file");
                }
            }
        }

        self.candidate(entry.path())
    }

    fn recover(&mut self, err: walkdir::Error) -> Option<Candidate> {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        if let Some(ancestor) = err.loop_ancestor() {
            let ancestor = ancestor.to_path_buf();
            self.warn(ScanWarning::SymlinkLoop { path, ancestor });
            return None;
        }

        // A broken link met while following links still counts as a file
        if self.options.follow_symlinks && is_broken_symlink(&path) {
            debug!(path = %path.display(), "Keeping unresolvable symlink as a file");
            return self.candidate(&path);
        }

        let source = io::Error::from(err);
        let warning = if fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false) {
            ScanWarning::UnreadableDirectory { path, source }
        } else {
            ScanWarning::Inaccessible { path, source }
        };
        self.warn(warning);
        None
    }

    fn candidate(&mut self, path: &Path) -> Option<Candidate> {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        match Candidate::from_path(rel) {
            Some(candidate) => {
                self.report.files_found += 1;
                Some(candidate)
            }
            None => {
                self.warn(ScanWarning::NonUtf8Name {
                    path: path.to_path_buf(),
                });
                None
            }
        }
    }

    fn warn(&mut self, warning: ScanWarning) {
        warn!(path = %warning.path().display(), "{}", warning);
        self.report.warnings.push(warning);
    }
}

impl Iterator for Traversal {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            let candidate = match self.entries.next()? {
                Ok(entry) => self.visit(entry),
                Err(err) => self.recover(err),
            };
            if candidate.is_some() {
                return candidate;
            }
        }
    }
}

fn is_broken_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
        && fs::metadata(path).is_err()
}
