//! Upload candidates produced by the traversal

use std::path::{Component, Path};

use crate::rules::extension_of;

/// A file found under the root, with its path in normalized form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path relative to root, `/`-separated, no leading `./`
    pub rel_path: String,
    /// Final path component
    pub basename: String,
    /// Directory names from root down to the parent
    pub ancestors: Vec<String>,
    /// Derived extension, see [`extension_of`]
    pub extension: Option<String>,
}

impl Candidate {
    /// Build a candidate from a relative filesystem path.
    ///
    /// Returns `None` when a component is not valid UTF-8 or the path has
    /// no file name.
    pub fn from_path(rel: &Path) -> Option<Self> {
        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(name) => parts.push(name.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Self::from_parts(parts)
    }

    /// Build a candidate from a `/`-separated relative path string
    pub fn from_relative(rel: &str) -> Option<Self> {
        let parts = rel
            .split('/')
            .filter(|p| !p.is_empty() && *p != ".")
            .map(str::to_string)
            .collect();
        Self::from_parts(parts)
    }

    fn from_parts(mut parts: Vec<String>) -> Option<Self> {
        let basename = parts.pop()?;
        let rel_path = if parts.is_empty() {
            basename.clone()
        } else {
            format!("{}/{}", parts.join("/"), basename)
        };
        let extension = extension_of(&basename).map(str::to_string);

        Some(Self {
            rel_path,
            basename,
            ancestors: parts,
            extension,
        })
    }

    /// Relative paths of every ancestor directory, shortest first.
    ///
    /// For `a/b/c.txt` this yields `a` then `a/b`.
    pub fn ancestor_paths(&self) -> impl Iterator<Item = &str> {
        self.rel_path
            .match_indices('/')
            .map(move |(i, _)| &self.rel_path[..i])
    }
}
