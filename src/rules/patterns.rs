//! Pattern classification, extension derivation and case folding

use std::borrow::Cow;

use globset::{Glob, GlobBuilder};
use tracing::warn;

/// What a glob pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// No `/` in the pattern: matched against a single name component
    Name,
    /// Contains `/`: matched against a full relative path
    Path,
}

impl PatternKind {
    pub fn classify(pattern: &str) -> Self {
        if pattern.contains('/') {
            PatternKind::Path
        } else {
            PatternKind::Name
        }
    }
}

/// Extension of a basename: the text after the final `.`.
///
/// A dotfile with no other dot yields the text after the leading dot, so
/// `.gitignore` has extension `gitignore`. Names without a dot, or ending
/// in a dot, have no extension.
pub fn extension_of(basename: &str) -> Option<&str> {
    match basename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Case handling applied at match time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    #[default]
    Sensitive,
    /// Both pattern and candidate are lowercased before comparison
    Insensitive,
}

impl CaseMode {
    pub fn from_insensitive(insensitive: bool) -> Self {
        if insensitive {
            CaseMode::Insensitive
        } else {
            CaseMode::Sensitive
        }
    }

    /// Fold a string for comparison under this mode
    pub fn fold<'a>(self, s: &'a str) -> Cow<'a, str> {
        match self {
            CaseMode::Sensitive => Cow::Borrowed(s),
            CaseMode::Insensitive => Cow::Owned(s.to_lowercase()),
        }
    }

    /// Exact string comparison under this mode
    pub fn eq(self, a: &str, b: &str) -> bool {
        self.fold(a) == self.fold(b)
    }
}

/// Compile a shell-style wildcard pattern.
///
/// Only `*`, `?` and `[...]` are special. `*` crosses `/` and `\` is a
/// literal character. A pattern that is not a valid glob is logged and
/// matched literally instead.
pub(crate) fn compile_glob(pattern: &str) -> Option<Glob> {
    match build_glob(&to_globset_syntax(pattern)) {
        Ok(glob) => Some(glob),
        Err(e) => {
            warn!(pattern, error = %e, "Invalid glob pattern, matching it literally");
            build_glob(&globset::escape(pattern)).ok()
        }
    }
}

fn build_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern)
        .literal_separator(false)
        .backslash_escape(false)
        .build()
}

/// Rewrite a shell wildcard pattern so globset reads it the same way.
///
/// Braces become literal, runs of `*` collapse to one, a `[` without a
/// closing `]` is literal, and a class opening with `^` keeps the `^` as a
/// member instead of negating.
fn to_globset_syntax(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
            }
            c @ ('{' | '}') => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            c => out.push(c),
        }
        i += 1;
    }
    out
}

/// Index of the `]` closing the class opened at `start`.
///
/// A `]` right after `[` or `[!` is a member, not the end.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars
        .get(j..)?
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

fn push_class(out: &mut String, body: &[char]) {
    let leading = if body.first() == Some(&'!') {
        0
    } else {
        body.iter().take_while(|&&c| c == '^' || c == '!').count()
    };

    if leading == 0 {
        out.push('[');
        out.extend(body);
        out.push(']');
        return;
    }

    // globset negates on a leading `^`, so leading members become
    // alternatives next to the rest of the class
    let (literals, rest) = body.split_at(leading);
    if rest.is_empty() && literals.len() == 1 {
        out.push(literals[0]);
        return;
    }
    let mut alternatives: Vec<String> = literals.iter().map(char::to_string).collect();
    if !rest.is_empty() {
        alternatives.push(format!("[{}]", rest.iter().collect::<String>()));
    }
    out.push('{');
    out.push_str(&alternatives.join(","));
    out.push('}');
}
