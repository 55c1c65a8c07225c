//! Decision resolver

/// Outcome of matching one candidate: include wins, default is keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verdict {
    pub include_hit: bool,
    pub exclude_hit: bool,
}

impl Verdict {
    pub fn new(include_hit: bool, exclude_hit: bool) -> Self {
        Self {
            include_hit,
            exclude_hit,
        }
    }

    /// Same verdict with an exclude hit forced on
    pub fn with_exclude_hit(self) -> Self {
        Self {
            exclude_hit: true,
            ..self
        }
    }

    pub fn keep(self) -> bool {
        self.include_hit || !self.exclude_hit
    }
}
