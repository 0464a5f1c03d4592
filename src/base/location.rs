use std::fmt;

use super::{FileId, Span};

/// Where a declaration or diagnostic originates.
///
/// Synthesized entities (auto-created parent packages, type-parameter
/// pseudo-classes without a declaration) use [`Location::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Location {
    #[default]
    Unknown,
    Source { file: FileId, span: Span },
}

impl Location {
    pub fn new(file: FileId, span: Span) -> Self {
        Location::Source { file, span }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Location::Unknown)
    }

    pub fn file(&self) -> Option<FileId> {
        match self {
            Location::Source { file, .. } => Some(*file),
            Location::Unknown => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Location::Source { span, .. } => Some(*span),
            Location::Unknown => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => f.write_str("unknown location"),
            Location::Source { file, span } => write!(f, "{}:{}", file, span.start),
        }
    }
}
