//! Signature-file format versions.

use std::fmt;

use thiserror::Error;

const HEADER_PREFIX: &str = "// Signature format:";

/// Fatal problems with the version marker of a textual source.
///
/// Raised before any entity is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Signature file is empty")]
    EmptyInput,

    #[error("Unrecognized signature format: {0}")]
    UnrecognizedVersion(String),
}

impl FormatError {
    pub fn unrecognized(marker: impl Into<String>) -> Self {
        Self::UnrecognizedVersion(marker.into())
    }
}

/// A known signature-file format version.
///
/// The version selects output conventions: how nullness is written and how
/// parameter default values are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileFormat {
    V2,
    V3,
    V4,
}

impl FileFormat {
    pub const LATEST: FileFormat = FileFormat::V4;

    /// Read the version marker from the first non-blank line of `text`.
    pub fn parse_header(text: &str) -> Result<Self, FormatError> {
        let first = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or(FormatError::EmptyInput)?;
        let version = first
            .strip_prefix(HEADER_PREFIX)
            .map(str::trim)
            .ok_or_else(|| FormatError::unrecognized(first))?;
        Self::from_version(version).ok_or_else(|| FormatError::unrecognized(first))
    }

    pub fn from_version(version: &str) -> Option<Self> {
        match version {
            "2.0" => Some(FileFormat::V2),
            "3.0" => Some(FileFormat::V3),
            "4.0" => Some(FileFormat::V4),
            _ => None,
        }
    }

    pub fn version(&self) -> &'static str {
        match self {
            FileFormat::V2 => "2.0",
            FileFormat::V3 => "3.0",
            FileFormat::V4 => "4.0",
        }
    }

    /// The header line that starts a file of this format.
    pub fn header(&self) -> String {
        format!("{} {}", HEADER_PREFIX, self.version())
    }

    /// Nullness written as `?`/`!` type suffixes rather than annotations.
    pub fn kotlin_style_nulls(&self) -> bool {
        *self >= FileFormat::V3
    }

    /// Default values written with the `optional` keyword instead of
    /// `@DefaultValue("...")`.
    pub fn concise_default_values(&self) -> bool {
        *self >= FileFormat::V4
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version())
    }
}
