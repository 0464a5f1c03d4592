//! Foundation types for the API surface model.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Interned file identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for declarations
//! - [`Location`] - Where a declaration came from, or "unknown location"
//!
//! This module has NO dependencies on other apimodel modules.

mod file_id;
mod location;
mod position;
mod span;

pub use file_id::FileId;
pub use location::Location;
pub use position::{Position, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
