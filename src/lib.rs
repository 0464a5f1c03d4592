//! # apimodel-base
//!
//! Core library for extracting, resolving and querying the public API
//! surface of a library.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Signature files on disk, FileSet, SignatureSet
//!   ↓
//! model     → Registry, two-phase GraphBuilder, override resolver, comparators
//!   ↓
//! parser    → Logos lexer, format header, signature-file reader
//!   ↓
//! syntax    → Declaration records, TypeRef, modifiers, front-end traits
//!   ↓
//! config    → SurfaceConfig
//!   ↓
//! base      → Primitives (FileId, Location, LineIndex, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → config → syntax → parser → model → project)
// ============================================================================

/// Foundation types: FileId, Location, TextRange
pub mod base;

/// Session configuration
pub mod config;

/// Declarations supplied by a front-end, and the traits front-ends implement
pub mod syntax;

/// Textual backend: signature-file reader
pub mod parser;

/// API surface model: registry, graph builder, override resolution
pub mod model;

/// Loading signature files from disk
pub mod project;

// Re-export foundation types
pub use base::{FileId, LineCol, LineIndex, Location, Position, Span, TextRange, TextSize};

pub use config::SurfaceConfig;
pub use model::{ClassId, Codebase, GraphBuilder, MethodId, MethodOrder, PackageId, Session};
pub use parser::{FileFormat, FormatError, SignatureFile};
pub use syntax::{ClassDecl, ClassResolver, Classpath, DeclarationSource, SourceSet};
