//! Non-fatal problems found while building a codebase.
//!
//! Every diagnostic is attributed to a [`Location`]; synthesized entities
//! report [`Location::Unknown`].

use std::fmt;
use std::sync::Arc;

use crate::base::{FileId, Location};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        })
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: Location,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(location: Location, message: impl Into<Arc<str>>) -> Self {
        Self {
            location,
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(location: Location, message: impl Into<Arc<str>>) -> Self {
        Self {
            location,
            severity: Severity::Warning,
            code: None,
            message: message.into(),
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(
                f,
                "{}: {}[{}]: {}",
                self.location, self.severity, code, self.message
            ),
            None => write!(f, "{}: {}: {}", self.location, self.severity, self.message),
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Error Code Ranges
///
/// - **E0001-E0099**: Resolution and declaration errors
/// - **W0001-W0099**: Warnings
pub mod codes {
    /// Super-class reference does not resolve.
    pub const UNRESOLVED_SUPER_CLASS: &str = "E0001";
    /// Interface reference does not resolve.
    pub const UNRESOLVED_INTERFACE: &str = "E0002";
    /// Declaration is malformed and was skipped.
    pub const MALFORMED_DECLARATION: &str = "E0003";
    /// Class is on a super-class cycle.
    pub const CIRCULAR_INHERITANCE: &str = "E0004";
    /// Syntax error reported by the textual front-end.
    pub const SYNTAX_ERROR: &str = "E0005";

    /// Hierarchy walk stopped at the depth cap.
    pub const DEPTH_LIMIT: &str = "W0001";
    /// Inner class whose outer class is not declared anywhere.
    pub const ORPHAN_INNER_CLASS: &str = "W0002";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while a codebase is built and queried.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic. Errors and warnings are also logged.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity != Severity::Info {
            tracing::warn!("{}", diagnostic);
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn unresolved_super_class(&mut self, location: Location, class: &str, name: &str) {
        self.add(
            Diagnostic::error(
                location,
                format!("unresolved super-class '{}' of '{}'", name, class),
            )
            .with_code(codes::UNRESOLVED_SUPER_CLASS),
        );
    }

    pub fn unresolved_interface(&mut self, location: Location, class: &str, name: &str) {
        self.add(
            Diagnostic::error(
                location,
                format!("unresolved interface '{}' of '{}'", name, class),
            )
            .with_code(codes::UNRESOLVED_INTERFACE),
        );
    }

    pub fn malformed_declaration(&mut self, location: Location, name: &str, reason: &str) {
        self.add(
            Diagnostic::error(
                location,
                format!("malformed declaration '{}': {}", name, reason),
            )
            .with_code(codes::MALFORMED_DECLARATION),
        );
    }

    pub fn circular_inheritance(&mut self, location: Location, class: &str) {
        self.add(
            Diagnostic::error(
                location,
                format!("'{}' inherits from itself", class),
            )
            .with_code(codes::CIRCULAR_INHERITANCE),
        );
    }

    pub fn syntax_error(&mut self, location: Location, message: &str) {
        self.add(Diagnostic::error(location, message).with_code(codes::SYNTAX_ERROR));
    }

    pub fn depth_limit(&mut self, location: Location, class: &str, limit: usize) {
        self.add(
            Diagnostic::warning(
                location,
                format!(
                    "hierarchy of '{}' is deeper than {} levels; walk truncated",
                    class, limit
                ),
            )
            .with_code(codes::DEPTH_LIMIT),
        );
    }

    pub fn orphan_inner_class(&mut self, location: Location, class: &str, outer: &str) {
        self.add(
            Diagnostic::warning(
                location,
                format!("outer class '{}' of '{}' is not declared", outer, class),
            )
            .with_code(codes::ORPHAN_INNER_CLASS),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics for a specific file.
    pub fn diagnostics_for_file(&self, file: FileId) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.location.file() == Some(file))
            .collect()
    }

    /// Get diagnostics carrying `code`.
    pub fn with_code(&self, code: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.code() == Some(code))
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
