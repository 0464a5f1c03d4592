//! Front-end capability traits and the live declaration set.
//!
//! The graph builder consumes two things from a front-end:
//!
//! - a [`DeclarationSource`]: the stream of top-level declarations that make
//!   up the primary surface, and
//! - a [`ClassResolver`]: a callback resolving a qualified name to a
//!   declaration, used to close over classpath classes.
//!
//! [`SourceSet`] is the live backend; the textual backend lives in
//! [`crate::parser`].

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::decl::{ClassDecl, Origin, PackageDecl};
use crate::base::Location;
use crate::parser::FileFormat;

/// A syntax-level problem found by a front-end. The offending declaration
/// has already been skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub location: Location,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Supplies the primary declarations of a session.
pub trait DeclarationSource {
    fn origin(&self) -> Origin;

    /// Top-level declarations; each carries its nested classes.
    fn declarations(&self) -> Vec<Arc<ClassDecl>>;

    /// Package-level information (hidden packages, locations).
    fn packages(&self) -> Vec<PackageDecl> {
        Vec::new()
    }

    /// Problems the front-end already recovered from.
    fn syntax_errors(&self) -> Vec<SyntaxError> {
        Vec::new()
    }

    /// Format version of a textual source.
    fn format(&self) -> Option<FileFormat> {
        None
    }
}

/// Resolves a qualified class name to its declaration.
pub trait ClassResolver {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<ClassDecl>>;
}

impl<F> ClassResolver for F
where
    F: Fn(&str) -> Option<Arc<ClassDecl>>,
{
    fn resolve(&self, qualified_name: &str) -> Option<Arc<ClassDecl>> {
        self(qualified_name)
    }
}

/// A resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClasspath;

impl ClassResolver for NoClasspath {
    fn resolve(&self, _qualified_name: &str) -> Option<Arc<ClassDecl>> {
        None
    }
}

/// An ordered chain of resolvers; the first hit wins.
#[derive(Default)]
pub struct Classpath {
    entries: Vec<Box<dyn ClassResolver>>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resolver: impl ClassResolver + 'static) -> Self {
        self.push(resolver);
        self
    }

    pub fn push(&mut self, resolver: impl ClassResolver + 'static) {
        self.entries.push(Box::new(resolver));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ClassResolver for Classpath {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<ClassDecl>> {
        let found = self
            .entries
            .iter()
            .find_map(|entry| entry.resolve(qualified_name));
        tracing::trace!(
            "[CLASSPATH] resolve '{}' -> {}",
            qualified_name,
            if found.is_some() { "found" } else { "missing" }
        );
        found
    }
}

impl fmt::Debug for Classpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classpath")
            .field("entries", &self.entries.len())
            .finish()
    }
}

// ============================================================================
// LIVE DECLARATION SET
// ============================================================================

/// In-memory declarations handed over by a live front-end.
///
/// Also usable as a [`ClassResolver`], so a `SourceSet` of library classes can
/// serve as the classpath of another session.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    classes: Vec<Arc<ClassDecl>>,
    packages: Vec<PackageDecl>,
    /// Every declaration (nested ones included) by qualified name.
    by_qualified_name: FxHashMap<Arc<str>, Arc<ClassDecl>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, decl: ClassDecl) -> Self {
        self.add(decl);
        self
    }

    pub fn with_package(mut self, package: PackageDecl) -> Self {
        self.packages.push(package);
        self
    }

    /// Add a top-level declaration. A later declaration with the same
    /// qualified name is kept in the stream but does not replace the indexed one.
    pub fn add(&mut self, decl: ClassDecl) -> Arc<ClassDecl> {
        let decl = Arc::new(decl);
        let index = &mut self.by_qualified_name;
        decl.walk(&mut |d| {
            index
                .entry(d.qualified_name.clone())
                .or_insert_with(|| d.clone());
        });
        self.classes.push(decl.clone());
        decl
    }

    pub fn add_package(&mut self, package: PackageDecl) {
        self.packages.push(package);
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Arc<ClassDecl>> {
        self.by_qualified_name.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl DeclarationSource for SourceSet {
    fn origin(&self) -> Origin {
        Origin::Source
    }

    fn declarations(&self) -> Vec<Arc<ClassDecl>> {
        self.classes.clone()
    }

    fn packages(&self) -> Vec<PackageDecl> {
        self.packages.clone()
    }
}

impl ClassResolver for SourceSet {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<ClassDecl>> {
        self.get(qualified_name).cloned()
    }
}
