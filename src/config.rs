//! Session configuration
//!
//! [`SurfaceConfig`] controls the visibility policy and the resolution limits
//! used while building a [`Codebase`](crate::model::Codebase). All fields have
//! defaults matching a Java-style host type system.

use std::sync::Arc;

/// Name of the universal root type when nothing else is configured.
pub const DEFAULT_ROOT_TYPE: &str = "java.lang.Object";

/// Configuration for one surface-extraction session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SurfaceConfig {
    /// Qualified name of the universal root type.
    pub root_type: Arc<str>,
    /// Package-name prefixes whose packages are hidden.
    pub hidden_packages: Vec<String>,
    /// Annotations that force-show an otherwise hidden member.
    pub show_annotations: Vec<String>,
    /// Annotations that mark a declaration hidden.
    pub hide_annotations: Vec<String>,
    /// Depth cap for super-class and interface walks.
    pub max_hierarchy_depth: usize,
    /// Safety cap on rounds of the classpath fixpoint.
    pub max_closure_rounds: usize,
    /// Also resolve member types of classpath classes.
    pub resolve_classpath_members: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            root_type: Arc::from(DEFAULT_ROOT_TYPE),
            hidden_packages: Vec::new(),
            show_annotations: Vec::new(),
            hide_annotations: Vec::new(),
            max_hierarchy_depth: 256,
            max_closure_rounds: 10_000,
            resolve_classpath_members: false,
        }
    }
}

impl SurfaceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_type(mut self, root_type: impl Into<Arc<str>>) -> Self {
        self.root_type = root_type.into();
        self
    }

    pub fn with_hidden_package(mut self, prefix: impl Into<String>) -> Self {
        self.hidden_packages.push(prefix.into());
        self
    }

    pub fn with_show_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.show_annotations.push(annotation.into());
        self
    }

    pub fn with_hide_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.hide_annotations.push(annotation.into());
        self
    }

    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    pub fn with_classpath_members(mut self, resolve: bool) -> Self {
        self.resolve_classpath_members = resolve;
        self
    }

    /// Check whether `name` is the universal root type.
    pub fn is_root_type(&self, name: &str) -> bool {
        *self.root_type == *name
    }

    /// A package is hidden when its name equals a configured prefix or lies
    /// below one (`a.b` hides `a.b` and `a.b.c`, not `a.bc`).
    pub fn is_hidden_package(&self, name: &str) -> bool {
        self.hidden_packages.iter().any(|prefix| {
            name == prefix
                || (name.starts_with(prefix.as_str())
                    && name.as_bytes().get(prefix.len()) == Some(&b'.'))
        })
    }

    pub fn is_show_annotation(&self, annotation: &str) -> bool {
        matches_annotation(&self.show_annotations, annotation)
    }

    pub fn is_hide_annotation(&self, annotation: &str) -> bool {
        matches_annotation(&self.hide_annotations, annotation)
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Json(e.to_string()))
    }
}

/// Annotations are compared by qualified name, or by simple name when the
/// configured entry has no package.
fn matches_annotation(configured: &[String], annotation: &str) -> bool {
    let simple = annotation.rsplit('.').next().unwrap_or(annotation);
    configured
        .iter()
        .any(|entry| entry == annotation || (!entry.contains('.') && entry == simple))
}

/// Errors raised while reading a configuration file.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Json(String),
}
