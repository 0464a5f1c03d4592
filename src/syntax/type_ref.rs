//! Type references as spelled by a front-end.
//!
//! A [`TypeRef`] is the raw text of a type (`java.util.List<T>[]`,
//! `int...`, `String?`) plus its nullness marker. It knows nothing about
//! which names are type variables; the model classifies it in scope.

use std::fmt;
use std::sync::Arc;

/// Names of the primitive types, including `void`.
pub const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Nullness marker carried by a type reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nullness {
    #[default]
    Unknown,
    NonNull,
    Nullable,
    /// Kotlin platform type (`!` suffix).
    Platform,
}

/// A textual type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    text: Arc<str>,
    nullness: Nullness,
}

impl TypeRef {
    /// Create a type reference, splitting off a trailing `?` or `!` marker.
    pub fn new(text: impl AsRef<str>) -> Self {
        let trimmed = text.as_ref().trim();
        let (body, nullness) = if trimmed.len() > 1 && trimmed.ends_with('?') {
            (&trimmed[..trimmed.len() - 1], Nullness::Nullable)
        } else if trimmed.len() > 1 && trimmed.ends_with('!') {
            (&trimmed[..trimmed.len() - 1], Nullness::Platform)
        } else {
            (trimmed, Nullness::Unknown)
        };
        Self {
            text: Arc::from(body),
            nullness,
        }
    }

    pub fn with_nullness(mut self, nullness: Nullness) -> Self {
        self.nullness = nullness;
        self
    }

    /// The type text without its nullness marker.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn nullness(&self) -> Nullness {
        self.nullness
    }

    pub fn is_varargs(&self) -> bool {
        self.text.ends_with("...")
    }

    /// Number of array dimensions; a varargs parameter counts as one.
    pub fn array_dimensions(&self) -> usize {
        let mut rest = self.text.as_ref();
        let mut dims = 0;
        if let Some(stripped) = rest.strip_suffix("...") {
            rest = stripped;
            dims += 1;
        }
        while let Some(stripped) = rest.trim_end().strip_suffix("[]") {
            rest = stripped;
            dims += 1;
        }
        dims
    }

    /// The element name with type arguments and array dimensions removed.
    pub fn element_name(&self) -> &str {
        let mut rest = self.text.as_ref();
        if let Some(stripped) = rest.strip_suffix("...") {
            rest = stripped;
        }
        while let Some(stripped) = rest.trim_end().strip_suffix("[]") {
            rest = stripped;
        }
        let rest = strip_wildcard(rest);
        let end = rest.find('<').unwrap_or(rest.len());
        rest[..end].trim()
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.element_name())
    }

    pub fn is_void(&self) -> bool {
        self.text.as_ref() == "void"
    }

    /// Raw form: element name followed by one `[]` per dimension.
    pub fn erased(&self) -> String {
        let mut erased = self.element_name().to_string();
        for _ in 0..self.array_dimensions() {
            erased.push_str("[]");
        }
        erased
    }

    /// Every dotted name mentioned in this type, element name first,
    /// followed by type-argument names in order of appearance.
    pub fn referenced_names(&self) -> Vec<&str> {
        let text = self.text.as_ref();
        let mut names = Vec::new();
        let mut start = None;
        for (i, c) in text.char_indices() {
            let part_of_name = c.is_alphanumeric() || c == '_' || c == '$' || c == '.';
            match (part_of_name, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    push_name(&mut names, &text[s..i]);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            push_name(&mut names, &text[s..]);
        }
        names
    }
}

fn strip_wildcard(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix("? extends ")
        .or_else(|| text.strip_prefix("? super "))
        .unwrap_or(text)
}

fn push_name<'a>(names: &mut Vec<&'a str>, candidate: &'a str) {
    let candidate = candidate.trim_matches('.');
    if candidate.is_empty() || matches!(candidate, "extends" | "super") {
        return;
    }
    if !names.contains(&candidate) {
        names.push(candidate);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        match self.nullness {
            Nullness::Nullable => f.write_str("?"),
            Nullness::Platform => f.write_str("!"),
            Nullness::Unknown | Nullness::NonNull => Ok(()),
        }
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        TypeRef::new(text)
    }
}

impl From<String> for TypeRef {
    fn from(text: String) -> Self {
        TypeRef::new(text)
    }
}
