//! Type references classified in scope.
//!
//! A [`TypeItem`] is a [`TypeRef`] that knows whether its element is a
//! primitive, a class, or a type variable of the enclosing class or method,
//! and carries its erasure for override matching.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::syntax::{Nullness, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    Class,
    TypeVariable,
}

/// Type variables visible at a declaration, innermost last.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    variables: Vec<(SmolStr, Arc<str>)>,
}

impl TypeScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name`; `erasure` is its first bound, or the root type.
    pub fn push(&mut self, name: impl Into<SmolStr>, erasure: impl Into<Arc<str>>) {
        self.variables.push((name.into(), erasure.into()));
    }

    pub fn erasure_of(&self, name: &str) -> Option<&Arc<str>> {
        self.variables
            .iter()
            .rev()
            .find(|(variable, _)| variable == name)
            .map(|(_, erasure)| erasure)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.erasure_of(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// A classified type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeItem {
    text: Arc<str>,
    element: Arc<str>,
    erased: Arc<str>,
    kind: TypeKind,
    dimensions: usize,
    nullness: Nullness,
    /// Class names mentioned by the type (element and type arguments),
    /// excluding primitives and type variables.
    referenced: Arc<[Arc<str>]>,
}

impl TypeItem {
    pub fn classify(ty: &TypeRef, scope: &TypeScope) -> Self {
        let element = ty.element_name();
        let dimensions = ty.array_dimensions();
        let (kind, erased_element): (TypeKind, &str) = if ty.is_primitive() {
            (TypeKind::Primitive, element)
        } else if let Some(erasure) = scope.erasure_of(element) {
            (TypeKind::TypeVariable, erasure)
        } else {
            (TypeKind::Class, element)
        };

        let mut erased = erased_element.to_string();
        for _ in 0..dimensions {
            erased.push_str("[]");
        }

        let referenced: Vec<Arc<str>> = ty
            .referenced_names()
            .into_iter()
            .filter(|name| !scope.contains(name))
            .filter(|name| !crate::syntax::PRIMITIVES.contains(name))
            .map(Arc::from)
            .collect();

        Self {
            text: Arc::from(ty.text()),
            element: Arc::from(element),
            erased: Arc::from(erased),
            kind,
            dimensions,
            nullness: ty.nullness(),
            referenced: referenced.into(),
        }
    }

    /// The type as written, without nullness marker.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    /// Raw form; type variables are replaced by their erasure.
    pub fn erased(&self) -> &str {
        &self.erased
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_type_variable(&self) -> bool {
        self.kind == TypeKind::TypeVariable
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == TypeKind::Primitive
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn nullness(&self) -> Nullness {
        self.nullness
    }

    pub fn referenced_names(&self) -> &[Arc<str>] {
        &self.referenced
    }

    /// Parameter-type compatibility used for override matching: equal
    /// erasures, or a type variable on either side with the same number of
    /// array dimensions.
    pub fn matches_for_override(&self, other: &TypeItem) -> bool {
        if self.erased == other.erased {
            return true;
        }
        (self.is_type_variable() || other.is_type_variable())
            && self.dimensions == other.dimensions
    }
}

impl std::fmt::Display for TypeItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)?;
        match self.nullness {
            Nullness::Nullable => f.write_str("?"),
            Nullness::Platform => f.write_str("!"),
            Nullness::Unknown | Nullness::NonNull => Ok(()),
        }
    }
}
