//! Modifier sets: visibility, boolean flags and annotations.
//!
//! Modifiers are assembled as a mutable [`ModifierBuilder`] while a declaration
//! is being described, then frozen into an immutable [`ModifierSet`] when the
//! owning entity is created. A frozen set has no mutators.

use std::fmt;
use std::sync::Arc;

/// Visibility level of a declaration, ordered from least to most visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Visibility {
    Private,
    #[default]
    PackagePrivate,
    Internal,
    Protected,
    Public,
}

impl Visibility {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "internal" => Some(Visibility::Internal),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Protected => Some("protected"),
            Visibility::Internal => Some("internal"),
            Visibility::Private => Some("private"),
            Visibility::PackagePrivate => None,
        }
    }
}

bitflags::bitflags! {
    /// Boolean modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u32 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        const FINAL = 1 << 2;
        const DEFAULT = 1 << 3;
        const SEALED = 1 << 4;
        const SYNCHRONIZED = 1 << 5;
        const NATIVE = 1 << 6;
        const STRICTFP = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const DEPRECATED = 1 << 10;
        const INFIX = 1 << 11;
        const OPERATOR = 1 << 12;
        const INLINE = 1 << 13;
        const SUSPEND = 1 << 14;
        const VALUE = 1 << 15;
        const DATA = 1 << 16;
        const FUN = 1 << 17;

        /// Flags that take part in signature equivalence.
        const SEMANTIC = Self::STATIC.bits()
            | Self::ABSTRACT.bits()
            | Self::FINAL.bits()
            | Self::DEFAULT.bits()
            | Self::SEALED.bits()
            | Self::TRANSIENT.bits()
            | Self::VOLATILE.bits()
            | Self::INFIX.bits()
            | Self::OPERATOR.bits()
            | Self::INLINE.bits()
            | Self::SUSPEND.bits()
            | Self::VALUE.bits()
            | Self::DATA.bits()
            | Self::FUN.bits();
    }
}

impl ModifierFlags {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let flag = match keyword {
            "static" => Self::STATIC,
            "abstract" => Self::ABSTRACT,
            "final" => Self::FINAL,
            "default" => Self::DEFAULT,
            "sealed" => Self::SEALED,
            "synchronized" => Self::SYNCHRONIZED,
            "native" => Self::NATIVE,
            "strictfp" => Self::STRICTFP,
            "transient" => Self::TRANSIENT,
            "volatile" => Self::VOLATILE,
            "deprecated" => Self::DEPRECATED,
            "infix" => Self::INFIX,
            "operator" => Self::OPERATOR,
            "inline" => Self::INLINE,
            "suspend" => Self::SUSPEND,
            "value" => Self::VALUE,
            "data" => Self::DATA,
            "fun" => Self::FUN,
            _ => return None,
        };
        Some(flag)
    }
}

/// Mutable modifier bag used while a declaration is being assembled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModifierBuilder {
    visibility: Visibility,
    flags: ModifierFlags,
    annotations: Vec<Arc<str>>,
}

impl ModifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public() -> Self {
        Self::new().with_visibility(Visibility::Public)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with(mut self, flag: ModifierFlags) -> Self {
        self.flags |= flag;
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<Arc<str>>) -> Self {
        self.add_annotation(annotation);
        self
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn set(&mut self, flag: ModifierFlags, on: bool) {
        self.flags.set(flag, on);
    }

    pub fn add_annotation(&mut self, annotation: impl Into<Arc<str>>) {
        let annotation = annotation.into();
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn flags(&self) -> ModifierFlags {
        self.flags
    }

    pub fn annotations(&self) -> &[Arc<str>] {
        &self.annotations
    }

    /// Freeze into the immutable form stored on entities.
    pub fn freeze(self) -> ModifierSet {
        ModifierSet {
            visibility: self.visibility,
            flags: self.flags,
            annotations: self.annotations.into(),
        }
    }
}

/// Frozen modifier set owned by exactly one entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModifierSet {
    visibility: Visibility,
    flags: ModifierFlags,
    annotations: Arc<[Arc<str>]>,
}

impl ModifierSet {
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn flags(&self) -> ModifierFlags {
        self.flags
    }

    pub fn has(&self, flag: ModifierFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn is_protected(&self) -> bool {
        self.visibility == Visibility::Protected
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    pub fn is_package_private(&self) -> bool {
        self.visibility == Visibility::PackagePrivate
    }

    pub fn is_static(&self) -> bool {
        self.has(ModifierFlags::STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.has(ModifierFlags::ABSTRACT)
    }

    pub fn is_final(&self) -> bool {
        self.has(ModifierFlags::FINAL)
    }

    pub fn is_default(&self) -> bool {
        self.has(ModifierFlags::DEFAULT)
    }

    pub fn is_deprecated(&self) -> bool {
        self.has(ModifierFlags::DEPRECATED)
    }

    pub fn annotations(&self) -> &[Arc<str>] {
        &self.annotations
    }

    /// Match an annotation by qualified name, or by simple name when `name`
    /// has no package.
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| {
            **a == *name || (!name.contains('.') && a.rsplit('.').next() == Some(name))
        })
    }

    /// Equivalence ignoring non-semantic modifiers and annotations.
    pub fn equivalent_to(&self, other: &ModifierSet) -> bool {
        self.visibility == other.visibility
            && self.flags & ModifierFlags::SEMANTIC == other.flags & ModifierFlags::SEMANTIC
    }

    /// Thaw into a builder, e.g. to derive a modified copy.
    pub fn to_builder(&self) -> ModifierBuilder {
        ModifierBuilder {
            visibility: self.visibility,
            flags: self.flags,
            annotations: self.annotations.to_vec(),
        }
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<&str> = Vec::new();
        if let Some(keyword) = self.visibility.keyword() {
            words.push(keyword);
        }
        for (name, _) in self.flags.iter_names() {
            words.push(name);
        }
        let text = words
            .iter()
            .map(|w| w.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&text)
    }
}
