//! Declaration records supplied by a front-end.
//!
//! These are opaque, language-neutral descriptions of classes and their
//! members. Both the live front-end ([`SourceSet`](super::SourceSet)) and the
//! textual one ([`SignatureFile`](crate::parser::SignatureFile)) produce them;
//! the model never looks at source text.

use std::sync::Arc;

use smol_str::SmolStr;

use super::modifiers::{ModifierBuilder, ModifierFlags, Visibility};
use super::type_ref::TypeRef;
use crate::base::Location;

/// The kind of a class-like entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    AnnotationType,
    TypeParameter,
}

impl ClassKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "enum" => Some(ClassKind::Enum),
            "@interface" => Some(ClassKind::AnnotationType),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::AnnotationType => "@interface",
            ClassKind::TypeParameter => "type parameter",
        }
    }

    /// Classes and enums; the kinds that can be instantiated.
    pub fn is_class(&self) -> bool {
        matches!(self, ClassKind::Class | ClassKind::Enum)
    }

    pub fn is_interface(&self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::AnnotationType)
    }
}

/// Which backend an entity was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Origin {
    /// Live source declarations.
    #[default]
    Source,
    /// A previously serialized textual description.
    Text,
    /// Created by the model itself (parent packages, pseudo-classes).
    Synthetic,
}

/// Visibility policy flags that are inherited by synthesized duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Exposure {
    pub hidden: bool,
    pub removed: bool,
    pub doc_only: bool,
}

impl Exposure {
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }
}

/// Presence and value of a parameter default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DefaultValue {
    #[default]
    None,
    /// A default exists; its source text may be unknown.
    Present(Option<Arc<str>>),
}

impl DefaultValue {
    pub fn is_present(&self) -> bool {
        matches!(self, DefaultValue::Present(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            DefaultValue::Present(Some(value)) => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// TYPE PARAMETERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDecl {
    pub name: SmolStr,
    pub bounds: Vec<TypeRef>,
}

impl TypeParamDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bound(mut self, bound: impl Into<TypeRef>) -> Self {
        self.bounds.push(bound.into());
        self
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: Option<SmolStr>,
    pub public_name: Option<SmolStr>,
    pub ty: TypeRef,
    pub default_value: DefaultValue,
    pub modifiers: ModifierBuilder,
}

impl ParamDecl {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            name: None,
            public_name: None,
            ty: ty.into(),
            default_value: DefaultValue::None,
            modifiers: ModifierBuilder::new(),
        }
    }

    pub fn named(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn public_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.public_name = Some(name.into());
        self
    }

    pub fn with_default(mut self, value: Option<&str>) -> Self {
        self.default_value = DefaultValue::Present(value.map(Arc::from));
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierBuilder) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Method name; ignored for constructors, which take the class name.
    pub name: SmolStr,
    pub is_constructor: bool,
    /// `None` only for constructors.
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<ParamDecl>,
    pub throws: Vec<TypeRef>,
    pub type_parameters: Vec<TypeParamDecl>,
    pub modifiers: ModifierBuilder,
    pub exposure: Exposure,
    pub location: Location,
}

impl MethodDecl {
    /// A method returning `void` until [`returns`](Self::returns) says otherwise.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            is_constructor: false,
            return_type: Some(TypeRef::new("void")),
            parameters: Vec::new(),
            throws: Vec::new(),
            type_parameters: Vec::new(),
            modifiers: ModifierBuilder::new(),
            exposure: Exposure::default(),
            location: Location::Unknown,
        }
    }

    pub fn constructor() -> Self {
        Self {
            name: SmolStr::default(),
            is_constructor: true,
            return_type: None,
            ..Self::new("")
        }
    }

    pub fn returns(mut self, ty: impl Into<TypeRef>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Add an unnamed parameter of type `ty`.
    pub fn param(mut self, ty: impl Into<TypeRef>) -> Self {
        self.parameters.push(ParamDecl::new(ty));
        self
    }

    pub fn with_param(mut self, param: ParamDecl) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn throws(mut self, ty: impl Into<TypeRef>) -> Self {
        self.throws.push(ty.into());
        self
    }

    pub fn type_parameter(mut self, param: TypeParamDecl) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn public(mut self) -> Self {
        self.modifiers.set_visibility(Visibility::Public);
        self
    }

    pub fn with_flag(mut self, flag: ModifierFlags) -> Self {
        self.modifiers.set(flag, true);
        self
    }

    pub fn annotated(mut self, annotation: impl Into<Arc<str>>) -> Self {
        self.modifiers.add_annotation(annotation);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierBuilder) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.exposure.hidden = true;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: SmolStr,
    pub ty: TypeRef,
    pub modifiers: ModifierBuilder,
    pub initial_value: Option<Arc<str>>,
    pub exposure: Exposure,
    pub location: Location,
}

impl FieldDecl {
    pub fn new(name: impl Into<SmolStr>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: ModifierBuilder::new(),
            initial_value: None,
            exposure: Exposure::default(),
            location: Location::Unknown,
        }
    }

    pub fn value(mut self, value: impl Into<Arc<str>>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn public(mut self) -> Self {
        self.modifiers.set_visibility(Visibility::Public);
        self
    }

    pub fn with_flag(mut self, flag: ModifierFlags) -> Self {
        self.modifiers.set(flag, true);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierBuilder) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.exposure.hidden = true;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: SmolStr,
    pub ty: TypeRef,
    pub modifiers: ModifierBuilder,
    pub exposure: Exposure,
    pub location: Location,
}

impl PropertyDecl {
    pub fn new(name: impl Into<SmolStr>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: ModifierBuilder::new(),
            exposure: Exposure::default(),
            location: Location::Unknown,
        }
    }

    pub fn public(mut self) -> Self {
        self.modifiers.set_visibility(Visibility::Public);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierBuilder) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

// ============================================================================
// CLASSES AND PACKAGES
// ============================================================================

/// A class-like declaration, possibly with nested inner classes.
///
/// `package` is inferred from the qualified name of the outermost declaration
/// by stripping its simple name; inner classes inherit it when attached with
/// [`inner`](Self::inner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub qualified_name: Arc<str>,
    pub simple_name: SmolStr,
    pub package: Arc<str>,
    pub kind: ClassKind,
    pub modifiers: ModifierBuilder,
    /// Documented super-class; the root type is implied when absent.
    pub super_class: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub type_parameters: Vec<TypeParamDecl>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub properties: Vec<PropertyDecl>,
    pub inner_classes: Vec<Arc<ClassDecl>>,
    /// Qualified name of the enclosing class, for inner classes.
    pub containing_class: Option<Arc<str>>,
    pub exposure: Exposure,
    pub origin: Origin,
    pub location: Location,
}

impl ClassDecl {
    pub fn new(kind: ClassKind, qualified_name: impl AsRef<str>) -> Self {
        let qualified_name = qualified_name.as_ref();
        let (package, simple) = match qualified_name.rsplit_once('.') {
            Some((package, simple)) => (package, simple),
            None => ("", qualified_name),
        };
        Self {
            qualified_name: Arc::from(qualified_name),
            simple_name: SmolStr::new(simple),
            package: Arc::from(package),
            kind,
            modifiers: ModifierBuilder::new(),
            super_class: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            inner_classes: Vec::new(),
            containing_class: None,
            exposure: Exposure::default(),
            origin: Origin::Source,
            location: Location::Unknown,
        }
    }

    pub fn class(qualified_name: impl AsRef<str>) -> Self {
        Self::new(ClassKind::Class, qualified_name)
    }

    pub fn interface(qualified_name: impl AsRef<str>) -> Self {
        Self::new(ClassKind::Interface, qualified_name)
    }

    pub fn enum_type(qualified_name: impl AsRef<str>) -> Self {
        Self::new(ClassKind::Enum, qualified_name)
    }

    pub fn annotation_type(qualified_name: impl AsRef<str>) -> Self {
        Self::new(ClassKind::AnnotationType, qualified_name)
    }

    /// Override the inferred package, for front-ends that know it explicitly
    /// (a simple name may itself contain dots, e.g. `Outer.Inner`).
    pub fn in_package(mut self, package: impl AsRef<str>) -> Self {
        let package = package.as_ref();
        let simple = if package.is_empty() {
            self.qualified_name.as_ref()
        } else {
            self.qualified_name
                .strip_prefix(package)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(self.simple_name.as_str())
        };
        self.simple_name = SmolStr::new(simple);
        self.package = Arc::from(package);
        self
    }

    pub fn extends(mut self, ty: impl Into<TypeRef>) -> Self {
        self.super_class = Some(ty.into());
        self
    }

    pub fn implements(mut self, ty: impl Into<TypeRef>) -> Self {
        self.interfaces.push(ty.into());
        self
    }

    pub fn type_parameter(mut self, param: TypeParamDecl) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    /// Attach a nested class. Its qualified name becomes
    /// `<this>.<simple name>` and it shares this declaration's package.
    pub fn inner(mut self, inner: ClassDecl) -> Self {
        self.push_inner(inner);
        self
    }

    /// In-place form of [`inner`](Self::inner).
    pub fn push_inner(&mut self, mut inner: ClassDecl) {
        inner.adopt(&self.qualified_name, &self.package, self.origin);
        self.inner_classes.push(Arc::new(inner));
    }

    pub fn public(mut self) -> Self {
        self.modifiers.set_visibility(Visibility::Public);
        self
    }

    pub fn with_flag(mut self, flag: ModifierFlags) -> Self {
        self.modifiers.set(flag, true);
        self
    }

    pub fn annotated(mut self, annotation: impl Into<Arc<str>>) -> Self {
        self.modifiers.add_annotation(annotation);
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierBuilder) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.exposure.hidden = true;
        self
    }

    pub fn removed(mut self) -> Self {
        self.exposure.removed = true;
        self
    }

    pub fn doc_only(mut self) -> Self {
        self.exposure.doc_only = true;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn is_inner(&self) -> bool {
        self.containing_class.is_some()
    }

    /// Visit this declaration and every nested declaration, outer first.
    pub fn walk(self: &Arc<Self>, f: &mut impl FnMut(&Arc<ClassDecl>)) {
        f(self);
        for inner in &self.inner_classes {
            inner.walk(f);
        }
    }

    fn adopt(&mut self, outer: &Arc<str>, package: &Arc<str>, origin: Origin) {
        if let Some((_, last)) = self.simple_name.rsplit_once('.') {
            self.simple_name = SmolStr::new(last);
        }
        self.qualified_name = Arc::from(format!("{}.{}", outer, self.simple_name));
        self.containing_class = Some(outer.clone());
        self.package = package.clone();
        self.origin = origin;
        let qualified_name = self.qualified_name.clone();
        for inner in &mut self.inner_classes {
            Arc::make_mut(inner).adopt(&qualified_name, package, origin);
        }
    }
}

/// Package-level information a front-end may supply alongside its classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    pub name: Arc<str>,
    pub exposure: Exposure,
    pub location: Location,
}

impl PackageDecl {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            exposure: Exposure::default(),
            location: Location::Unknown,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.exposure.hidden = true;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}
