//! Entity records stored in the codebase arenas.
//!
//! Items are created in a draft state by the graph builder and become safe to
//! query once finalized. Upward links (member → class, class → package) are
//! ids, never owning references.

use std::sync::Arc;

use smol_str::SmolStr;

use super::ids::{ClassId, FieldId, MemberId, MethodId, PackageId, PropertyId};
use super::types::TypeItem;
use crate::base::Location;
use crate::syntax::{ClassDecl, ClassKind, DefaultValue, Exposure, ModifierSet, Origin, TypeRef};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Whether an entity belongs to the described surface or is a dependency.
///
/// Exactly one holds for every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Part of the primary surface being described.
    Emit,
    /// Referenced from the classpath, not described.
    Classpath,
}

impl Surface {
    pub fn is_emit(&self) -> bool {
        matches!(self, Surface::Emit)
    }

    pub fn is_classpath(&self) -> bool {
        matches!(self, Surface::Classpath)
    }
}

/// Construction state of a class or package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    Draft,
    Finalized,
}

/// A lazily resolved reference to a class by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRef {
    /// Not yet resolved; holds the reference as written.
    Pending(TypeRef),
    Resolved { name: Arc<str>, class: ClassId },
    /// Resolution found no such class.
    Missing(Arc<str>),
}

impl ClassRef {
    /// The referenced class name, without type arguments.
    pub fn name(&self) -> &str {
        match self {
            ClassRef::Pending(ty) => ty.element_name(),
            ClassRef::Resolved { name, .. } | ClassRef::Missing(name) => name,
        }
    }

    /// The resolved class; `None` while pending or when missing.
    pub fn class(&self) -> Option<ClassId> {
        match self {
            ClassRef::Resolved { class, .. } => Some(*class),
            ClassRef::Pending(_) | ClassRef::Missing(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ClassRef::Pending(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ClassRef::Missing(_))
    }
}

// ============================================================================
// PACKAGES
// ============================================================================

/// Link from a package to its containing package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageLink {
    Unlinked,
    /// The root package has no parent.
    Root,
    Parent(PackageId),
}

#[derive(Debug, Clone)]
pub struct PackageItem {
    pub(crate) id: PackageId,
    pub(crate) name: Arc<str>,
    pub(crate) link: PackageLink,
    pub(crate) classes: Vec<ClassId>,
    pub(crate) surface: Surface,
    pub(crate) hidden: bool,
    pub(crate) origin: Origin,
    pub(crate) location: Location,
    pub(crate) state: ItemState,
}

impl PackageItem {
    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Qualified name; empty for the root package.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    pub fn containing_package(&self) -> Option<PackageId> {
        match self.link {
            PackageLink::Parent(parent) => Some(parent),
            PackageLink::Root | PackageLink::Unlinked => None,
        }
    }

    pub fn link(&self) -> PackageLink {
        self.link
    }

    /// Top-level classes, ordered by full name.
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn emit(&self) -> bool {
        self.surface.is_emit()
    }

    pub fn from_classpath(&self) -> bool {
        self.surface.is_classpath()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn state(&self) -> ItemState {
        self.state
    }
}

// ============================================================================
// CLASSES
// ============================================================================

#[derive(Debug, Clone)]
pub struct ClassItem {
    pub(crate) id: ClassId,
    pub(crate) qualified_name: Arc<str>,
    pub(crate) simple_name: SmolStr,
    pub(crate) package_name: Arc<str>,
    /// Set when the owning package is materialized.
    pub(crate) package: Option<PackageId>,
    pub(crate) kind: ClassKind,
    pub(crate) modifiers: ModifierSet,
    pub(crate) type_parameters: Vec<ClassId>,
    /// `None` only for the root type.
    pub(crate) super_class: Option<ClassRef>,
    /// The super-class was not written and defaults to the root type.
    pub(crate) implicit_super: bool,
    pub(crate) interfaces: Vec<ClassRef>,
    pub(crate) containing_class: Option<ClassId>,
    pub(crate) inner_classes: Vec<ClassId>,
    pub(crate) fields: Vec<FieldId>,
    pub(crate) methods: Vec<MethodId>,
    pub(crate) properties: Vec<PropertyId>,
    pub(crate) surface: Surface,
    pub(crate) exposure: Exposure,
    pub(crate) origin: Origin,
    pub(crate) location: Location,
    pub(crate) state: ItemState,
    /// Declaration units merged into this class.
    pub(crate) units: Vec<Arc<ClassDecl>>,
}

impl ClassItem {
    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The containing package; `None` until packages are materialized.
    /// Type-parameter pseudo-classes get the root package once packages are
    /// linked, without being listed among its classes.
    pub fn package(&self) -> Option<PackageId> {
        self.package
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_type_parameter(&self) -> bool {
        self.kind == ClassKind::TypeParameter
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }

    /// A class or enum that is not abstract.
    pub fn is_concrete(&self) -> bool {
        self.kind.is_class() && !self.modifiers.is_abstract()
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    pub fn type_parameters(&self) -> &[ClassId] {
        &self.type_parameters
    }

    pub fn super_class(&self) -> Option<&ClassRef> {
        self.super_class.as_ref()
    }

    pub fn super_class_id(&self) -> Option<ClassId> {
        self.super_class.as_ref().and_then(ClassRef::class)
    }

    pub fn interfaces(&self) -> &[ClassRef] {
        &self.interfaces
    }

    pub fn containing_class(&self) -> Option<ClassId> {
        self.containing_class
    }

    pub fn inner_classes(&self) -> &[ClassId] {
        &self.inner_classes
    }

    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodId] {
        &self.methods
    }

    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    /// Fields, then methods, then properties; each in insertion order.
    pub fn members(&self) -> Vec<MemberId> {
        self.fields
            .iter()
            .map(|&id| MemberId::Field(id))
            .chain(self.methods.iter().map(|&id| MemberId::Method(id)))
            .chain(self.properties.iter().map(|&id| MemberId::Property(id)))
            .collect()
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn emit(&self) -> bool {
        self.surface.is_emit()
    }

    pub fn from_classpath(&self) -> bool {
        self.surface.is_classpath()
    }

    pub fn exposure(&self) -> Exposure {
        self.exposure
    }

    pub fn is_hidden(&self) -> bool {
        self.exposure.hidden
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == ItemState::Finalized
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

#[derive(Debug, Clone)]
pub struct ParameterItem {
    pub(crate) index: usize,
    pub(crate) name: Option<SmolStr>,
    pub(crate) public_name: Option<SmolStr>,
    pub(crate) ty: TypeItem,
    pub(crate) default_value: DefaultValue,
    pub(crate) modifiers: ModifierSet,
    pub(crate) method: MethodId,
}

impl ParameterItem {
    /// Zero-based position; the identity of a parameter within its method.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name callers may use at call sites, when it differs from `name`.
    pub fn public_name(&self) -> Option<&str> {
        self.public_name.as_deref()
    }

    pub fn ty(&self) -> &TypeItem {
        &self.ty
    }

    pub fn default_value(&self) -> &DefaultValue {
        &self.default_value
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_present()
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    pub fn method(&self) -> MethodId {
        self.method
    }
}

#[derive(Debug, Clone)]
pub struct MethodItem {
    pub(crate) id: MethodId,
    pub(crate) name: SmolStr,
    pub(crate) containing_class: ClassId,
    pub(crate) is_constructor: bool,
    pub(crate) modifiers: ModifierSet,
    pub(crate) return_type: Option<TypeItem>,
    pub(crate) parameters: Vec<ParameterItem>,
    /// Sorted by erased name.
    pub(crate) throws: Vec<TypeItem>,
    pub(crate) type_parameters: Vec<ClassId>,
    pub(crate) exposure: Exposure,
    pub(crate) inherited_from: Option<ClassId>,
    pub(crate) inherited: bool,
    pub(crate) rank: u32,
    pub(crate) origin: Origin,
    pub(crate) location: Location,
}

impl MethodItem {
    pub fn id(&self) -> MethodId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn containing_class(&self) -> ClassId {
        self.containing_class
    }

    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    /// `None` for constructors, which return their containing class.
    pub fn return_type(&self) -> Option<&TypeItem> {
        self.return_type.as_ref()
    }

    pub fn parameters(&self) -> &[ParameterItem] {
        &self.parameters
    }

    pub fn throws(&self) -> &[TypeItem] {
        &self.throws
    }

    pub fn type_parameters(&self) -> &[ClassId] {
        &self.type_parameters
    }

    pub fn exposure(&self) -> Exposure {
        self.exposure
    }

    pub fn is_hidden(&self) -> bool {
        self.exposure.hidden
    }

    /// The class this member was duplicated from.
    pub fn inherited_from(&self) -> Option<ClassId> {
        self.inherited_from
    }

    pub fn inherited(&self) -> bool {
        self.inherited
    }

    /// Declaration rank; copies keep the rank of their original.
    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

#[derive(Debug, Clone)]
pub struct FieldItem {
    pub(crate) id: FieldId,
    pub(crate) name: SmolStr,
    pub(crate) containing_class: ClassId,
    pub(crate) ty: TypeItem,
    pub(crate) modifiers: ModifierSet,
    pub(crate) initial_value: Option<Arc<str>>,
    pub(crate) exposure: Exposure,
    pub(crate) inherited_from: Option<ClassId>,
    pub(crate) inherited: bool,
    pub(crate) rank: u32,
    pub(crate) origin: Origin,
    pub(crate) location: Location,
}

impl FieldItem {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn containing_class(&self) -> ClassId {
        self.containing_class
    }

    pub fn ty(&self) -> &TypeItem {
        &self.ty
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    pub fn initial_value(&self) -> Option<&str> {
        self.initial_value.as_deref()
    }

    pub fn exposure(&self) -> Exposure {
        self.exposure
    }

    pub fn is_hidden(&self) -> bool {
        self.exposure.hidden
    }

    pub fn inherited_from(&self) -> Option<ClassId> {
        self.inherited_from
    }

    pub fn inherited(&self) -> bool {
        self.inherited
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

#[derive(Debug, Clone)]
pub struct PropertyItem {
    pub(crate) id: PropertyId,
    pub(crate) name: SmolStr,
    pub(crate) containing_class: ClassId,
    pub(crate) ty: TypeItem,
    pub(crate) modifiers: ModifierSet,
    pub(crate) exposure: Exposure,
    pub(crate) inherited_from: Option<ClassId>,
    pub(crate) inherited: bool,
    pub(crate) rank: u32,
    pub(crate) origin: Origin,
    pub(crate) location: Location,
}

impl PropertyItem {
    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn containing_class(&self) -> ClassId {
        self.containing_class
    }

    pub fn ty(&self) -> &TypeItem {
        &self.ty
    }

    pub fn modifiers(&self) -> &ModifierSet {
        &self.modifiers
    }

    pub fn exposure(&self) -> Exposure {
        self.exposure
    }

    pub fn is_hidden(&self) -> bool {
        self.exposure.hidden
    }

    pub fn inherited_from(&self) -> Option<ClassId> {
        self.inherited_from
    }

    pub fn inherited(&self) -> bool {
        self.inherited
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn location(&self) -> Location {
        self.location
    }
}
