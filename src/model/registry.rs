//! Registry & identity resolution.
//!
//! The [`Registry`] maps qualified names to canonical class and package ids.
//! The first registration of a name wins; later registrations of the same
//! name return the existing id. The `Codebase` methods in this module do
//! "find or create" on top of it.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::trace;

use super::codebase::Codebase;
use super::ids::{ClassId, PackageId};
use super::items::{ClassItem, ClassRef, ItemState, PackageItem, PackageLink, Surface};
use crate::base::Location;
use crate::syntax::{ClassDecl, ClassKind, ClassResolver, Origin, TypeParamDecl, TypeRef};

// ============================================================================
// NAME INDEX
// ============================================================================

/// Qualified-name index for one codebase.
#[derive(Debug, Default)]
pub struct Registry {
    classes: IndexMap<Arc<str>, ClassId>,
    packages: IndexMap<Arc<str>, PackageId>,
}

impl Registry {
    pub fn find_class(&self, qualified_name: &str) -> Option<ClassId> {
        self.classes.get(qualified_name).copied()
    }

    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.packages.get(name).copied()
    }

    /// Register `id` under `name` unless the name is taken; returns the
    /// canonical id either way.
    pub(crate) fn register_class(&mut self, name: Arc<str>, id: ClassId) -> ClassId {
        *self.classes.entry(name).or_insert(id)
    }

    pub(crate) fn register_package(&mut self, name: Arc<str>, id: PackageId) -> PackageId {
        *self.packages.entry(name).or_insert(id)
    }

    /// Registered classes in registration order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.values().copied()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

// ============================================================================
// FIND OR CREATE
// ============================================================================

impl Codebase {
    /// Pure lookup; never creates.
    pub fn find_class(&self, qualified_name: &str) -> Option<ClassId> {
        self.registry.find_class(qualified_name)
    }

    /// Return the class for `decl`, creating it and its whole nest when absent.
    ///
    /// An inner class whose outer class is not registered yet has its outer
    /// chain resolved first, outermost first; creating the outer nest
    /// usually creates the requested class as well.
    pub(crate) fn find_or_create(
        &mut self,
        decl: &Arc<ClassDecl>,
        resolver: &dyn ClassResolver,
    ) -> ClassId {
        if let Some(id) = self.find_class(&decl.qualified_name) {
            return id;
        }

        let mut containing = None;
        if let Some(outer) = outer_name(decl) {
            containing = self.resolve_class_name(&outer, resolver);
            if let Some(id) = self.find_class(&decl.qualified_name) {
                return id;
            }
            if containing.is_none() {
                self.diagnostics
                    .orphan_inner_class(decl.location, &decl.qualified_name, &outer);
            }
        }
        self.create_class_nest(decl, containing)
    }

    /// Resolve a qualified class name, creating the class from `resolver` when
    /// it is not registered yet.
    ///
    /// Names the resolver does not know directly are tried as nested names:
    /// shorter dotted prefixes are looked up until one resolves to a class,
    /// whose nest is then created and searched again.
    pub fn resolve_class_name(
        &mut self,
        qualified_name: &str,
        resolver: &dyn ClassResolver,
    ) -> Option<ClassId> {
        if let Some(id) = self.lookup_or_load(qualified_name, resolver) {
            return Some(id);
        }
        let mut prefix = qualified_name;
        while let Some((outer, _)) = prefix.rsplit_once('.') {
            if self.lookup_or_load(outer, resolver).is_some() {
                let found = self.find_class(qualified_name);
                trace!(
                    "[REGISTRY] nested lookup '{}' via '{}' -> {:?}",
                    qualified_name, outer, found
                );
                return found;
            }
            prefix = outer;
        }
        trace!("[REGISTRY] '{}' not found", qualified_name);
        None
    }

    fn lookup_or_load(&mut self, name: &str, resolver: &dyn ClassResolver) -> Option<ClassId> {
        if name.is_empty() {
            return None;
        }
        if let Some(id) = self.find_class(name) {
            return Some(id);
        }
        let decl = resolver.resolve(name)?;
        let id = self.find_or_create(&decl, resolver);
        if *decl.qualified_name == *name {
            Some(id)
        } else {
            self.find_class(name)
        }
    }

    /// Resolve a written type reference to its element class; array
    /// dimensions and type arguments are stripped, primitives never resolve.
    pub(crate) fn resolve_type_ref(
        &mut self,
        ty: &TypeRef,
        resolver: &dyn ClassResolver,
    ) -> ClassRef {
        let name = ty.element_name();
        if ty.is_primitive() || name.is_empty() {
            return ClassRef::Missing(Arc::from(name));
        }
        match self.resolve_class_name(name, resolver) {
            Some(class) => ClassRef::Resolved {
                name: self.class(class).qualified_name.clone(),
                class,
            },
            None => ClassRef::Missing(Arc::from(name)),
        }
    }

    // ========================================================================
    // CREATION
    // ========================================================================

    /// Create the class for `decl` and every nested class not registered yet.
    pub(crate) fn create_class_nest(
        &mut self,
        decl: &Arc<ClassDecl>,
        containing: Option<ClassId>,
    ) -> ClassId {
        let id = ClassId::new(self.classes.len());
        let canonical = self.registry.register_class(decl.qualified_name.clone(), id);
        if canonical != id {
            return canonical;
        }

        let surface = self.creation_surface();
        let package = match containing {
            Some(outer) => self.class(outer).package,
            None if surface.is_classpath() => Some(self.find_or_create_package(
                &decl.package,
                decl.origin,
                Location::Unknown,
            )),
            None => None,
        };

        let (super_class, implicit_super) = match &decl.super_class {
            Some(ty) => (Some(ClassRef::Pending(ty.clone())), false),
            None if self.config.is_root_type(&decl.qualified_name) => (None, false),
            None => (
                Some(ClassRef::Pending(TypeRef::new(&*self.config.root_type))),
                true,
            ),
        };

        let mut exposure = decl.exposure;
        exposure.hidden |= self.has_hide_annotation(decl.modifiers.annotations());

        self.classes.push(ClassItem {
            id,
            qualified_name: decl.qualified_name.clone(),
            simple_name: decl.simple_name.clone(),
            package_name: decl.package.clone(),
            package,
            kind: decl.kind,
            modifiers: decl.modifiers.clone().freeze(),
            type_parameters: Vec::new(),
            super_class,
            implicit_super,
            interfaces: decl
                .interfaces
                .iter()
                .map(|ty| ClassRef::Pending(ty.clone()))
                .collect(),
            containing_class: containing,
            inner_classes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            surface,
            exposure,
            origin: decl.origin,
            location: decl.location,
            state: ItemState::Draft,
            units: vec![decl.clone()],
        });
        trace!(
            "[REGISTRY] created {} '{}' ({:?})",
            decl.kind.keyword(),
            decl.qualified_name,
            surface
        );

        let type_parameters = decl
            .type_parameters
            .iter()
            .map(|tp| self.create_type_parameter(tp, surface, decl.origin))
            .collect();
        self.class_mut(id).type_parameters = type_parameters;
        self.add_members(id, decl);

        if let Some(outer) = containing {
            self.class_mut(outer).inner_classes.push(id);
        } else if let Some(package) = package {
            self.attach_to_package(package, id);
        }
        if surface.is_classpath() {
            self.pending.push_back(id);
        }

        for inner in &decl.inner_classes {
            if self.find_class(&inner.qualified_name).is_none() {
                self.create_class_nest(inner, Some(id));
            }
        }
        id
    }

    /// A type-parameter pseudo-class. Never registered by name; lives in the
    /// root package.
    pub(crate) fn create_type_parameter(
        &mut self,
        decl: &TypeParamDecl,
        surface: Surface,
        origin: Origin,
    ) -> ClassId {
        let id = ClassId::new(self.classes.len());
        let mut bounds = decl.bounds.iter().map(|ty| ClassRef::Pending(ty.clone()));
        let (super_class, implicit_super) = match bounds.next() {
            Some(bound) => (Some(bound), false),
            None => (
                Some(ClassRef::Pending(TypeRef::new(&*self.config.root_type))),
                true,
            ),
        };
        let interfaces = bounds.collect();
        self.classes.push(ClassItem {
            id,
            qualified_name: Arc::from(decl.name.as_str()),
            simple_name: decl.name.clone(),
            package_name: Arc::from(""),
            package: None,
            kind: ClassKind::TypeParameter,
            modifiers: Default::default(),
            type_parameters: Vec::new(),
            super_class,
            implicit_super,
            interfaces,
            containing_class: None,
            inner_classes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            surface,
            exposure: Default::default(),
            origin,
            location: Location::Unknown,
            state: ItemState::Draft,
            units: Vec::new(),
        });
        id
    }

    pub(crate) fn find_or_create_package(
        &mut self,
        name: &str,
        origin: Origin,
        location: Location,
    ) -> PackageId {
        if let Some(id) = self.find_package(name) {
            return id;
        }
        let id = PackageId::new(self.packages.len());
        let hidden = self.config.is_hidden_package(name);
        let surface = if hidden {
            Surface::Classpath
        } else {
            self.creation_surface()
        };
        let name: Arc<str> = Arc::from(name);
        self.packages.push(PackageItem {
            id,
            name: name.clone(),
            link: PackageLink::Unlinked,
            classes: Vec::new(),
            surface,
            hidden,
            origin,
            location,
            state: ItemState::Draft,
        });
        trace!("[REGISTRY] created package '{}' ({:?})", name, surface);
        self.registry.register_package(name, id)
    }

    /// Insert a top-level class keeping the package ordered by full name.
    pub(crate) fn attach_to_package(&mut self, package: PackageId, class: ClassId) {
        let position = {
            let item = self.class(class);
            self.package(package).classes.partition_point(|&other| {
                super::compare::compare_classes_by_full_name(self.class(other), item).is_lt()
            })
        };
        self.package_mut(package).classes.insert(position, class);
    }
}

/// The declared outer class of `decl`, when it is a proper prefix of the
/// declaration's own name.
fn outer_name(decl: &ClassDecl) -> Option<Arc<str>> {
    let outer = decl.containing_class.as_ref()?;
    let is_prefix = decl
        .qualified_name
        .strip_prefix(&**outer)
        .is_some_and(|rest| rest.starts_with('.') && rest.len() > 1);
    is_prefix.then(|| outer.clone())
}
