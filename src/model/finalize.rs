//! Finalization and classpath closure.
//!
//! Finalizing a package hands its classes to class finalization; finalizing a
//! class resolves its super-class, interfaces, type-parameter bounds and (for
//! emitted classes) member types. Any class created on the way comes from the
//! classpath and is queued for the same treatment, so [`Codebase::settle`]
//! runs until no package or class is left unfinalized.

use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::codebase::Codebase;
use super::ids::{ClassId, PackageId};
use super::items::{ClassRef, ItemState, PackageLink};
use super::types::TypeScope;
use crate::base::Location;
use crate::syntax::{ClassResolver, Origin, PRIMITIVES, TypeRef};

impl Codebase {
    /// Mark a package finalized and queue its classes. Idempotent.
    pub fn finalize_package(&mut self, id: PackageId) {
        if self.package(id).state == ItemState::Finalized {
            return;
        }
        self.package_mut(id).state = ItemState::Finalized;
        trace!("[FINALIZE] package '{}'", self.package(id).name);
        let classes = self.package(id).classes.clone();
        self.pending.extend(classes);
    }

    /// Resolve everything a class refers to. Idempotent.
    pub(crate) fn finalize_class(&mut self, id: ClassId, resolver: &dyn ClassResolver) {
        if self.class(id).state == ItemState::Finalized {
            return;
        }
        // Marked first so hierarchy cycles stop here.
        self.class_mut(id).state = ItemState::Finalized;
        trace!("[FINALIZE] class '{}'", self.class(id).qualified_name);

        let scope = self.class_scope(id);
        let location = self.class(id).location;
        let qualified_name = self.class(id).qualified_name.clone();

        if let Some(ClassRef::Pending(ty)) = self.class(id).super_class.clone() {
            let resolved = self.resolve_in_scope(&ty, &scope, resolver);
            if resolved.is_missing() && !self.class(id).implicit_super {
                self.diagnostics
                    .unresolved_super_class(location, &qualified_name, resolved.name());
            }
            self.class_mut(id).super_class = Some(resolved);
        }

        let interfaces = self.class(id).interfaces.clone();
        let mut resolved_interfaces = Vec::with_capacity(interfaces.len());
        for interface in interfaces {
            let resolved = match interface {
                ClassRef::Pending(ty) => {
                    let resolved = self.resolve_in_scope(&ty, &scope, resolver);
                    if resolved.is_missing() {
                        self.diagnostics
                            .unresolved_interface(location, &qualified_name, resolved.name());
                    }
                    resolved
                }
                done => done,
            };
            resolved_interfaces.push(resolved);
        }
        self.class_mut(id).interfaces = resolved_interfaces;

        for variable in self.class(id).type_parameters.clone() {
            self.finalize_type_parameter(variable, &scope, resolver);
        }
        for method in self.class(id).methods.clone() {
            let method_scope = self.method_scope(method);
            for variable in self.method(method).type_parameters.clone() {
                self.finalize_type_parameter(variable, &method_scope, resolver);
            }
        }

        if self.class(id).surface.is_emit() || self.config.resolve_classpath_members {
            self.resolve_member_types(id, resolver);
        }

        let inner = self.class(id).inner_classes.clone();
        self.pending.extend(inner);
    }

    fn finalize_type_parameter(
        &mut self,
        id: ClassId,
        scope: &TypeScope,
        resolver: &dyn ClassResolver,
    ) {
        if self.class(id).state == ItemState::Finalized {
            return;
        }
        self.class_mut(id).state = ItemState::Finalized;
        if let Some(ClassRef::Pending(ty)) = self.class(id).super_class.clone() {
            let resolved = self.resolve_in_scope(&ty, scope, resolver);
            self.class_mut(id).super_class = Some(resolved);
        }
        let bounds = self.class(id).interfaces.clone();
        let mut resolved_bounds = Vec::with_capacity(bounds.len());
        for bound in bounds {
            resolved_bounds.push(match bound {
                ClassRef::Pending(ty) => self.resolve_in_scope(&ty, scope, resolver),
                done => done,
            });
        }
        self.class_mut(id).interfaces = resolved_bounds;
    }

    /// Resolve a reference written inside `scope`: type arguments are closed
    /// over too, and type variables never resolve to classes.
    fn resolve_in_scope(
        &mut self,
        ty: &TypeRef,
        scope: &TypeScope,
        resolver: &dyn ClassResolver,
    ) -> ClassRef {
        let element = ty.element_name();
        let arguments: Vec<String> = ty
            .referenced_names()
            .into_iter()
            .filter(|name| *name != element && !scope.contains(name))
            .map(str::to_string)
            .collect();
        for argument in arguments {
            self.resolve_class_name(&argument, resolver);
        }
        if scope.contains(element) {
            return ClassRef::Missing(Arc::from(element));
        }
        self.resolve_type_ref(ty, resolver)
    }

    fn resolve_member_types(&mut self, id: ClassId, resolver: &dyn ClassResolver) {
        let mut names: Vec<Arc<str>> = Vec::new();
        let mut seen: FxHashSet<Arc<str>> = FxHashSet::default();
        let mut push = |name: &Arc<str>| {
            if seen.insert(name.clone()) {
                names.push(name.clone());
            }
        };

        let class = self.class(id);
        for &method in &class.methods {
            let method = self.method(method);
            if let Some(ty) = &method.return_type {
                ty.referenced_names().iter().for_each(&mut push);
            }
            for parameter in &method.parameters {
                parameter.ty.referenced_names().iter().for_each(&mut push);
            }
            for ty in &method.throws {
                ty.referenced_names().iter().for_each(&mut push);
            }
        }
        for &field in &class.fields {
            self.field(field).ty.referenced_names().iter().for_each(&mut push);
        }
        for &property in &class.properties {
            self.property(property)
                .ty
                .referenced_names()
                .iter()
                .for_each(&mut push);
        }

        for name in names {
            if !PRIMITIVES.contains(&&*name) && self.resolve_class_name(&name, resolver).is_none() {
                trace!("[FINALIZE] member type '{}' not found", name);
            }
        }
    }

    /// Run finalization to a fixed point: finalize every package not yet
    /// handed over, then every queued class, until neither produces new work.
    pub fn settle(&mut self, resolver: &dyn ClassResolver) {
        let packages_before = self.packages.len();
        let classes_before = self.registry.class_count();
        let mut rounds = 0usize;

        while self.finalized_packages < self.packages.len() || !self.pending.is_empty() {
            rounds += 1;
            if rounds > self.config.max_closure_rounds {
                warn!(
                    "[SETTLE] stopped after {} rounds with {} classes pending",
                    self.config.max_closure_rounds,
                    self.pending.len()
                );
                break;
            }
            while self.finalized_packages < self.packages.len() {
                let package = PackageId::new(self.finalized_packages);
                self.finalized_packages += 1;
                self.finalize_package(package);
            }
            while let Some(class) = self.pending.pop_front() {
                self.finalize_class(class, resolver);
            }
        }

        debug!(
            "[SETTLE] {} rounds: {} new packages, {} new classes",
            rounds,
            self.packages.len() - packages_before,
            self.registry.class_count() - classes_before
        );
    }

    /// Link every package to its parent, synthesizing missing intermediate
    /// packages. Synthesized packages follow the current creation policy and
    /// have an unknown location.
    pub fn link_packages(&mut self) {
        let mut index = 0;
        while index < self.packages.len() {
            let id = PackageId::new(index);
            index += 1;
            if self.package(id).link != PackageLink::Unlinked {
                continue;
            }
            let name = self.package(id).name.clone();
            if name.is_empty() {
                self.package_mut(id).link = PackageLink::Root;
                continue;
            }
            let parent_name = name.rsplit_once('.').map_or("", |(parent, _)| parent);
            let parent = match self.find_package(parent_name) {
                Some(parent) => parent,
                None => self.synthesize_package(parent_name),
            };
            self.package_mut(id).link = PackageLink::Parent(parent);
        }
        self.place_type_parameters();
    }

    fn synthesize_package(&mut self, name: &str) -> PackageId {
        let id = self.find_or_create_package(name, Origin::Synthetic, Location::Unknown);
        self.package_mut(id).state = ItemState::Finalized;
        trace!("[LINK] synthesized package '{}'", name);
        id
    }

    /// Type-parameter pseudo-classes live in the root package.
    fn place_type_parameters(&mut self) {
        let unplaced: Vec<ClassId> = self
            .classes
            .iter()
            .filter(|c| c.is_type_parameter() && c.package.is_none())
            .map(|c| c.id)
            .collect();
        if unplaced.is_empty() {
            return;
        }
        let root = match self.find_package("") {
            Some(root) => root,
            None => {
                let root = self.synthesize_package("");
                self.package_mut(root).link = PackageLink::Root;
                root
            }
        };
        for id in unplaced {
            self.class_mut(id).package = Some(root);
        }
    }

    /// Report classes on a super-class or interface cycle and hierarchies
    /// deeper than the configured cap. Classes already checked are skipped.
    pub fn check_hierarchy(&mut self) {
        let limit = self.config.max_hierarchy_depth;
        while self.hierarchy_checked < self.classes.len() {
            let id = ClassId::new(self.hierarchy_checked);
            self.hierarchy_checked += 1;
            if self.class(id).is_type_parameter() {
                continue;
            }

            let mut visited = FxHashSet::default();
            let mut current = self.class(id).super_class_id();
            let mut depth = 0;
            while let Some(class) = current {
                if class == id {
                    let item = self.class(id);
                    let (location, name) = (item.location, item.qualified_name.clone());
                    self.diagnostics.circular_inheritance(location, &name);
                    break;
                }
                if !visited.insert(class) {
                    break;
                }
                depth += 1;
                if depth > limit {
                    let item = self.class(id);
                    let (location, name) = (item.location, item.qualified_name.clone());
                    self.diagnostics.depth_limit(location, &name, limit);
                    break;
                }
                current = self.class(class).super_class_id();
            }

            self.check_interface_graph(id, limit);
        }
    }

    /// Depth-first walk over the interfaces reachable from `id`, reporting
    /// `id` when it can reach itself or when the walk exceeds `limit`.
    fn check_interface_graph(&mut self, id: ClassId, limit: usize) {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<(ClassId, usize)> = self
            .class(id)
            .interfaces
            .iter()
            .filter_map(|r| r.class())
            .map(|next| (next, 1))
            .collect();
        let mut on_cycle = false;
        let mut too_deep = false;
        while let Some((class, depth)) = stack.pop() {
            if class == id {
                on_cycle = true;
                break;
            }
            if depth > limit {
                too_deep = true;
                continue;
            }
            if !visited.insert(class) {
                continue;
            }
            stack.extend(
                self.class(class)
                    .interfaces
                    .iter()
                    .filter_map(|r| r.class())
                    .map(|next| (next, depth + 1)),
            );
        }

        if on_cycle || too_deep {
            let item = self.class(id);
            let (location, name) = (item.location, item.qualified_name.clone());
            if on_cycle {
                self.diagnostics.circular_inheritance(location, &name);
            } else {
                self.diagnostics.depth_limit(location, &name, limit);
            }
        }
    }
}
