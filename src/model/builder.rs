//! Two-phase graph builder.
//!
//! ```text
//! BuildingSource ──ingest──▶ packages materialized
//!        │
//!        ▼
//! ResolvingClasspath ──settle (fixpoint)──▶ link packages ──▶ check hierarchy
//!        │
//!        ▼
//!      Ready
//! ```
//!
//! Phase 1 consumes the deduplicated declaration stream once; every class it
//! creates is emitted. Phase 2 closes over referenced classes through the
//! classpath resolver; everything created there comes from the classpath.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::codebase::{BuildState, Codebase};
use super::compare::compare_classes_by_full_name;
use super::ids::{ClassId, PackageId};
use super::items::{ClassRef, Surface};
use crate::base::Location;
use crate::config::SurfaceConfig;
use crate::syntax::{ClassDecl, ClassResolver, DeclarationSource, Origin, PackageDecl};

/// Builds a [`Codebase`] from a declaration source and a classpath resolver.
pub struct GraphBuilder<'a> {
    codebase: Codebase,
    resolver: &'a dyn ClassResolver,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: SurfaceConfig, resolver: &'a dyn ClassResolver) -> Self {
        Self {
            codebase: Codebase::new(config),
            resolver,
        }
    }

    /// Run both phases to completion.
    pub fn build(mut self, source: &dyn DeclarationSource) -> Codebase {
        self.codebase.format = source.format();
        for error in source.syntax_errors() {
            self.codebase
                .diagnostics
                .syntax_error(error.location, &error.message);
        }

        let units = source.declarations();
        debug!(
            "[BUILD] phase 1: {} declaration units from {:?} source",
            units.len(),
            source.origin()
        );
        self.ingest(&units);
        self.materialize_packages(&source.packages(), source.origin());

        self.codebase.state = BuildState::ResolvingClasspath;
        debug!(
            "[BUILD] phase 2: {} packages, {} classes before closure",
            self.codebase.package_count(),
            self.codebase.registry.class_count()
        );
        self.codebase.settle(self.resolver);
        self.codebase.link_packages();
        self.codebase.check_hierarchy();

        self.codebase.state = BuildState::Ready;
        debug!(
            "[BUILD] ready: {} packages, {} classes, {} diagnostics",
            self.codebase.package_count(),
            self.codebase.registry.class_count(),
            self.codebase.diagnostics.len()
        );
        self.codebase
    }

    // ========================================================================
    // PHASE 1
    // ========================================================================

    fn ingest(&mut self, units: &[Arc<ClassDecl>]) {
        let index = UnitIndex::new(units);
        let mut seen: FxHashMap<Arc<str>, Vec<Arc<ClassDecl>>> = FxHashMap::default();

        for unit in units {
            let earlier = seen.entry(unit.qualified_name.clone()).or_default();
            if earlier.iter().any(|u| Arc::ptr_eq(u, unit) || **u == **unit) {
                trace!("[BUILD] skipping repeated unit '{}'", unit.qualified_name);
                continue;
            }
            earlier.push(unit.clone());

            if let Err(reason) = validate(unit) {
                self.codebase
                    .diagnostics
                    .malformed_declaration(unit.location, &unit.qualified_name, &reason);
                continue;
            }

            match self.codebase.find_class(&unit.qualified_name) {
                Some(existing) => {
                    let already_ingested = self
                        .codebase
                        .class(existing)
                        .units
                        .iter()
                        .any(|u| Arc::ptr_eq(u, unit) || **u == **unit);
                    if !already_ingested {
                        merge_unit(&mut self.codebase, existing, unit);
                    }
                }
                None => {
                    self.codebase.find_or_create(unit, &index);
                }
            }
        }
    }

    /// One package per observed package name, with its top-level classes in
    /// full-name order.
    fn materialize_packages(&mut self, declared: &[PackageDecl], origin: Origin) {
        let codebase = &mut self.codebase;
        let mut by_package: BTreeMap<Arc<str>, Vec<ClassId>> = BTreeMap::new();
        for package in declared {
            by_package.entry(package.name.clone()).or_default();
        }
        let roots: Vec<ClassId> = codebase
            .all_classes()
            .filter(|&id| codebase.class(id).containing_class.is_none())
            .collect();
        for id in roots {
            let package = codebase.class(id).package_name.clone();
            by_package.entry(package).or_default().push(id);
        }

        for (name, mut classes) in by_package {
            let decl = declared.iter().find(|p| p.name == name);
            let location = decl.map_or(Location::Unknown, |d| d.location);
            let package = codebase.find_or_create_package(&name, origin, location);
            if decl.is_some_and(|d| d.exposure.hidden) {
                let item = codebase.package_mut(package);
                item.hidden = true;
                item.surface = Surface::Classpath;
            }

            classes.sort_by(|a, b| compare_classes_by_full_name(codebase.class(*a), codebase.class(*b)));
            for &class in &classes {
                assign_package(codebase, class, package);
            }
            codebase.package_mut(package).classes = classes;
            trace!("[BUILD] package '{}' materialized", name);
        }
    }
}

/// Merge another part of a split declaration into an existing class.
fn merge_unit(codebase: &mut Codebase, class: ClassId, unit: &Arc<ClassDecl>) {
    trace!("[BUILD] merging unit into '{}'", unit.qualified_name);
    let item = codebase.class_mut(class);
    item.units.push(unit.clone());
    if item.implicit_super {
        if let Some(ty) = &unit.super_class {
            item.super_class = Some(ClassRef::Pending(ty.clone()));
            item.implicit_super = false;
        }
    }
    for interface in &unit.interfaces {
        let name = interface.element_name();
        if !item.interfaces.iter().any(|known| known.name() == name) {
            item.interfaces.push(ClassRef::Pending(interface.clone()));
        }
    }
    codebase.add_members(class, unit);

    for inner in &unit.inner_classes {
        match codebase.find_class(&inner.qualified_name) {
            Some(existing) => merge_unit(codebase, existing, inner),
            None => {
                codebase.create_class_nest(inner, Some(class));
            }
        }
    }
}

/// Set the package of a class and every class nested in it.
fn assign_package(codebase: &mut Codebase, class: ClassId, package: PackageId) {
    let mut stack = vec![class];
    while let Some(id) = stack.pop() {
        let item = codebase.class_mut(id);
        item.package = Some(package);
        stack.extend(item.inner_classes.iter().copied());
    }
}

/// The source declarations, by qualified name, nested ones included. Used as
/// the resolver while ingesting so outer classes come from the source.
struct UnitIndex {
    by_name: FxHashMap<Arc<str>, Arc<ClassDecl>>,
}

impl UnitIndex {
    fn new(units: &[Arc<ClassDecl>]) -> Self {
        let mut by_name = FxHashMap::default();
        for unit in units {
            unit.walk(&mut |decl| {
                by_name
                    .entry(decl.qualified_name.clone())
                    .or_insert_with(|| decl.clone());
            });
        }
        Self { by_name }
    }
}

impl ClassResolver for UnitIndex {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<ClassDecl>> {
        self.by_name.get(qualified_name).cloned()
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if unicode_ident::is_xid_start(first) || first == '_' || first == '$' => {
            chars.all(|c| unicode_ident::is_xid_continue(c) || c == '$')
        }
        _ => false,
    }
}

fn is_qualified_name(name: &str) -> bool {
    name.split('.').all(is_identifier)
}

/// Check the names a declaration introduces, nested classes included.
fn validate(decl: &ClassDecl) -> Result<(), String> {
    if !is_qualified_name(&decl.qualified_name) {
        return Err("invalid class name".to_string());
    }
    if !decl.package.is_empty() && !is_qualified_name(&decl.package) {
        return Err(format!("invalid package name '{}'", decl.package));
    }
    for parameter in &decl.type_parameters {
        if !is_identifier(&parameter.name) {
            return Err(format!("invalid type parameter '{}'", parameter.name));
        }
    }
    for method in decl.methods.iter().filter(|m| !m.is_constructor) {
        if !is_identifier(&method.name) {
            return Err(format!("invalid method name '{}'", method.name));
        }
    }
    for field in &decl.fields {
        if !is_identifier(&field.name) {
            return Err(format!("invalid field name '{}'", field.name));
        }
    }
    for property in &decl.properties {
        if !is_identifier(&property.name) {
            return Err(format!("invalid property name '{}'", property.name));
        }
    }
    decl.inner_classes.iter().try_for_each(|inner| validate(inner))
}
