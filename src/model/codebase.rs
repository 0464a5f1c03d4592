//! The session-scoped entity graph.
//!
//! A [`Codebase`] owns every package, class and member created during one
//! surface-extraction session, in per-kind arenas addressed by ids. The graph
//! is append-only: entities are never removed, and already published fields
//! are not rewritten once their owner is finalized.

use std::cell::RefCell;
use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use super::diagnostics::DiagnosticCollector;
use super::ids::{ClassId, FieldId, MemberId, MethodId, PackageId, PropertyId};
use super::items::{ClassItem, FieldItem, MethodItem, PackageItem, PropertyItem, Surface};
use super::registry::Registry;
use crate::config::SurfaceConfig;
use crate::parser::FileFormat;
use crate::syntax::Exposure;

/// Construction phase of a codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// Ingesting the primary declarations; new entities are emitted.
    BuildingSource,
    /// Closing over referenced classes; new entities come from the classpath.
    ResolvingClasspath,
    Ready,
}

#[derive(Debug)]
pub struct Codebase {
    pub(crate) config: SurfaceConfig,
    pub(crate) registry: Registry,
    pub(crate) packages: Vec<PackageItem>,
    pub(crate) classes: Vec<ClassItem>,
    pub(crate) methods: Vec<MethodItem>,
    pub(crate) fields: Vec<FieldItem>,
    pub(crate) properties: Vec<PropertyItem>,
    pub(crate) state: BuildState,
    pub(crate) format: Option<FileFormat>,
    pub(crate) diagnostics: DiagnosticCollector,
    /// Classes created but not yet finalized.
    pub(crate) pending: VecDeque<ClassId>,
    /// Packages below this index have been handed to finalization.
    pub(crate) finalized_packages: usize,
    /// Classes below this index have had their hierarchy checked.
    pub(crate) hierarchy_checked: usize,
    pub(crate) next_rank: u32,
    pub(crate) override_memo: RefCell<FxHashMap<MethodId, bool>>,
}

impl Codebase {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            registry: Registry::default(),
            packages: Vec::new(),
            classes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            state: BuildState::BuildingSource,
            format: None,
            diagnostics: DiagnosticCollector::new(),
            pending: VecDeque::new(),
            finalized_packages: 0,
            hierarchy_checked: 0,
            next_rank: 0,
            override_memo: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BuildState::Ready
    }

    /// Format of the textual source this codebase was read from, if any.
    pub fn file_format(&self) -> Option<FileFormat> {
        self.format
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.diagnostics
    }

    /// Surface given to entities created now.
    pub(crate) fn creation_surface(&self) -> Surface {
        match self.state {
            BuildState::BuildingSource => Surface::Emit,
            BuildState::ResolvingClasspath | BuildState::Ready => Surface::Classpath,
        }
    }

    pub(crate) fn next_rank(&mut self) -> u32 {
        let rank = self.next_rank;
        self.next_rank += 1;
        rank
    }

    // ========================================================================
    // ARENA ACCESS
    // ========================================================================

    pub fn class(&self, id: ClassId) -> &ClassItem {
        &self.classes[id.index()]
    }

    pub fn package(&self, id: PackageId) -> &PackageItem {
        &self.packages[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &MethodItem {
        &self.methods[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &FieldItem {
        &self.fields[id.index()]
    }

    pub fn property(&self, id: PropertyId) -> &PropertyItem {
        &self.properties[id.index()]
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> &mut ClassItem {
        &mut self.classes[id.index()]
    }

    pub(crate) fn package_mut(&mut self, id: PackageId) -> &mut PackageItem {
        &mut self.packages[id.index()]
    }

    /// Number of class items, pseudo-classes included.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Every registered class, in registration order.
    pub fn all_classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.registry.class_ids()
    }

    /// Every package, ordered by name.
    pub fn all_packages(&self) -> Vec<PackageId> {
        let mut packages: Vec<PackageId> = self.packages.iter().map(|p| p.id).collect();
        packages.sort_by(|a, b| self.package(*a).name.cmp(&self.package(*b).name));
        packages
    }

    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.registry.find_package(name)
    }

    // ========================================================================
    // MEMBER HELPERS
    // ========================================================================

    pub fn member_name(&self, member: MemberId) -> &str {
        match member {
            MemberId::Method(id) => self.method(id).name(),
            MemberId::Field(id) => self.field(id).name(),
            MemberId::Property(id) => self.property(id).name(),
        }
    }

    pub fn member_class(&self, member: MemberId) -> ClassId {
        match member {
            MemberId::Method(id) => self.method(id).containing_class,
            MemberId::Field(id) => self.field(id).containing_class,
            MemberId::Property(id) => self.property(id).containing_class,
        }
    }

    pub fn member_exposure(&self, member: MemberId) -> Exposure {
        match member {
            MemberId::Method(id) => self.method(id).exposure,
            MemberId::Field(id) => self.field(id).exposure,
            MemberId::Property(id) => self.property(id).exposure,
        }
    }

    /// The class a duplicated member was copied from.
    pub fn member_inherited_from(&self, member: MemberId) -> Option<ClassId> {
        match member {
            MemberId::Method(id) => self.method(id).inherited_from,
            MemberId::Field(id) => self.field(id).inherited_from,
            MemberId::Property(id) => self.property(id).inherited_from,
        }
    }

    /// Whether the method is declared on the universal root type.
    pub fn is_on_root_type(&self, method: MethodId) -> bool {
        let class = self.class(self.method(method).containing_class);
        self.config.is_root_type(&class.qualified_name)
    }

    /// Qualified name of a method for messages: `p.C.m`.
    pub fn method_path(&self, method: MethodId) -> String {
        let item = self.method(method);
        format!(
            "{}.{}",
            self.class(item.containing_class).qualified_name,
            item.name
        )
    }
}
