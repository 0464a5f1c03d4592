//! One surface-extraction session.
//!
//! A [`Session`] owns the codebase built from one declaration source together
//! with the classpath resolver used to close over it. Queries that may need
//! classes nobody has referenced yet go through the session, which creates
//! them on demand and finalizes them before returning. Dropping the session
//! releases the whole graph.

use tracing::debug;

use super::builder::GraphBuilder;
use super::codebase::Codebase;
use super::compare::{MethodOrder, compare_fields_by_name};
use super::diagnostics::DiagnosticCollector;
use super::ids::{ClassId, FieldId, MemberId, MethodId, PackageId};
use crate::config::SurfaceConfig;
use crate::parser::{FileFormat, FormatError, parse_signature};
use crate::syntax::{ClassResolver, DeclarationSource};

pub struct Session {
    codebase: Codebase,
    resolver: Box<dyn ClassResolver>,
}

impl Session {
    /// Build the codebase for `source`, resolving everything else through
    /// `resolver`.
    pub fn new(
        source: &dyn DeclarationSource,
        resolver: impl ClassResolver + 'static,
        config: SurfaceConfig,
    ) -> Self {
        let codebase = GraphBuilder::new(config, &resolver).build(source);
        Self {
            codebase,
            resolver: Box::new(resolver),
        }
    }

    /// Parse signature text and build a session from it. An empty input or
    /// an unknown format marker fails before any entity is created.
    pub fn from_signature_text(
        text: &str,
        resolver: impl ClassResolver + 'static,
        config: SurfaceConfig,
    ) -> Result<Self, FormatError> {
        let file = parse_signature(text)?;
        Ok(Self::new(&file, resolver, config))
    }

    pub fn codebase(&self) -> &Codebase {
        &self.codebase
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        self.codebase.diagnostics()
    }

    pub fn file_format(&self) -> Option<FileFormat> {
        self.codebase.file_format()
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    pub fn find_class(&self, qualified_name: &str) -> Option<ClassId> {
        self.codebase.find_class(qualified_name)
    }

    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.codebase.find_package(name)
    }

    /// Every package, ordered by name.
    pub fn all_packages(&self) -> Vec<PackageId> {
        self.codebase.all_packages()
    }

    /// Look a class up, loading it from the classpath when it is not known
    /// yet. Anything created on the way is finalized before this returns.
    pub fn resolve_class(&mut self, qualified_name: &str) -> Option<ClassId> {
        if let Some(id) = self.codebase.find_class(qualified_name) {
            return Some(id);
        }
        let found = self
            .codebase
            .resolve_class_name(qualified_name, &*self.resolver);
        self.settle();
        debug!("[SESSION] on-demand '{}' -> {:?}", qualified_name, found);
        found
    }

    fn settle(&mut self) {
        self.codebase.settle(&*self.resolver);
        self.codebase.link_packages();
        self.codebase.check_hierarchy();
    }

    // ========================================================================
    // OVERRIDES
    // ========================================================================

    pub fn super_methods(&self, method: MethodId) -> Vec<MethodId> {
        self.codebase.super_methods(method)
    }

    pub fn requires_override(&self, method: MethodId) -> bool {
        self.codebase.requires_override(method)
    }

    pub fn duplicate(&mut self, member: MemberId, target: ClassId) -> MemberId {
        self.codebase.duplicate(member, target)
    }

    /// Copy into a concrete `class` every inherited abstract method that
    /// requires an override and that neither the class nor a super-class
    /// implements. Override-equivalent obligations are copied once. The
    /// copies are not abstract.
    pub fn add_required_overrides(&mut self, class: ClassId) -> Vec<MethodId> {
        let codebase = &self.codebase;
        if !codebase.class(class).is_concrete() {
            return Vec::new();
        }
        let chain = codebase.super_class_chain(class);
        let mut ancestors = chain.clone();
        ancestors.extend(codebase.all_interfaces(class));

        let implemented = |method: MethodId| {
            std::iter::once(class).chain(chain.iter().copied()).any(|c| {
                codebase
                    .find_matching_method(c, method)
                    .is_some_and(|found| c == class || !codebase.is_abstract_method(found))
            })
        };

        let mut obligations: Vec<MethodId> = Vec::new();
        for &ancestor in &ancestors {
            for &method in codebase.class(ancestor).methods() {
                if !codebase.is_abstract_method(method)
                    || !codebase.requires_override(method)
                    || implemented(method)
                    || obligations
                        .iter()
                        .any(|&known| codebase.override_equivalent(known, method))
                {
                    continue;
                }
                obligations.push(method);
            }
        }

        let mut added = Vec::with_capacity(obligations.len());
        for method in obligations {
            if let MemberId::Method(copy) = self.codebase.duplicate(method.into(), class) {
                self.codebase.make_concrete(copy);
                added.push(copy);
            }
        }
        debug!(
            "[SESSION] {} required overrides added to '{}'",
            added.len(),
            self.codebase.class(class).qualified_name()
        );
        added
    }

    /// Copy methods and fields declared on hidden super-classes and
    /// interfaces into `class`, skipping private members, constructors and
    /// anything the class already declares.
    pub fn inherit_from_hidden_supers(&mut self, class: ClassId) -> Vec<MemberId> {
        let codebase = &self.codebase;
        let mut ancestors = codebase.super_class_chain(class);
        ancestors.extend(codebase.all_interfaces(class));
        ancestors.retain(|&a| codebase.class(a).is_hidden());

        let mut methods: Vec<MethodId> = Vec::new();
        let mut fields: Vec<FieldId> = Vec::new();
        for &ancestor in &ancestors {
            let item = codebase.class(ancestor);
            for &method in item.methods() {
                let m = codebase.method(method);
                if m.is_constructor()
                    || m.modifiers().is_private()
                    || codebase.find_matching_method(class, method).is_some()
                    || methods
                        .iter()
                        .any(|&known| codebase.override_equivalent(known, method))
                {
                    continue;
                }
                methods.push(method);
            }
            for &field in item.fields() {
                let f = codebase.field(field);
                let declared = |fid: &FieldId| codebase.field(*fid).name() == f.name();
                if f.modifiers().is_private()
                    || codebase.class(class).fields().iter().any(declared)
                    || fields.iter().any(declared)
                {
                    continue;
                }
                fields.push(field);
            }
        }

        let members: Vec<MemberId> = methods
            .into_iter()
            .map(MemberId::from)
            .chain(fields.into_iter().map(MemberId::from))
            .collect();
        members
            .into_iter()
            .map(|member| self.codebase.duplicate(member, class))
            .collect()
    }

    // ========================================================================
    // ORDERED VIEWS
    // ========================================================================

    pub fn sorted_methods(&self, class: ClassId, order: MethodOrder) -> Vec<MethodId> {
        let mut methods = self.codebase.class(class).methods().to_vec();
        methods.sort_by(|&a, &b| order.compare(self.codebase.method(a), self.codebase.method(b)));
        methods
    }

    pub fn sorted_fields(&self, class: ClassId) -> Vec<FieldId> {
        let mut fields = self.codebase.class(class).fields().to_vec();
        fields.sort_by(|&a, &b| compare_fields_by_name(self.codebase.field(a), self.codebase.field(b)));
        fields
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("packages", &self.codebase.package_count())
            .field("classes", &self.codebase.class_count())
            .field("diagnostics", &self.codebase.diagnostics().len())
            .finish()
    }
}
