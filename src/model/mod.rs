//! API surface model.
//!
//! ```text
//! session    → Session (codebase + classpath, on-demand resolution)
//!   ↓
//! builder    → GraphBuilder (BuildingSource → ResolvingClasspath → Ready)
//!   ↓
//! finalize   → classpath closure, package linking, hierarchy check
//!   ↓
//! registry   → qualified name → canonical id, find-or-create
//!   ↓
//! codebase   → per-kind arenas, items, diagnostics
//! ```
//!
//! Override queries, duplication and the ordering comparators are free
//! functions or `Codebase` methods shared by both front-ends.

mod builder;
mod codebase;
mod compare;
mod diagnostics;
mod duplicate;
mod finalize;
mod ids;
mod items;
mod members;
mod overrides;
mod registry;
mod session;
mod types;

pub use builder::GraphBuilder;
pub use codebase::{BuildState, Codebase};
pub use compare::{
    MethodOrder, compare_by_signature, compare_by_source_order, compare_classes_by_full_name,
    compare_fields_by_name, compare_overloads_by_source_order,
};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use ids::{ClassId, FieldId, MemberId, MethodId, PackageId, PropertyId};
pub use items::{
    ClassItem, ClassRef, FieldItem, ItemState, MethodItem, PackageItem, PackageLink, ParameterItem,
    PropertyItem, Surface,
};
pub use registry::Registry;
pub use session::Session;
pub use types::{TypeItem, TypeKind, TypeScope};
