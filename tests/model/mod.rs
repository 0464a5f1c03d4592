//! Model layer tests
//!
//! - Registry identity and nested-name resolution
//! - Two-phase graph construction and classpath closure
//! - Override and duplication queries
//! - Ordering comparators
//! - Session-level flattening and on-demand resolution

pub mod tests_builder;
pub mod tests_ordering;
pub mod tests_overrides;
pub mod tests_registry;
