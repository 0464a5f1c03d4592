//! Deterministic orders over methods, fields and classes.
//!
//! All comparators are total: two methods compare equal only when their
//! names and parameter type texts are identical.

use std::cmp::Ordering;

use super::items::{ClassItem, FieldItem, MethodItem};

/// Which order a per-class method view uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MethodOrder {
    /// Name, then parameter types.
    #[default]
    Signature,
    /// Declaration rank, falling back to signature order.
    Source,
    /// Name first; same-named overloads by declaration rank.
    OverloadsInSource,
}

impl MethodOrder {
    pub fn compare(&self, a: &MethodItem, b: &MethodItem) -> Ordering {
        match self {
            MethodOrder::Signature => compare_by_signature(a, b),
            MethodOrder::Source => compare_by_source_order(a, b),
            MethodOrder::OverloadsInSource => compare_overloads_by_source_order(a, b),
        }
    }
}

/// By name, then parameter type texts position by position ignoring case,
/// then parameter count. Remaining ties break case-sensitively.
pub fn compare_by_signature(a: &MethodItem, b: &MethodItem) -> Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| {
            let pairs = a.parameters().iter().zip(b.parameters());
            for (x, y) in pairs {
                let ordering = cmp_ignore_case(x.ty().text(), y.ty().text());
                if ordering.is_ne() {
                    return ordering;
                }
            }
            Ordering::Equal
        })
        .then_with(|| a.parameters().len().cmp(&b.parameters().len()))
        .then_with(|| {
            let x = a.parameters().iter().map(|p| p.ty().text());
            let y = b.parameters().iter().map(|p| p.ty().text());
            x.cmp(y)
        })
}

/// By declaration rank; copies share their original's rank and fall back to
/// signature order.
pub fn compare_by_source_order(a: &MethodItem, b: &MethodItem) -> Ordering {
    a.rank()
        .cmp(&b.rank())
        .then_with(|| compare_by_signature(a, b))
}

/// Different names compare by name; overloads of one name by rank.
pub fn compare_overloads_by_source_order(a: &MethodItem, b: &MethodItem) -> Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| compare_by_source_order(a, b))
}

pub fn compare_fields_by_name(a: &FieldItem, b: &FieldItem) -> Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| a.rank().cmp(&b.rank()))
}

/// Package name, then the name within the package (`Outer.Inner`).
pub fn compare_classes_by_full_name(a: &ClassItem, b: &ClassItem) -> Ordering {
    a.package_name()
        .cmp(b.package_name())
        .then_with(|| name_in_package(a).cmp(name_in_package(b)))
}

fn name_in_package(class: &ClassItem) -> &str {
    let name = class.qualified_name();
    match class.package_name() {
        "" => name,
        package => name
            .strip_prefix(package)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name),
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let x = a.chars().flat_map(char::to_lowercase);
    let y = b.chars().flat_map(char::to_lowercase);
    x.cmp(y)
}
