//! Override & duplication resolver.
//!
//! Queries over the finalized graph: which methods a method overrides, which
//! abstract methods oblige concrete subclasses to re-declare them, and
//! whether two methods have the same signature. Hierarchy walks are bounded
//! by `max_hierarchy_depth` and a visited set, so a malformed cyclic input
//! cannot loop.

use rustc_hash::FxHashSet;
use tracing::trace;

use super::codebase::Codebase;
use super::ids::{ClassId, MethodId};
use super::items::MethodItem;
use super::types::TypeItem;
use crate::syntax::ModifierFlags;

impl Codebase {
    // ========================================================================
    // HIERARCHY WALKS
    // ========================================================================

    /// The super-class chain of `class`, nearest first, excluding `class`.
    pub fn super_class_chain(&self, class: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut visited = FxHashSet::default();
        visited.insert(class);
        let mut current = self.class(class).super_class_id();
        while let Some(id) = current {
            if !visited.insert(id) || chain.len() >= self.config.max_hierarchy_depth {
                break;
            }
            chain.push(id);
            current = self.class(id).super_class_id();
        }
        chain
    }

    /// Every interface reachable from `class` and its super-class chain, in
    /// depth-first declaration order, each once.
    pub fn all_interfaces(&self, class: ClassId) -> Vec<ClassId> {
        let mut roots = vec![class];
        roots.extend(self.super_class_chain(class));

        let mut result = Vec::new();
        let mut visited = FxHashSet::default();
        for root in roots {
            let mut stack: Vec<(ClassId, usize)> = self
                .class(root)
                .interfaces
                .iter()
                .rev()
                .filter_map(|r| r.class())
                .map(|id| (id, 1))
                .collect();
            while let Some((id, depth)) = stack.pop() {
                if depth > self.config.max_hierarchy_depth || !visited.insert(id) {
                    continue;
                }
                result.push(id);
                let item = self.class(id);
                stack.extend(
                    item.interfaces
                        .iter()
                        .rev()
                        .filter_map(|r| r.class())
                        .map(|next| (next, depth + 1)),
                );
            }
        }
        result
    }

    // ========================================================================
    // SUPER METHODS
    // ========================================================================

    /// Methods `method` overrides: the first match up the super-class chain,
    /// then every match among the interfaces in declaration order.
    ///
    /// Constructors override nothing.
    pub fn super_methods(&self, method: MethodId) -> Vec<MethodId> {
        let item = self.method(method);
        if item.is_constructor {
            return Vec::new();
        }
        let class = item.containing_class;
        let mut result = Vec::new();

        for ancestor in self.super_class_chain(class) {
            if let Some(found) = self.find_matching_method(ancestor, method) {
                result.push(found);
                break;
            }
        }
        for interface in self.all_interfaces(class) {
            if let Some(found) = self.find_matching_method(interface, method) {
                if !result.contains(&found) {
                    result.push(found);
                }
            }
        }
        trace!(
            "[OVERRIDE] {} has {} super methods",
            self.method_path(method),
            result.len()
        );
        result
    }

    /// A method declared directly on `class` that `method` would override.
    pub fn find_matching_method(&self, class: ClassId, method: MethodId) -> Option<MethodId> {
        let target = self.method(method);
        self.class(class).methods.iter().copied().find(|&candidate| {
            let other = self.method(candidate);
            candidate != method
                && !other.is_constructor
                && other.name == target.name
                && params_match(target, other)
        })
    }

    // ========================================================================
    // OVERRIDE OBLIGATIONS
    // ========================================================================

    /// Whether a method is abstract, explicitly or as a plain interface method.
    pub fn is_abstract_method(&self, method: MethodId) -> bool {
        let item = self.method(method);
        if item.modifiers.is_abstract() {
            return true;
        }
        let class = self.class(item.containing_class);
        class.is_interface()
            && !item.is_constructor
            && !item.modifiers.is_default()
            && !item.modifiers.is_static()
            && !item.modifiers.is_private()
    }

    /// Not hidden, or hidden but carrying a show annotation.
    pub fn is_visible_method(&self, method: MethodId) -> bool {
        let item = self.method(method);
        !item.exposure.hidden
            || item
                .modifiers
                .annotations()
                .iter()
                .any(|a| self.config.is_show_annotation(a))
    }

    /// Whether every concrete subclass must declare `method`.
    ///
    /// Visible abstract methods always do. Hidden ones do when every method
    /// they override lives on the root type or itself requires an override.
    /// Verdicts are memoized per method; the walk uses an explicit stack.
    pub fn requires_override(&self, method: MethodId) -> bool {
        if let Some(&known) = self.override_memo.borrow().get(&method) {
            return known;
        }

        let mut stack = vec![(method, false)];
        let mut visiting = FxHashSet::default();
        while let Some((id, expanded)) = stack.pop() {
            if self.override_memo.borrow().contains_key(&id) {
                continue;
            }
            if !self.is_abstract_method(id) {
                self.override_memo.borrow_mut().insert(id, false);
                continue;
            }
            if self.is_visible_method(id) {
                self.override_memo.borrow_mut().insert(id, true);
                continue;
            }
            let supers = self.super_methods(id);
            if supers.is_empty() {
                self.override_memo.borrow_mut().insert(id, false);
                continue;
            }

            if expanded {
                let verdict = {
                    let memo = self.override_memo.borrow();
                    supers.iter().all(|&s| {
                        self.is_on_root_type(s) || memo.get(&s).copied().unwrap_or(false)
                    })
                };
                self.override_memo.borrow_mut().insert(id, verdict);
                visiting.remove(&id);
            } else {
                visiting.insert(id);
                stack.push((id, true));
                let memo = self.override_memo.borrow();
                for &s in &supers {
                    if !memo.contains_key(&s) && !visiting.contains(&s) && !self.is_on_root_type(s)
                    {
                        stack.push((s, false));
                    }
                }
            }
        }

        self.override_memo
            .borrow()
            .get(&method)
            .copied()
            .unwrap_or(false)
    }

    // ========================================================================
    // SIGNATURES
    // ========================================================================

    /// Return type, semantic modifiers, parameter types and throws lists all
    /// match. With `compare_raw_types` types are compared by erasure.
    ///
    /// A deprecation mismatch counts as a change when `b` is the side that
    /// is not deprecated.
    pub fn same_signature(&self, a: MethodId, b: MethodId, compare_raw_types: bool) -> bool {
        let (a, b) = (self.method(a), self.method(b));
        let same_type = |x: &TypeItem, y: &TypeItem| {
            if compare_raw_types {
                x.erased() == y.erased()
            } else {
                x.text() == y.text()
            }
        };

        let returns_match = match (&a.return_type, &b.return_type) {
            (Some(x), Some(y)) => same_type(x, y),
            (None, None) => true,
            _ => false,
        };
        if !returns_match || !a.modifiers.equivalent_to(&b.modifiers) {
            return false;
        }
        if a.modifiers.is_deprecated() != b.modifiers.is_deprecated() && !b.modifiers.is_deprecated()
        {
            return false;
        }
        a.parameters.len() == b.parameters.len()
            && a
                .parameters
                .iter()
                .zip(&b.parameters)
                .all(|(x, y)| same_type(&x.ty, &y.ty))
            && a.throws.len() == b.throws.len()
            && a
                .throws
                .iter()
                .zip(&b.throws)
                .all(|(x, y)| x.erased() == y.erased())
    }

    /// Same name and pairwise override-compatible parameter types.
    pub fn override_equivalent(&self, a: MethodId, b: MethodId) -> bool {
        let (a, b) = (self.method(a), self.method(b));
        a.name == b.name && params_match(a, b)
    }

    /// Whether a text stub must still list `method` although it overrides
    /// something.
    ///
    /// For a non-abstract method of a class: a lone root-type super-method
    /// only counts when the signature differs; otherwise the method counts
    /// when none of its super-methods is on the root type. For an interface
    /// method: more than one abstract or default super-method, all
    /// override-equivalent to it.
    pub fn is_required_overriding_method_for_text_stub(&self, method: MethodId) -> bool {
        let item = self.method(method);
        let class = self.class(item.containing_class);
        let supers = self.super_methods(method);
        if supers.is_empty() {
            return false;
        }

        if class.kind.is_class() && !item.modifiers.is_abstract() {
            if let [only] = supers.as_slice() {
                if self.is_on_root_type(*only) {
                    return !self.same_signature(method, *only, false);
                }
            }
            return !supers.iter().any(|&s| self.is_on_root_type(s));
        }

        if class.is_interface() {
            let candidates: Vec<MethodId> = supers
                .into_iter()
                .filter(|&s| {
                    let modifiers = &self.method(s).modifiers;
                    self.is_abstract_method(s) || modifiers.has(ModifierFlags::DEFAULT)
                })
                .collect();
            return candidates.len() > 1
                && candidates
                    .iter()
                    .all(|&s| self.override_equivalent(method, s));
        }
        false
    }
}

/// Parameter lists of equal length whose types match pairwise for override
/// purposes.
pub(crate) fn params_match(a: &MethodItem, b: &MethodItem) -> bool {
    a.parameters.len() == b.parameters.len()
        && a
            .parameters
            .iter()
            .zip(&b.parameters)
            .all(|(x, y)| x.ty.matches_for_override(&y.ty))
}
