//! Stable identities for model entities.
//!
//! Every entity lives in a per-kind arena inside a
//! [`Codebase`](super::Codebase); an id is its index there. Ids are only
//! meaningful for the codebase that handed them out and are never reused.

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index as u32)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// Identity of a class item, including type-parameter pseudo-classes.
    ClassId,
    "class"
);
entity_id!(PackageId, "package");
entity_id!(MethodId, "method");
entity_id!(FieldId, "field");
entity_id!(PropertyId, "property");

/// Any member of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberId {
    Method(MethodId),
    Field(FieldId),
    Property(PropertyId),
}

impl From<MethodId> for MemberId {
    fn from(id: MethodId) -> Self {
        MemberId::Method(id)
    }
}

impl From<FieldId> for MemberId {
    fn from(id: FieldId) -> Self {
        MemberId::Field(id)
    }
}

impl From<PropertyId> for MemberId {
    fn from(id: PropertyId) -> Self {
        MemberId::Property(id)
    }
}
