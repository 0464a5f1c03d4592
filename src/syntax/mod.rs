//! Front-end declaration records.
//!
//! Everything the model consumes from a language front-end: class, member and
//! package declarations, textual type references, draft modifier sets, and the
//! [`DeclarationSource`] / [`ClassResolver`] capability traits.

mod decl;
mod modifiers;
mod source;
mod type_ref;

pub use decl::{
    ClassDecl, ClassKind, DefaultValue, Exposure, FieldDecl, MethodDecl, Origin, PackageDecl,
    ParamDecl, PropertyDecl, TypeParamDecl,
};
pub use modifiers::{ModifierBuilder, ModifierFlags, ModifierSet, Visibility};
pub use source::{
    ClassResolver, Classpath, DeclarationSource, NoClasspath, SourceSet, SyntaxError,
};
pub use type_ref::{Nullness, PRIMITIVES, TypeRef};
