//! Copying inherited members into another class.

use tracing::trace;

use super::codebase::Codebase;
use super::ids::{ClassId, FieldId, MemberId, MethodId, PropertyId};
use crate::syntax::ModifierFlags;

impl Codebase {
    /// Copy `member` into `target`.
    ///
    /// The copy records the class it came from and takes its hidden,
    /// removed and doc-only flags from `target`, not from the original.
    /// The declaration rank is kept, so source order places the copy where
    /// the original was declared. The original is left untouched.
    pub fn duplicate(&mut self, member: MemberId, target: ClassId) -> MemberId {
        let exposure = self.class(target).exposure;
        let source = self.member_class(member);
        let copy = match member {
            MemberId::Method(id) => {
                let new_id = MethodId::new(self.methods.len());
                let mut copy = self.method(id).clone();
                copy.id = new_id;
                copy.containing_class = target;
                copy.inherited_from = Some(source);
                copy.inherited = true;
                copy.exposure = exposure;
                for parameter in &mut copy.parameters {
                    parameter.method = new_id;
                }
                self.methods.push(copy);
                self.class_mut(target).methods.push(new_id);
                MemberId::Method(new_id)
            }
            MemberId::Field(id) => {
                let new_id = FieldId::new(self.fields.len());
                let mut copy = self.field(id).clone();
                copy.id = new_id;
                copy.containing_class = target;
                copy.inherited_from = Some(source);
                copy.inherited = true;
                copy.exposure = exposure;
                self.fields.push(copy);
                self.class_mut(target).fields.push(new_id);
                MemberId::Field(new_id)
            }
            MemberId::Property(id) => {
                let new_id = PropertyId::new(self.properties.len());
                let mut copy = self.property(id).clone();
                copy.id = new_id;
                copy.containing_class = target;
                copy.inherited_from = Some(source);
                copy.inherited = true;
                copy.exposure = exposure;
                self.properties.push(copy);
                self.class_mut(target).properties.push(new_id);
                MemberId::Property(new_id)
            }
        };
        trace!(
            "[DUPLICATE] '{}' from '{}' into '{}'",
            self.member_name(member),
            self.class(source).qualified_name,
            self.class(target).qualified_name
        );
        copy
    }

    /// Drop the abstract flag of a copied method, for obligations a
    /// concrete class fulfils.
    pub(crate) fn make_concrete(&mut self, method: MethodId) {
        let item = &mut self.methods[method.index()];
        let mut modifiers = item.modifiers.to_builder();
        modifiers.set(ModifierFlags::ABSTRACT, false);
        item.modifiers = modifiers.freeze();
    }
}
