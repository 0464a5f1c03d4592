//! Creation of member items from declarations.

use std::sync::Arc;

use super::codebase::Codebase;
use super::ids::{ClassId, FieldId, MethodId, PropertyId};
use super::items::{FieldItem, MethodItem, ParameterItem, PropertyItem};
use super::types::{TypeItem, TypeScope};
use crate::syntax::{ClassDecl, Exposure, FieldDecl, MethodDecl, Origin, PropertyDecl};

impl Codebase {
    /// Type variables visible inside `class`: those of its outer classes
    /// first, then its own.
    pub fn class_scope(&self, class: ClassId) -> TypeScope {
        let mut chain = Vec::new();
        let mut current = Some(class);
        while let Some(id) = current {
            chain.push(id);
            current = self.class(id).containing_class;
        }
        let mut scope = TypeScope::new();
        for id in chain.into_iter().rev() {
            for &variable in &self.class(id).type_parameters {
                self.push_type_variable(&mut scope, variable);
            }
        }
        scope
    }

    /// Class scope extended with the method's own type variables.
    pub fn method_scope(&self, method: MethodId) -> TypeScope {
        let item = self.method(method);
        let mut scope = self.class_scope(item.containing_class);
        for &variable in &item.type_parameters {
            self.push_type_variable(&mut scope, variable);
        }
        scope
    }

    fn push_type_variable(&self, scope: &mut TypeScope, variable: ClassId) {
        let item = self.class(variable);
        let erasure = match (&item.super_class, item.implicit_super) {
            (Some(bound), false) => {
                let name = bound.name();
                scope
                    .erasure_of(name)
                    .cloned()
                    .unwrap_or_else(|| Arc::from(name))
            }
            _ => self.config.root_type.clone(),
        };
        scope.push(item.simple_name.clone(), erasure);
    }

    pub(crate) fn has_hide_annotation(&self, annotations: &[Arc<str>]) -> bool {
        annotations.iter().any(|a| self.config.is_hide_annotation(a))
    }

    fn effective_exposure(&self, exposure: Exposure, annotations: &[Arc<str>]) -> Exposure {
        let mut exposure = exposure;
        exposure.hidden |= self.has_hide_annotation(annotations);
        exposure
    }

    /// Append the members of one declaration unit to `class`.
    pub(crate) fn add_members(&mut self, class: ClassId, decl: &ClassDecl) {
        let scope = self.class_scope(class);
        for field in &decl.fields {
            self.add_field(class, field, &scope, decl.origin);
        }
        for method in &decl.methods {
            self.add_method(class, method, &scope, decl.origin);
        }
        for property in &decl.properties {
            self.add_property(class, property, &scope, decl.origin);
        }
    }

    fn add_method(
        &mut self,
        class: ClassId,
        decl: &MethodDecl,
        class_scope: &TypeScope,
        origin: Origin,
    ) -> MethodId {
        let id = MethodId::new(self.methods.len());
        let surface = self.class(class).surface;
        let type_parameters: Vec<ClassId> = decl
            .type_parameters
            .iter()
            .map(|tp| self.create_type_parameter(tp, surface, origin))
            .collect();
        let mut scope = class_scope.clone();
        for &variable in &type_parameters {
            self.push_type_variable(&mut scope, variable);
        }

        let name = if decl.is_constructor {
            self.class(class).simple_name.clone()
        } else {
            decl.name.clone()
        };
        let parameters = decl
            .parameters
            .iter()
            .enumerate()
            .map(|(index, param)| ParameterItem {
                index,
                name: param.name.clone(),
                public_name: param.public_name.clone(),
                ty: TypeItem::classify(&param.ty, &scope),
                default_value: param.default_value.clone(),
                modifiers: param.modifiers.clone().freeze(),
                method: id,
            })
            .collect();
        let mut throws: Vec<TypeItem> = decl
            .throws
            .iter()
            .map(|ty| TypeItem::classify(ty, &scope))
            .collect();
        throws.sort_by(|a, b| a.erased().cmp(b.erased()));

        let exposure = self.effective_exposure(decl.exposure, decl.modifiers.annotations());
        let rank = self.next_rank();
        self.methods.push(MethodItem {
            id,
            name,
            containing_class: class,
            is_constructor: decl.is_constructor,
            modifiers: decl.modifiers.clone().freeze(),
            return_type: decl
                .return_type
                .as_ref()
                .filter(|_| !decl.is_constructor)
                .map(|ty| TypeItem::classify(ty, &scope)),
            parameters,
            throws,
            type_parameters,
            exposure,
            inherited_from: None,
            inherited: false,
            rank,
            origin,
            location: decl.location,
        });
        self.class_mut(class).methods.push(id);
        id
    }

    fn add_field(
        &mut self,
        class: ClassId,
        decl: &FieldDecl,
        scope: &TypeScope,
        origin: Origin,
    ) -> FieldId {
        let id = FieldId::new(self.fields.len());
        let exposure = self.effective_exposure(decl.exposure, decl.modifiers.annotations());
        let rank = self.next_rank();
        self.fields.push(FieldItem {
            id,
            name: decl.name.clone(),
            containing_class: class,
            ty: TypeItem::classify(&decl.ty, scope),
            modifiers: decl.modifiers.clone().freeze(),
            initial_value: decl.initial_value.clone(),
            exposure,
            inherited_from: None,
            inherited: false,
            rank,
            origin,
            location: decl.location,
        });
        self.class_mut(class).fields.push(id);
        id
    }

    fn add_property(
        &mut self,
        class: ClassId,
        decl: &PropertyDecl,
        scope: &TypeScope,
        origin: Origin,
    ) -> PropertyId {
        let id = PropertyId::new(self.properties.len());
        let exposure = self.effective_exposure(decl.exposure, decl.modifiers.annotations());
        let rank = self.next_rank();
        self.properties.push(PropertyItem {
            id,
            name: decl.name.clone(),
            containing_class: class,
            ty: TypeItem::classify(&decl.ty, scope),
            modifiers: decl.modifiers.clone().freeze(),
            exposure,
            inherited_from: None,
            inherited: false,
            rank,
            origin,
            location: decl.location,
        });
        self.class_mut(class).properties.push(id);
        id
    }
}
