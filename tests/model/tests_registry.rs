//! Registry identity and name resolution.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use apimodel::model::GraphBuilder;
use apimodel::syntax::{ClassDecl, ClassKind, FieldDecl, MethodDecl, NoClasspath, SourceSet, TypeParamDecl};
use apimodel::{Session, SurfaceConfig};

use crate::helpers::fixtures::*;
use crate::helpers::model_assertions::*;

// =============================================================================
// IDENTITY
// =============================================================================

#[test]
fn test_repeated_resolution_returns_same_identity() {
    let mut session = session(
        SourceSet::new().with(ClassDecl::class("p.A").field(FieldDecl::new("s", "java.lang.String"))),
    );
    let first = session.find_class("java.lang.String").unwrap();
    let again = session.resolve_class("java.lang.String").unwrap();
    assert_eq!(first, again);
    assert_eq!(session.find_class("java.lang.String"), Some(first));

    let runnable = session.resolve_class("java.lang.Runnable").unwrap();
    assert_eq!(session.resolve_class("java.lang.Runnable"), Some(runnable));
    assert_eq!(session.find_class("java.lang.Runnable"), Some(runnable));
}

#[test]
fn test_find_never_creates() {
    let session = session(SourceSet::new().with(ClassDecl::class("p.A")));
    assert!(session.find_class("java.lang.Runnable").is_none());
    assert!(session.find_class("p.Missing").is_none());
}

#[test]
fn test_identical_units_are_ingested_once() {
    let decl = ClassDecl::class("p.A").method(MethodDecl::new("run").public());
    let session = session(SourceSet::new().with(decl.clone()).with(decl));
    let a = class(&session, "p.A");
    assert_eq!(session.codebase().class(a).methods().len(), 1);
    assert_eq!(session.codebase().package(session.find_package("p").unwrap()).classes(), &[a]);
}

#[test]
fn test_split_declaration_is_merged_into_one_class() {
    let source = SourceSet::new()
        .with(
            ClassDecl::class("p.A")
                .implements("java.lang.Runnable")
                .method(MethodDecl::new("first").public()),
        )
        .with(
            ClassDecl::class("p.A")
                .extends("p.Base")
                .implements("java.lang.Runnable")
                .implements("java.lang.CharSequence")
                .method(MethodDecl::new("second").public()),
        )
        .with(ClassDecl::class("p.Base"));
    let session = session(source);
    let codebase = session.codebase();
    let a = codebase.class(class(&session, "p.A"));

    let names: Vec<&str> = a.methods().iter().map(|&m| codebase.method(m).name()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(a.interfaces().len(), 2);
    assert_eq!(a.super_class_id(), session.find_class("p.Base"));
}

// =============================================================================
// NESTED NAMES
// =============================================================================

#[test]
fn test_inner_class_resolved_through_outer() {
    // Only the outer class is known by name to this resolver.
    let resolver = |name: &str| {
        (name == "q.Outer").then(|| {
            Arc::new(
                ClassDecl::class("q.Outer")
                    .public()
                    .inner(ClassDecl::class("Inner").public()),
            )
        })
    };
    let source = SourceSet::new().with(ClassDecl::class("p.A").extends("q.Outer.Inner"));
    let session = Session::new(&source, resolver, SurfaceConfig::default());

    let outer = class(&session, "q.Outer");
    let inner = class(&session, "q.Outer.Inner");
    let codebase = session.codebase();
    assert_eq!(codebase.class(inner).containing_class(), Some(outer));
    assert_eq!(codebase.class(outer).inner_classes(), &[inner]);
    assert_eq!(codebase.class(class(&session, "p.A")).super_class_id(), Some(inner));
    assert_from_classpath(&session, "q.Outer.Inner");
}

#[test]
fn test_source_inner_classes_follow_their_outer() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.Outer")
            .inner(ClassDecl::class("Middle").inner(ClassDecl::interface("Inner"))),
    );
    let session = session(source);
    let codebase = session.codebase();
    let outer = class(&session, "p.Outer");
    let middle = class(&session, "p.Outer.Middle");
    let inner = class(&session, "p.Outer.Middle.Inner");
    assert!(outer < middle && middle < inner);
    assert_eq!(codebase.class(inner).kind(), ClassKind::Interface);
    assert_eq!(codebase.class(inner).package(), session.find_package("p"));
    assert_emitted(&session, "p.Outer.Middle.Inner");
}

#[test]
fn test_array_types_resolve_their_element_class() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .field(FieldDecl::new("grid", "java.lang.String[][]"))
            .method(MethodDecl::new("entries").returns("java.util.Map.Entry[]")),
    );
    let session = session(source);
    assert_from_classpath(&session, "java.lang.String");
    assert_from_classpath(&session, "java.util.Map.Entry");
    assert!(session.find_class("java.lang.String[][]").is_none());
}

// =============================================================================
// TYPE PARAMETERS
// =============================================================================

#[test]
fn test_type_parameters_are_not_registered() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.Box")
            .type_parameter(TypeParamDecl::new("T").bound("java.lang.CharSequence"))
            .field(FieldDecl::new("value", "T")),
    );
    let session = session(source);
    let codebase = session.codebase();
    let boxed = codebase.class(class(&session, "p.Box"));
    assert!(session.find_class("T").is_none());

    let t = codebase.class(boxed.type_parameters()[0]);
    assert!(t.is_type_parameter());
    let root = session.find_package("").unwrap();
    assert_eq!(t.package(), Some(root));
    assert_eq!(t.package_name(), "");
    assert!(!codebase.package(root).classes().contains(&t.id()));
    assert_eq!(t.super_class_id(), session.find_class("java.lang.CharSequence"));

    let field = codebase.field(boxed.fields()[0]);
    assert!(field.ty().is_type_variable());
    assert_eq!(field.ty().erased(), "java.lang.CharSequence");
}

#[test]
fn test_builder_without_classpath_leaves_references_missing() {
    let source = SourceSet::new().with(ClassDecl::class("p.A").extends("q.Gone"));
    let codebase = GraphBuilder::new(SurfaceConfig::default(), &NoClasspath).build(&source);
    let a = codebase.class(codebase.find_class("p.A").unwrap());
    assert!(a.super_class().unwrap().is_missing());
    assert_eq!(a.super_class().unwrap().name(), "q.Gone");
    assert!(codebase.find_class("q.Gone").is_none());
}
