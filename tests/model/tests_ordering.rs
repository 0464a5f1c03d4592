#![allow(clippy::unwrap_used)]

use std::cmp::Ordering;

use apimodel::model::{MethodId, MethodOrder};
use apimodel::syntax::{ClassDecl, FieldDecl, MethodDecl, SourceSet};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::model_assertions::*;

fn describe(session: &apimodel::Session, methods: &[MethodId]) -> Vec<String> {
    let codebase = session.codebase();
    methods
        .iter()
        .map(|&m| {
            let item = codebase.method(m);
            let params: Vec<&str> = item.parameters().iter().map(|p| p.ty().text()).collect();
            format!("{}({})", item.name(), params.join(","))
        })
        .collect()
}

#[rstest]
#[case::int_first(&["int", "int"], &["int", "String"])]
#[case::string_first(&["int", "String"], &["int", "int"])]
fn test_signature_order_ignores_declaration_order(
    #[case] first: &[&str],
    #[case] second: &[&str],
) {
    let overload = |params: &[&str]| {
        params
            .iter()
            .fold(MethodDecl::new("f").public(), |m, &p| m.param(p))
    };
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .method(overload(first))
            .method(overload(second)),
    );
    let session = session(source);
    let sorted = session.sorted_methods(class(&session, "p.A"), MethodOrder::Signature);
    assert_eq!(describe(&session, &sorted), vec!["f(int,int)", "f(int,String)"]);
}

#[test]
fn test_signature_order_by_name_then_arity() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .method(MethodDecl::new("b").public())
            .method(MethodDecl::new("a").public().param("int").param("int"))
            .method(MethodDecl::new("a").public().param("int")),
    );
    let session = session(source);
    let sorted = session.sorted_methods(class(&session, "p.A"), MethodOrder::default());
    assert_eq!(describe(&session, &sorted), vec!["a(int)", "a(int,int)", "b()"]);
}

#[test]
fn test_source_order_follows_declaration() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .method(MethodDecl::new("zeta").public())
            .method(MethodDecl::new("alpha").public())
            .method(MethodDecl::new("mid").public()),
    );
    let session = session(source);
    let sorted = session.sorted_methods(class(&session, "p.A"), MethodOrder::Source);
    assert_eq!(describe(&session, &sorted), vec!["zeta()", "alpha()", "mid()"]);
}

#[test]
fn test_source_order_places_copies_by_original_rank() {
    let source = SourceSet::new()
        .with(
            ClassDecl::class("p.Base")
                .method(MethodDecl::new("second").public())
                .method(MethodDecl::new("first").public()),
        )
        .with(
            ClassDecl::class("p.Child")
                .extends("p.Base")
                .method(MethodDecl::new("own").public()),
        );
    let mut session = session(source);
    let child = class(&session, "p.Child");
    session.duplicate(method(&session, "p.Base", "first").into(), child);
    session.duplicate(method(&session, "p.Base", "second").into(), child);

    let sorted = session.sorted_methods(child, MethodOrder::Source);
    assert_eq!(describe(&session, &sorted), vec!["second()", "first()", "own()"]);
}

#[test]
fn test_copy_compares_equal_to_its_original() {
    let source = SourceSet::new()
        .with(ClassDecl::class("p.Base").method(MethodDecl::new("m").public().param("long")))
        .with(ClassDecl::class("p.Other").method(MethodDecl::new("m").public().param("int")));
    let mut session = session(source);
    let original = method(&session, "p.Base", "m");
    let other = class(&session, "p.Other");
    let apimodel::model::MemberId::Method(copy) = session.duplicate(original.into(), other) else {
        panic!("expected a method copy");
    };

    let codebase = session.codebase();
    let (original, copy) = (codebase.method(original), codebase.method(copy));
    assert_eq!(original.rank(), copy.rank());
    assert_eq!(MethodOrder::Source.compare(original, copy), Ordering::Equal);

    // Same rank as the original, so it sorts before the later-declared m(int).
    let sorted = session.sorted_methods(other, MethodOrder::Source);
    assert_eq!(describe(&session, &sorted), vec!["m(long)", "m(int)"]);
}

#[test]
fn test_overloads_in_source_order() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .method(MethodDecl::new("put").public().param("java.lang.String"))
            .method(MethodDecl::new("get").public())
            .method(MethodDecl::new("put").public().param("int")),
    );
    let session = session(source);
    let sorted = session.sorted_methods(class(&session, "p.A"), MethodOrder::OverloadsInSource);
    assert_eq!(
        describe(&session, &sorted),
        vec!["get()", "put(java.lang.String)", "put(int)"]
    );
}

#[test]
fn test_fields_sorted_by_name() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .field(FieldDecl::new("beta", "int").public())
            .field(FieldDecl::new("ALPHA", "int").public())
            .field(FieldDecl::new("alpha", "int").public()),
    );
    let session = session(source);
    let codebase = session.codebase();
    let names: Vec<&str> = session
        .sorted_fields(class(&session, "p.A"))
        .into_iter()
        .map(|f| codebase.field(f).name())
        .collect();
    assert_eq!(names, vec!["ALPHA", "alpha", "beta"]);
}

#[test]
fn test_package_top_level_classes_sorted_by_full_name() {
    let source = SourceSet::new()
        .with(ClassDecl::class("p.Zed"))
        .with(ClassDecl::class("p.Alpha").inner(ClassDecl::class("Inner")))
        .with(ClassDecl::class("p.Beta"));
    let session = session(source);
    let codebase = session.codebase();
    let package = session.find_package("p").unwrap();
    let names: Vec<&str> = codebase
        .package(package)
        .classes()
        .iter()
        .map(|&c| codebase.class(c).qualified_name())
        .collect();
    assert_eq!(names, vec!["p.Alpha", "p.Beta", "p.Zed"]);
}
