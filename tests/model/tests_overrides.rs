//! Override relationships and signature comparison.

#![allow(clippy::unwrap_used)]

use apimodel::model::MemberId;
use apimodel::syntax::{ClassDecl, FieldDecl, MethodDecl, ModifierFlags, SourceSet, TypeParamDecl};
use apimodel::SurfaceConfig;

use crate::helpers::fixtures::*;
use crate::helpers::model_assertions::*;

// =============================================================================
// SUPER METHODS
// =============================================================================

#[test]
fn test_super_class_walk_stops_at_first_match() {
    let source = SourceSet::new()
        .with(ClassDecl::class("p.A").method(MethodDecl::new("m").public()))
        .with(ClassDecl::class("p.B").extends("p.A").method(MethodDecl::new("m").public()))
        .with(
            ClassDecl::class("p.C")
                .extends("p.B")
                .implements("p.I")
                .implements("p.J")
                .method(MethodDecl::new("m").public()),
        )
        .with(ClassDecl::interface("p.I").method(abstract_method("m")))
        .with(ClassDecl::interface("p.J").method(abstract_method("m")));
    let session = session(source);

    let supers = session.super_methods(method(&session, "p.C", "m"));
    assert_eq!(
        method_names(&session, &supers),
        vec!["p.B.m", "p.I.m", "p.J.m"]
    );
}

#[test]
fn test_parameter_types_must_match() {
    let source = SourceSet::new()
        .with(ClassDecl::class("p.A").method(MethodDecl::new("m").public().param("int")))
        .with(
            ClassDecl::class("p.B")
                .extends("p.A")
                .method(MethodDecl::new("m").public().param("long")),
        );
    let session = session(source);
    assert!(session.super_methods(method(&session, "p.B", "m")).is_empty());
}

#[test]
fn test_type_variables_match_any_erasure() {
    let source = SourceSet::new()
        .with(
            ClassDecl::interface("p.Visitor")
                .type_parameter(TypeParamDecl::new("T"))
                .method(abstract_method("visit").param("T")),
        )
        .with(
            ClassDecl::class("p.Printer")
                .implements("p.Visitor<java.lang.String>")
                .method(MethodDecl::new("visit").public().param("java.lang.String")),
        );
    let session = session(source);
    assert_eq!(
        session.super_methods(method(&session, "p.Printer", "visit")),
        vec![method(&session, "p.Visitor", "visit")]
    );
}

#[test]
fn test_constructors_override_nothing() {
    let source = SourceSet::new()
        .with(ClassDecl::class("p.A").method(MethodDecl::constructor().public()))
        .with(ClassDecl::class("p.B").extends("p.A").method(MethodDecl::constructor().public()));
    let session = session(source);
    assert!(session.super_methods(method(&session, "p.B", "B")).is_empty());
}

// =============================================================================
// REQUIRES OVERRIDE
// =============================================================================

#[test]
fn test_interface_obligation_on_implementing_class() {
    let source = SourceSet::new()
        .with(ClassDecl::interface("p.I").public().method(abstract_method("m")))
        .with(ClassDecl::class("p.C").public().implements("p.I"));
    let mut session = session(source);
    let m = method(&session, "p.I", "m");
    assert!(session.requires_override(m));

    let c = class(&session, "p.C");
    let added = session.add_required_overrides(c);
    assert_eq!(added.len(), 1);
    let obligation = session.codebase().method(added[0]);
    assert_eq!(obligation.containing_class(), c);
    assert_eq!(obligation.inherited_from(), Some(class(&session, "p.I")));
    assert!(!obligation.modifiers().is_abstract());
    assert_eq!(session.super_methods(added[0]), vec![m]);
    assert!(session.codebase().is_required_overriding_method_for_text_stub(added[0]));

    // A second pass finds the obligation fulfilled.
    assert!(session.add_required_overrides(c).is_empty());
}

#[test]
fn test_root_type_override_with_same_signature_is_not_required() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.E").public().method(
            MethodDecl::new("equals")
                .public()
                .returns("boolean")
                .param("java.lang.Object"),
        ),
    );
    let session = session(source);
    let equals = method(&session, "p.E", "equals");
    let supers = session.super_methods(equals);
    assert_eq!(supers, vec![method(&session, "java.lang.Object", "equals")]);
    assert!(session.codebase().same_signature(equals, supers[0], false));
    assert!(!session.requires_override(equals));
    assert!(!session.codebase().is_required_overriding_method_for_text_stub(equals));
}

#[test]
fn test_root_type_override_with_changed_signature_is_required() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.E").public().method(
            MethodDecl::new("equals")
                .public()
                .with_flag(ModifierFlags::FINAL)
                .returns("boolean")
                .param("java.lang.Object"),
        ),
    );
    let session = session(source);
    let equals = method(&session, "p.E", "equals");
    assert!(session.codebase().is_required_overriding_method_for_text_stub(equals));
}

#[test]
fn test_abstract_method_without_super_methods() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .public()
            .with_flag(ModifierFlags::ABSTRACT)
            .method(abstract_method("visible"))
            .method(abstract_method("hidden").hidden())
            .method(MethodDecl::new("concrete").public()),
    );
    let session = session(source);
    assert!(session.requires_override(method(&session, "p.A", "visible")));
    assert!(!session.requires_override(method(&session, "p.A", "hidden")));
    assert!(!session.requires_override(method(&session, "p.A", "concrete")));
}

#[test]
fn test_hidden_abstract_method_follows_its_super_methods() {
    let source = SourceSet::new()
        .with(ClassDecl::interface("p.I").method(abstract_method("m")))
        .with(
            ClassDecl::class("p.A")
                .with_flag(ModifierFlags::ABSTRACT)
                .implements("p.I")
                .method(abstract_method("m").hidden())
                .method(abstract_method("hashCode").returns("int").hidden()),
        )
        .with(
            ClassDecl::class("p.B")
                .with_flag(ModifierFlags::ABSTRACT)
                .extends("p.A")
                .method(abstract_method("m").hidden()),
        );
    let session = session(source);
    // Overrides a visible abstract method.
    assert!(session.requires_override(method(&session, "p.A", "m")));
    // Overrides a hidden one that itself requires an override.
    assert!(session.requires_override(method(&session, "p.B", "m")));
    // Overrides only the root type.
    assert!(session.requires_override(method(&session, "p.A", "hashCode")));
}

#[test]
fn test_show_annotation_makes_hidden_method_visible() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A").with_flag(ModifierFlags::ABSTRACT).method(
            abstract_method("m")
                .hidden()
                .annotated("android.annotation.SystemApi"),
        ),
    );
    let plain = session(source.clone());
    assert!(!plain.requires_override(method(&plain, "p.A", "m")));

    let shown = session_with(
        source,
        SurfaceConfig::default().with_show_annotation("android.annotation.SystemApi"),
    );
    assert!(shown.requires_override(method(&shown, "p.A", "m")));
}

#[test]
fn test_interface_with_several_equivalent_super_methods() {
    let source = SourceSet::new()
        .with(ClassDecl::interface("p.I").method(abstract_method("m").param("int")))
        .with(
            ClassDecl::interface("p.J").method(
                MethodDecl::new("m")
                    .public()
                    .with_flag(ModifierFlags::DEFAULT)
                    .param("int"),
            ),
        )
        .with(
            ClassDecl::interface("p.K")
                .implements("p.I")
                .implements("p.J")
                .method(abstract_method("m").param("int")),
        )
        .with(
            ClassDecl::interface("p.Single")
                .implements("p.I")
                .method(abstract_method("m").param("int")),
        );
    let session = session(source);
    let codebase = session.codebase();
    assert!(codebase.is_required_overriding_method_for_text_stub(method(&session, "p.K", "m")));
    assert!(!codebase.is_required_overriding_method_for_text_stub(method(&session, "p.Single", "m")));
}

// =============================================================================
// SIGNATURES
// =============================================================================

#[test]
fn test_same_signature_raw_and_generic() {
    let source = SourceSet::new()
        .with(
            ClassDecl::class("p.A")
                .method(MethodDecl::new("strings").public().param("java.util.List<java.lang.String>"))
                .method(MethodDecl::new("numbers").public().param("java.util.List<java.lang.Integer>")),
        );
    let session = session(source);
    let (a, b) = (method(&session, "p.A", "strings"), method(&session, "p.A", "numbers"));
    assert!(session.codebase().same_signature(a, b, true));
    assert!(!session.codebase().same_signature(a, b, false));
}

#[test]
fn test_deprecation_only_counts_when_second_is_not_deprecated() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .method(MethodDecl::new("old").public().with_flag(ModifierFlags::DEPRECATED))
            .method(MethodDecl::new("current").public()),
    );
    let session = session(source);
    let (old, current) = (method(&session, "p.A", "old"), method(&session, "p.A", "current"));
    assert!(!session.codebase().same_signature(old, current, false));
    assert!(session.codebase().same_signature(current, old, false));
}

#[test]
fn test_throws_lists_compare_sorted() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .method(
                MethodDecl::new("a")
                    .public()
                    .throws("java.lang.Exception")
                    .throws("java.io.IOException"),
            )
            .method(
                MethodDecl::new("b")
                    .public()
                    .throws("java.io.IOException")
                    .throws("java.lang.Exception"),
            )
            .method(MethodDecl::new("c").public().throws("java.io.IOException")),
    );
    let session = session(source);
    let codebase = session.codebase();
    let (a, b, c) = (
        method(&session, "p.A", "a"),
        method(&session, "p.A", "b"),
        method(&session, "p.A", "c"),
    );
    assert!(codebase.same_signature(a, b, false));
    assert!(!codebase.same_signature(a, c, false));
}

// =============================================================================
// DUPLICATION
// =============================================================================

#[test]
fn test_duplicate_into_hidden_class_is_hidden() {
    let source = SourceSet::new()
        .with(
            ClassDecl::class("p.Base")
                .public()
                .method(MethodDecl::new("run").public())
                .field(FieldDecl::new("count", "int").public()),
        )
        .with(ClassDecl::class("p.Secret").extends("p.Base").hidden());
    let mut session = session(source);
    let base = class(&session, "p.Base");
    let secret = class(&session, "p.Secret");
    let run = method(&session, "p.Base", "run");
    let count = session.codebase().class(base).fields()[0];

    let MemberId::Method(copy) = session.duplicate(run.into(), secret) else {
        panic!("expected a method copy");
    };
    let MemberId::Field(field_copy) = session.duplicate(count.into(), secret) else {
        panic!("expected a field copy");
    };

    let codebase = session.codebase();
    assert!(codebase.method(copy).is_hidden());
    assert_eq!(codebase.method(copy).inherited_from(), Some(base));
    assert!(codebase.field(field_copy).is_hidden());
    assert!(codebase.field(field_copy).inherited());
    assert!(!codebase.method(run).is_hidden());
    assert!(!codebase.method(run).inherited());
    assert_eq!(codebase.class(base).methods(), &[run]);
}
