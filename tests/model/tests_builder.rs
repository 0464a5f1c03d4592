//! Two-phase construction, package materialization and classpath closure.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use apimodel::model::{BuildState, GraphBuilder, ItemState, PackageLink, Surface, codes};
use apimodel::syntax::{ClassDecl, FieldDecl, MethodDecl, NoClasspath, PackageDecl, SourceSet};
use apimodel::{Session, SurfaceConfig};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::model_assertions::*;

// =============================================================================
// END TO END
// =============================================================================

#[test]
fn test_external_super_class_comes_from_classpath() {
    let resolver = |name: &str| {
        (name == "q.C").then(|| Arc::new(ClassDecl::class("q.C").public()))
    };
    let source = SourceSet::new().with(ClassDecl::class("p.B").public().extends("q.C"));
    let session = Session::new(&source, resolver, SurfaceConfig::default());

    let c = session.find_class("q.C").expect("q.C should be created from the classpath");
    assert_from_classpath(&session, "q.C");
    assert_emitted(&session, "p.B");
    let b = session.codebase().class(class(&session, "p.B"));
    assert_eq!(b.super_class_id(), Some(c));
    assert_eq!(session.find_class("q.C"), Some(c));

    let q = session.codebase().package(session.find_package("q").unwrap());
    assert!(q.from_classpath());
    assert_eq!(q.classes(), &[c]);
    assert!(session.codebase().is_ready());
}

#[test]
fn test_implicit_root_super_class() {
    let session = session(SourceSet::new().with(ClassDecl::class("p.A")));
    let codebase = session.codebase();
    let a = codebase.class(class(&session, "p.A"));
    let object = class(&session, "java.lang.Object");
    assert_eq!(a.super_class_id(), Some(object));
    assert!(codebase.class(object).super_class().is_none());
    assert_no_errors(&session);
}

#[test]
fn test_unresolved_super_class_is_reported() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.B")
            .extends("q.Missing")
            .implements("q.AlsoMissing")
            .method(MethodDecl::new("run").public()),
    );
    let session = session(source);
    let b = class(&session, "p.B");
    assert!(session.codebase().class(b).super_class().unwrap().is_missing());
    assert_eq!(diagnostics_with_code(&session, codes::UNRESOLVED_SUPER_CLASS).len(), 1);
    assert_eq!(diagnostics_with_code(&session, codes::UNRESOLVED_INTERFACE).len(), 1);
    assert!(session.super_methods(method(&session, "p.B", "run")).is_empty());
}

#[test]
fn test_build_states() {
    let source = SourceSet::new().with(ClassDecl::class("p.A"));
    let codebase = GraphBuilder::new(SurfaceConfig::default(), &NoClasspath).build(&source);
    assert_eq!(codebase.state(), BuildState::Ready);
}

// =============================================================================
// PACKAGES
// =============================================================================

#[test]
fn test_parent_packages_are_synthesized() {
    let session = session(SourceSet::new().with(ClassDecl::class("a.b.c.X")));
    let codebase = session.codebase();

    let abc = session.find_package("a.b.c").unwrap();
    let ab = session.find_package("a.b").expect("a.b");
    let a = session.find_package("a").expect("a");
    let root = session.find_package("").expect("root package");

    assert_eq!(codebase.package(abc).containing_package(), Some(ab));
    assert_eq!(codebase.package(ab).containing_package(), Some(a));
    assert_eq!(codebase.package(a).containing_package(), Some(root));
    assert_eq!(codebase.package(root).link(), PackageLink::Root);
    assert!(codebase.package(abc).emit());
    for synthesized in [ab, a, root] {
        let package = codebase.package(synthesized);
        assert!(package.location().is_unknown());
        assert!(package.from_classpath() && !package.emit(), "{}", package.name());
    }
}

#[test]
fn test_packages_are_ordered() {
    let session = session(
        SourceSet::new()
            .with(ClassDecl::class("p.Zed"))
            .with(ClassDecl::class("p.Alpha"))
            .with(ClassDecl::class("m.Only")),
    );
    let codebase = session.codebase();
    let p = codebase.package(session.find_package("p").unwrap());
    assert_eq!(
        p.classes(),
        &[class(&session, "p.Alpha"), class(&session, "p.Zed")]
    );

    let names: Vec<&str> = session
        .all_packages()
        .into_iter()
        .map(|id| codebase.package(id).name())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.contains(&"java.lang"));
}

#[rstest]
#[case::configured(SurfaceConfig::default().with_hidden_package("p.internal"), SourceSet::new())]
#[case::declared(
    SurfaceConfig::default(),
    SourceSet::new().with_package(PackageDecl::new("p.internal").hidden())
)]
fn test_hidden_package(#[case] config: SurfaceConfig, #[case] extra: SourceSet) {
    let mut source = extra;
    source.add(ClassDecl::class("p.internal.Impl"));
    source.add(ClassDecl::class("p.Api"));
    let session = session_with(source, config);
    let codebase = session.codebase();

    let internal = codebase.package(session.find_package("p.internal").unwrap());
    assert!(internal.is_hidden());
    assert_eq!(internal.surface(), Surface::Classpath);
    let api = codebase.package(session.find_package("p").unwrap());
    assert!(!api.is_hidden());
    assert!(api.emit());
}

#[test]
fn test_declared_empty_package_is_materialized() {
    let session = session(SourceSet::new().with_package(PackageDecl::new("p.empty")));
    let package = session.codebase().package(session.find_package("p.empty").unwrap());
    assert!(package.classes().is_empty());
    assert!(package.emit());
}

// =============================================================================
// FINALIZATION AND CLOSURE
// =============================================================================

#[test]
fn test_finalization_is_idempotent() {
    let source = SourceSet::new().with(
        ClassDecl::class("p.A")
            .implements("java.lang.Runnable")
            .method(MethodDecl::new("run").public())
            .field(FieldDecl::new("name", "java.lang.String")),
    );
    let resolver = java_lang();
    let mut codebase = GraphBuilder::new(SurfaceConfig::default(), &resolver).build(&source);
    let p = codebase.find_package("p").unwrap();
    let a = codebase.find_class("p.A").unwrap();
    let before = (
        codebase.class_count(),
        codebase.package_count(),
        codebase.class(a).members(),
        codebase.class(a).surface(),
        codebase.diagnostics().len(),
    );

    codebase.finalize_package(p);
    codebase.finalize_package(p);
    codebase.settle(&resolver);

    let after = (
        codebase.class_count(),
        codebase.package_count(),
        codebase.class(a).members(),
        codebase.class(a).surface(),
        codebase.diagnostics().len(),
    );
    assert_eq!(before, after);
    assert_eq!(codebase.package(p).state(), ItemState::Finalized);
}

#[test]
fn test_super_class_cycle_terminates_and_is_reported() {
    let source = SourceSet::new()
        .with(ClassDecl::class("p.A").extends("p.B").method(MethodDecl::new("m").public()))
        .with(ClassDecl::class("p.B").extends("p.A").method(MethodDecl::new("m").public()))
        .with(ClassDecl::class("p.C").extends("p.A"));
    let session = session(source);
    let cycles = diagnostics_with_code(&session, codes::CIRCULAR_INHERITANCE);
    assert_eq!(cycles.len(), 2, "{:?}", cycles);
    assert_eq!(
        session.super_methods(method(&session, "p.A", "m")),
        vec![method(&session, "p.B", "m")]
    );
    for id in session.all_packages() {
        assert_eq!(session.codebase().package(id).state(), ItemState::Finalized);
    }
}

#[test]
fn test_classpath_cycle_terminates() {
    let resolver = |name: &str| match name {
        "x.A" => Some(Arc::new(ClassDecl::class("x.A").extends("x.B"))),
        "x.B" => Some(Arc::new(ClassDecl::class("x.B").extends("x.A").implements("x.I"))),
        "x.I" => Some(Arc::new(ClassDecl::interface("x.I").implements("x.I"))),
        _ => None,
    };
    let source = SourceSet::new().with(ClassDecl::class("p.Leaf").extends("x.A"));
    let session = Session::new(&source, resolver, SurfaceConfig::default());
    assert!(session.codebase().is_ready());
    assert_from_classpath(&session, "x.B");
    assert_from_classpath(&session, "x.I");
    let cycles = diagnostics_with_code(&session, codes::CIRCULAR_INHERITANCE);
    // x.A and x.B on the super-class cycle, x.I on its own interface list.
    assert_eq!(cycles.len(), 3, "{:?}", cycles);
    assert!(cycles.iter().any(|d| d.message.contains("'x.I'")));
    for id in session.codebase().all_classes() {
        assert!(session.codebase().class(id).is_finalized());
    }
}

#[test]
fn test_interface_cycle_is_reported() {
    let source = SourceSet::new()
        .with(ClassDecl::interface("p.I").implements("p.J").method(abstract_method("m")))
        .with(ClassDecl::interface("p.J").implements("p.I"))
        .with(ClassDecl::class("p.C").implements("p.I"));
    let session = session(source);
    let cycles = diagnostics_with_code(&session, codes::CIRCULAR_INHERITANCE);
    assert_eq!(cycles.len(), 2, "{:?}", cycles);
    assert!(cycles.iter().all(|d| !d.message.contains("'p.C'")));

    let interfaces = session.codebase().all_interfaces(class(&session, "p.C"));
    assert_eq!(interfaces, vec![class(&session, "p.I"), class(&session, "p.J")]);
}

#[test]
fn test_deep_interface_hierarchy_hits_depth_limit() {
    let mut source = SourceSet::new().with(ClassDecl::class("p.Impl").implements("p.I0"));
    for level in 0..4 {
        source = source.with(
            ClassDecl::interface(format!("p.I{}", level)).implements(format!("p.I{}", level + 1)),
        );
    }
    source = source.with(ClassDecl::interface("p.I4"));
    let session = session_with(source, SurfaceConfig::default().with_max_hierarchy_depth(3));
    let warnings = diagnostics_with_code(&session, codes::DEPTH_LIMIT);
    let mut reported: Vec<&str> = warnings.iter().map(|d| &*d.message).collect();
    reported.sort();
    assert_eq!(reported.len(), 2, "{:?}", warnings);
    assert!(reported[0].contains("'p.I0'"));
    assert!(reported[1].contains("'p.Impl'"));
    assert!(diagnostics_with_code(&session, codes::CIRCULAR_INHERITANCE).is_empty());
}

#[test]
fn test_diamond_interfaces_are_visited_once() {
    let source = SourceSet::new()
        .with(ClassDecl::interface("p.Top").method(abstract_method("top")))
        .with(ClassDecl::interface("p.Left").implements("p.Top"))
        .with(ClassDecl::interface("p.Right").implements("p.Top"))
        .with(
            ClassDecl::class("p.Impl")
                .implements("p.Left")
                .implements("p.Right")
                .method(MethodDecl::new("top").public()),
        );
    let session = session(source);
    let codebase = session.codebase();
    let interfaces = codebase.all_interfaces(class(&session, "p.Impl"));
    let top = class(&session, "p.Top");
    assert_eq!(interfaces.iter().filter(|&&i| i == top).count(), 1);
    assert_eq!(
        session.super_methods(method(&session, "p.Impl", "top")),
        vec![method(&session, "p.Top", "top")]
    );
}

#[test]
fn test_classpath_member_types_are_not_closed_over_by_default() {
    let resolver = |name: &str| match name {
        "q.Dep" => Some(Arc::new(
            ClassDecl::class("q.Dep").field(FieldDecl::new("next", "q.Far")),
        )),
        "q.Far" => Some(Arc::new(ClassDecl::class("q.Far"))),
        _ => None,
    };
    let source = SourceSet::new().with(ClassDecl::class("p.A").extends("q.Dep"));

    let lazy = Session::new(&source, resolver, SurfaceConfig::default());
    assert!(lazy.find_class("q.Far").is_none());

    let eager = Session::new(
        &source,
        resolver,
        SurfaceConfig::default().with_classpath_members(true),
    );
    assert!(eager.find_class("q.Far").is_some());
}

// =============================================================================
// MALFORMED INPUT
// =============================================================================

#[rstest]
#[case(ClassDecl::class("p.1Bad"))]
#[case(ClassDecl::class("p.Bad").field(FieldDecl::new("not a name", "int")))]
#[case(ClassDecl::class("p.Bad").method(MethodDecl::new("")))]
fn test_malformed_declaration_is_skipped(#[case] bad: ClassDecl) {
    let source = SourceSet::new()
        .with(bad)
        .with(ClassDecl::class("p.Good"));
    let session = session(source);
    assert_eq!(diagnostics_with_code(&session, codes::MALFORMED_DECLARATION).len(), 1);
    assert!(session.find_class("p.Bad").is_none());
    assert!(session.find_class("p.1Bad").is_none());
    assert_emitted(&session, "p.Good");
}
