#![allow(clippy::unwrap_used)]

use apimodel::model::codes;
use apimodel::parser::parse_signature;
use apimodel::{FileFormat, FormatError, Session, SurfaceConfig};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::model_assertions::*;

#[rstest]
#[case::empty("", FormatError::EmptyInput)]
#[case::blank("  \n\t\n", FormatError::EmptyInput)]
#[case::unknown_version(
    "// Signature format: 9.0\npackage p {\n}\n",
    FormatError::unrecognized("// Signature format: 9.0")
)]
#[case::missing_header("package p {}", FormatError::unrecognized("package p {}"))]
fn test_format_errors_are_fatal(#[case] text: &str, #[case] expected: FormatError) {
    assert_eq!(parse_signature(text).unwrap_err(), expected);
    let err = Session::from_signature_text(text, java_lang(), SurfaceConfig::default()).unwrap_err();
    assert_eq!(err, expected);
}

#[rstest]
#[case("2.0", FileFormat::V2)]
#[case("3.0", FileFormat::V3)]
#[case("4.0", FileFormat::V4)]
fn test_header_selects_format(#[case] version: &str, #[case] expected: FileFormat) {
    let text = format!("// Signature format: {}\npackage p {{\n}}\n", version);
    let session = signature_session(&text);
    assert_eq!(session.file_format(), Some(expected));
}

#[test]
fn test_signature_session_builds_emitted_classes() {
    let session = signature_session(API_V3);
    assert_no_errors(&session);
    assert_eq!(session.file_format(), Some(FileFormat::V3));

    for name in ["a.b.c.Shape", "a.b.c.Square", "a.b.c.Square.Builder", "a.util.Visitor"] {
        assert_emitted(&session, name);
    }
    assert_from_classpath(&session, "java.lang.Runnable");

    let codebase = session.codebase();
    let builder = codebase.class(class(&session, "a.b.c.Square.Builder"));
    assert_eq!(builder.containing_class(), Some(class(&session, "a.b.c.Square")));
    assert_eq!(builder.package_name(), "a.b.c");

    let square = codebase.class(class(&session, "a.b.c.Square"));
    assert_eq!(square.super_class_id(), Some(class(&session, "a.b.c.Shape")));
    assert_eq!(square.properties().len(), 1);
}

#[test]
fn test_signature_session_override_queries() {
    let session = signature_session(API_V3);
    let area = method(&session, "a.b.c.Square", "area");
    assert_eq!(
        session.super_methods(area),
        vec![method(&session, "a.b.c.Shape", "area")]
    );
    let run = method(&session, "a.b.c.Square", "run");
    assert_eq!(
        method_names(&session, &session.super_methods(run)),
        vec!["java.lang.Runnable.run"]
    );
    assert!(session.requires_override(method(&session, "a.b.c.Shape", "area")));
}

#[test]
fn test_orphan_inner_class_is_reported() {
    let session = signature_session(
        "// Signature format: 2.0\npackage p {\n  public class Gone.Inner {\n  }\n}\n",
    );
    assert_eq!(diagnostics_with_code(&session, codes::ORPHAN_INNER_CLASS).len(), 1);
    let inner = session.codebase().class(class(&session, "p.Gone.Inner"));
    assert!(inner.containing_class().is_none());
    assert!(!session.diagnostics().has_errors());
}

#[test]
fn test_syntax_errors_become_diagnostics() {
    let session = signature_session(
        "// Signature format: 3.0\n\
         package p {\n\
           public class A {\n\
             bogus thing;\n\
             method public void ok();\n\
           }\n\
         }\n",
    );
    let errors = diagnostics_with_code(&session, codes::SYNTAX_ERROR);
    assert_eq!(errors.len(), 1);
    let methods = session.codebase().class(class(&session, "p.A")).methods();
    assert_eq!(method_names(&session, methods), vec!["p.A.ok"]);
}
