//! Assertion helpers over a built session.

use apimodel::model::{ClassId, Diagnostic, MethodId, Surface};
use apimodel::Session;

/// Look a class up or fail with the list of known classes.
pub fn class(session: &Session, name: &str) -> ClassId {
    session.find_class(name).unwrap_or_else(|| {
        let known: Vec<String> = session
            .codebase()
            .all_classes()
            .map(|id| session.codebase().class(id).qualified_name().to_string())
            .collect();
        panic!("class '{}' not found; known: {:?}", name, known)
    })
}

/// The only method named `name` on `class`.
pub fn method(session: &Session, class_name: &str, name: &str) -> MethodId {
    let codebase = session.codebase();
    let matches: Vec<MethodId> = codebase
        .class(class(session, class_name))
        .methods()
        .iter()
        .copied()
        .filter(|&m| codebase.method(m).name() == name)
        .collect();
    assert_eq!(
        matches.len(),
        1,
        "expected one method '{}' on '{}'",
        name,
        class_name
    );
    matches[0]
}

pub fn method_names(session: &Session, methods: &[MethodId]) -> Vec<String> {
    methods
        .iter()
        .map(|&m| session.codebase().method_path(m))
        .collect()
}

pub fn assert_emitted(session: &Session, name: &str) {
    let item = session.codebase().class(class(session, name));
    assert_eq!(item.surface(), Surface::Emit, "'{}' should be emitted", name);
    assert!(item.emit() && !item.from_classpath());
}

pub fn assert_from_classpath(session: &Session, name: &str) {
    let item = session.codebase().class(class(session, name));
    assert_eq!(
        item.surface(),
        Surface::Classpath,
        "'{}' should come from the classpath",
        name
    );
    assert!(!item.emit() && item.from_classpath());
}

pub fn diagnostics_with_code<'a>(session: &'a Session, code: &str) -> Vec<&'a Diagnostic> {
    session.diagnostics().with_code(code)
}

pub fn assert_no_errors(session: &Session) {
    let diagnostics = session.diagnostics();
    assert!(
        !diagnostics.has_errors(),
        "Expected no errors, got {}:\n{}",
        diagnostics.error_count(),
        diagnostics
            .diagnostics()
            .iter()
            .map(|d| format!("  {}", d))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
