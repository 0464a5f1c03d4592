//! Declaration and signature-text fixtures.

use std::sync::Arc;

use apimodel::syntax::{ClassDecl, FieldDecl, MethodDecl, ModifierFlags, SourceSet};
use apimodel::{Session, SurfaceConfig};
use once_cell::sync::Lazy;

/// A small `java.lang` / `java.util` classpath.
pub static JAVA_LANG: Lazy<Arc<SourceSet>> = Lazy::new(|| {
    Arc::new(
        SourceSet::new()
            .with(
                ClassDecl::class("java.lang.Object")
                    .public()
                    .method(MethodDecl::constructor().public())
                    .method(
                        MethodDecl::new("equals")
                            .public()
                            .returns("boolean")
                            .param("java.lang.Object"),
                    )
                    .method(MethodDecl::new("hashCode").public().returns("int"))
                    .method(
                        MethodDecl::new("toString")
                            .public()
                            .returns("java.lang.String"),
                    ),
            )
            .with(
                ClassDecl::class("java.lang.String")
                    .public()
                    .with_flag(ModifierFlags::FINAL)
                    .implements("java.lang.CharSequence"),
            )
            .with(
                ClassDecl::interface("java.lang.CharSequence")
                    .public()
                    .method(
                        MethodDecl::new("length")
                            .public()
                            .with_flag(ModifierFlags::ABSTRACT)
                            .returns("int"),
                    ),
            )
            .with(
                ClassDecl::interface("java.lang.Runnable").public().method(
                    MethodDecl::new("run")
                        .public()
                        .with_flag(ModifierFlags::ABSTRACT),
                ),
            )
            .with(
                ClassDecl::class("java.lang.Exception")
                    .public()
                    .field(FieldDecl::new("serialVersionUID", "long")),
            )
            .with(
                ClassDecl::interface("java.util.List")
                    .public()
                    .type_parameter(apimodel::syntax::TypeParamDecl::new("E"))
                    .method(
                        MethodDecl::new("get")
                            .public()
                            .with_flag(ModifierFlags::ABSTRACT)
                            .returns("E")
                            .param("int"),
                    ),
            )
            .with(
                ClassDecl::class("java.util.Map")
                    .public()
                    .inner(ClassDecl::interface("Entry").public()),
            ),
    )
});

/// A classpath resolver backed by [`JAVA_LANG`].
pub fn java_lang() -> impl apimodel::ClassResolver + 'static {
    let classpath = JAVA_LANG.clone();
    move |name: &str| classpath.get(name).cloned()
}

/// Build a session over `source` with the [`JAVA_LANG`] classpath.
pub fn session(source: SourceSet) -> Session {
    Session::new(&source, java_lang(), SurfaceConfig::default())
}

pub fn session_with(source: SourceSet, config: SurfaceConfig) -> Session {
    Session::new(&source, java_lang(), config)
}

/// Build a session from signature text with the [`JAVA_LANG`] classpath.
pub fn signature_session(text: &str) -> Session {
    Session::from_signature_text(text, java_lang(), SurfaceConfig::default())
        .expect("fixture signature text has a valid header")
}

pub fn abstract_method(name: &str) -> MethodDecl {
    MethodDecl::new(name)
        .public()
        .with_flag(ModifierFlags::ABSTRACT)
}

pub const API_V3: &str = r#"// Signature format: 3.0
package a.b.c {

  public abstract class Shape implements java.lang.Runnable {
    ctor public Shape();
    method public abstract double area();
    method public String describe(int, String?);
    method public String describe(int, int);
    field public static final int SIDES = 0; // 0x0
  }

  public final class Square extends a.b.c.Shape {
    ctor public Square(double);
    method public double area();
    method public void run();
    property public final double side;
  }

  public static class Square.Builder {
    ctor public Square.Builder();
    method public a.b.c.Square build();
  }

}

package a.util {

  public interface Visitor<T> {
    method public abstract T visit(a.b.c.Shape);
  }

}
"#;
