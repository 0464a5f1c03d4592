//! Recursive-descent reader for signature files.
//!
//! A signature file is a previously serialized API surface:
//!
//! ```text
//! // Signature format: 3.0
//! package a.b {
//!   public class C extends q.D implements a.I {
//!     ctor public C();
//!     method public <T> T get(Class<T>, int...) throws java.io.IOException;
//!     field public static final int X = 1;
//!   }
//!   public static class C.Inner {
//!   }
//! }
//! ```
//!
//! Inner classes are written flat (`C.Inner`) and re-nested under their outer
//! declaration after reading. Malformed members and classes are recorded as
//! [`SyntaxError`]s and skipped; reading resumes at the next `;` or `}`.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use text_size::{TextRange, TextSize};

use super::format::{FileFormat, FormatError};
use super::lexer::{Token, TokenKind, tokenize};
use crate::base::{FileId, LineIndex, Location};
use crate::syntax::{
    ClassDecl, ClassKind, ClassResolver, DeclarationSource, FieldDecl, MethodDecl,
    ModifierBuilder, ModifierFlags, Nullness, Origin, PackageDecl, ParamDecl, PropertyDecl,
    SyntaxError, TypeParamDecl, TypeRef, Visibility,
};

const NULLABLE_ANNOTATIONS: &[&str] = &["Nullable", "RecentlyNullable"];
const NON_NULL_ANNOTATIONS: &[&str] = &["NonNull", "NotNull", "RecentlyNonNull"];
const DEFAULT_VALUE_ANNOTATION: &str = "DefaultValue";

/// One parsed signature file.
#[derive(Debug, Clone)]
pub struct SignatureFile {
    format: FileFormat,
    file: FileId,
    packages: Vec<PackageDecl>,
    classes: Vec<Arc<ClassDecl>>,
    by_qualified_name: FxHashMap<Arc<str>, Arc<ClassDecl>>,
    errors: Vec<SyntaxError>,
}

impl SignatureFile {
    /// Parse `text`, attributing locations to `file`.
    ///
    /// Only a missing or unknown format marker is fatal; everything else is
    /// recovered from and reported through [`errors`](Self::errors).
    pub fn parse(text: &str, file: FileId) -> Result<Self, FormatError> {
        let format = FileFormat::parse_header(text)?;
        let mut reader = Reader::new(text, file, format);
        reader.file();
        let Reader {
            packages,
            classes,
            errors,
            ..
        } = reader;

        let classes = nest_inner_classes(classes);
        let mut by_qualified_name = FxHashMap::default();
        for class in &classes {
            class.walk(&mut |decl| {
                by_qualified_name
                    .entry(decl.qualified_name.clone())
                    .or_insert_with(|| decl.clone());
            });
        }

        tracing::debug!(
            "[SIGNATURE] {} format {}: {} packages, {} top-level classes, {} errors",
            file,
            format,
            packages.len(),
            classes.len(),
            errors.len()
        );

        Ok(Self {
            format,
            file,
            packages,
            classes,
            by_qualified_name,
            errors,
        })
    }

    pub fn file_format(&self) -> FileFormat {
        self.format
    }

    pub fn file(&self) -> FileId {
        self.file
    }

    pub fn classes(&self) -> &[Arc<ClassDecl>] {
        &self.classes
    }

    pub fn package_decls(&self) -> &[PackageDecl] {
        &self.packages
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Arc<ClassDecl>> {
        self.by_qualified_name.get(qualified_name)
    }
}

impl DeclarationSource for SignatureFile {
    fn origin(&self) -> Origin {
        Origin::Text
    }

    fn declarations(&self) -> Vec<Arc<ClassDecl>> {
        self.classes.clone()
    }

    fn packages(&self) -> Vec<PackageDecl> {
        self.packages.clone()
    }

    fn syntax_errors(&self) -> Vec<SyntaxError> {
        self.errors.clone()
    }

    fn format(&self) -> Option<FileFormat> {
        Some(self.format)
    }
}

impl ClassResolver for SignatureFile {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<ClassDecl>> {
        self.get(qualified_name).cloned()
    }
}

/// Attach flat `Outer.Inner` declarations to their outer class, deepest first.
/// Inner classes whose outer is not in the file stay top-level.
fn nest_inner_classes(classes: Vec<ClassDecl>) -> Vec<Arc<ClassDecl>> {
    let mut first_by_name: FxHashMap<Arc<str>, usize> = FxHashMap::default();
    for (i, class) in classes.iter().enumerate() {
        first_by_name.entry(class.qualified_name.clone()).or_insert(i);
    }

    let mut order: Vec<usize> = (0..classes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(classes[i].simple_name.matches('.').count()));

    let mut slots: Vec<Option<ClassDecl>> = classes.into_iter().map(Some).collect();
    for i in order {
        let Some(outer_name) = slots[i].as_ref().and_then(|c| c.containing_class.clone()) else {
            continue;
        };
        let Some(&outer) = first_by_name.get(&outer_name) else {
            continue;
        };
        if outer == i || slots[outer].is_none() {
            continue;
        }
        if let Some(child) = slots[i].take() {
            if let Some(parent) = slots[outer].as_mut() {
                parent.push_inner(child);
            }
        }
    }
    slots.into_iter().flatten().map(Arc::new).collect()
}

// ============================================================================
// READER
// ============================================================================

struct Failure {
    message: String,
    range: TextRange,
}

type ReadResult<T> = Result<T, Failure>;

/// Annotations and keywords read in front of a declaration or parameter.
#[derive(Default)]
struct Prefix {
    modifiers: ModifierBuilder,
    nullness: Nullness,
    default_annotation: Option<Arc<str>>,
    optional: bool,
}

struct Reader<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    format: FileFormat,
    file: FileId,
    line_index: LineIndex,
    packages: Vec<PackageDecl>,
    classes: Vec<ClassDecl>,
    errors: Vec<SyntaxError>,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str, file: FileId, format: FileFormat) -> Self {
        Self {
            text,
            tokens: tokenize(text),
            pos: 0,
            format,
            file,
            line_index: LineIndex::new(text),
            packages: Vec::new(),
            classes: Vec::new(),
            errors: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------------

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn nth(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == keyword)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn current_range(&self) -> TextRange {
        match self.peek() {
            Some(token) => token.range,
            None => {
                let end = TextSize::new(self.text.len() as u32);
                TextRange::empty(end)
            }
        }
    }

    fn fail<T>(&self, expected: &str) -> ReadResult<T> {
        let found = match self.peek() {
            Some(token) => format!("`{}`", token.text),
            None => "end of file".to_string(),
        };
        Err(Failure {
            message: format!("Expected {}, found {}", expected, found),
            range: self.current_range(),
        })
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ReadResult<Token<'a>> {
        if self.at(kind) {
            if let Some(token) = self.bump() {
                return Ok(token);
            }
        }
        self.fail(expected)
    }

    fn ident(&mut self, expected: &str) -> ReadResult<&'a str> {
        Ok(self.expect(TokenKind::Ident, expected)?.text)
    }

    /// `a.b.c`
    fn dotted_name(&mut self, expected: &str) -> ReadResult<String> {
        let mut name = self.ident(expected)?.to_string();
        while self.at(TokenKind::Dot) && self.nth(1).is_some_and(|t| t.kind == TokenKind::Ident) {
            self.pos += 1;
            if let Some(part) = self.bump() {
                name.push('.');
                name.push_str(part.text);
            }
        }
        Ok(name)
    }

    fn start_offset(&self) -> TextSize {
        self.current_range().start()
    }

    fn end_offset(&self) -> TextSize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.range.end(),
            None => TextSize::new(0),
        }
    }

    fn slice(&self, start: TextSize, end: TextSize) -> &'a str {
        let range = TextRange::new(start, end.max(start));
        self.text[range].trim()
    }

    fn location(&self, start: TextSize) -> Location {
        let range = TextRange::new(start, self.end_offset().max(start));
        Location::new(self.file, self.line_index.span(range))
    }

    fn report(&mut self, failure: Failure) {
        let location = Location::new(self.file, self.line_index.span(failure.range));
        tracing::trace!("[SIGNATURE] {}: {}", location, failure.message);
        self.errors.push(SyntaxError::new(failure.message, location));
    }

    /// Skip to the end of the current statement: past the next `;`, or up to
    /// (not past) an enclosing `}`.
    fn recover_statement(&mut self) {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Semicolon => {
                    self.pos += 1;
                    return;
                }
                TokenKind::RBrace => return,
                _ => self.pos += 1,
            }
        }
    }

    /// Skip a whole class: up to the matching `}` of its body, or up to (not
    /// past) the enclosing `}` when no body was opened.
    fn recover_block(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    // ------------------------------------------------------------------------
    // File structure
    // ------------------------------------------------------------------------

    fn file(&mut self) {
        while self.peek().is_some() {
            if self.at_keyword("package") {
                if let Err(failure) = self.package() {
                    self.report(failure);
                    self.recover_block();
                }
            } else {
                if let Err(failure) = self.fail::<()>("`package`") {
                    self.report(failure);
                }
                self.recover_block();
                self.eat(TokenKind::RBrace);
            }
        }
    }

    fn package(&mut self) -> ReadResult<()> {
        let start = self.start_offset();
        self.bump();
        let name = self.dotted_name("package name")?;
        let location = self.location(start);
        self.expect(TokenKind::LBrace, "`{`")?;
        if !self.packages.iter().any(|p| *p.name == *name) {
            self.packages.push(PackageDecl::new(&name).at(location));
        }

        loop {
            if self.eat(TokenKind::RBrace) {
                return Ok(());
            }
            if self.peek().is_none() {
                return self.fail("`}` closing package");
            }
            match self.class(&name) {
                Ok(class) => self.classes.push(class),
                Err(failure) => {
                    self.report(failure);
                    self.recover_block();
                }
            }
        }
    }

    fn class(&mut self, package: &str) -> ReadResult<ClassDecl> {
        let start = self.start_offset();
        let prefix = self.prefix()?;
        let kind = self.class_kind()?;
        let simple_name = self.dotted_name("class name")?;
        let type_parameters = if self.at(TokenKind::Lt) {
            self.type_parameters()?
        } else {
            Vec::new()
        };

        let qualified_name = qualify(package, &simple_name);
        let mut class = ClassDecl::new(kind, &qualified_name)
            .in_package(package)
            .with_modifiers(prefix.modifiers)
            .with_origin(Origin::Text);
        class.type_parameters = type_parameters;
        if let Some((outer, _)) = simple_name.rsplit_once('.') {
            class.containing_class = Some(Arc::from(qualify(package, outer)));
        }

        loop {
            if self.at_keyword("extends") {
                self.bump();
                if kind.is_interface() {
                    class.interfaces.extend(self.type_list()?);
                } else {
                    class.super_class = Some(self.type_ref(Nullness::Unknown)?);
                }
            } else if self.at_keyword("implements") {
                self.bump();
                class.interfaces.extend(self.type_list()?);
            } else {
                break;
            }
        }
        class.location = self.location(start);
        self.expect(TokenKind::LBrace, "`{`")?;

        loop {
            if self.eat(TokenKind::RBrace) {
                return Ok(class);
            }
            if self.peek().is_none() {
                return self.fail("`}` closing class");
            }
            if let Err(failure) = self.member(&mut class) {
                self.report(failure);
                self.recover_statement();
            }
        }
    }

    fn class_kind(&mut self) -> ReadResult<ClassKind> {
        if self.at(TokenKind::At) && self.nth(1).is_some_and(|t| t.text == "interface") {
            self.pos += 2;
            return Ok(ClassKind::AnnotationType);
        }
        let kind = self
            .peek()
            .filter(|t| t.kind == TokenKind::Ident)
            .and_then(|t| ClassKind::from_keyword(t.text));
        match kind {
            Some(kind) => {
                self.pos += 1;
                Ok(kind)
            }
            None => self.fail("`class`, `interface`, `enum` or `@interface`"),
        }
    }

    // ------------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------------

    fn member(&mut self, class: &mut ClassDecl) -> ReadResult<()> {
        let start = self.start_offset();
        let keyword = self.ident("member keyword")?;
        match keyword {
            "ctor" => {
                let prefix = self.prefix()?;
                let mut ctor = MethodDecl::constructor().with_modifiers(prefix.modifiers);
                if self.at(TokenKind::Lt) {
                    ctor.type_parameters = self.type_parameters()?;
                }
                ctor.name = self.dotted_name("constructor name")?.into();
                ctor.parameters = self.parameters()?;
                ctor.throws = self.throws_clause()?;
                self.expect(TokenKind::Semicolon, "`;`")?;
                class.methods.push(ctor.at(self.location(start)));
            }
            "method" => {
                let prefix = self.prefix()?;
                let mut method = MethodDecl::new("");
                if self.at(TokenKind::Lt) {
                    method.type_parameters = self.type_parameters()?;
                }
                method.return_type = Some(self.type_ref(prefix.nullness)?);
                method.name = self.ident("method name")?.into();
                method.parameters = self.parameters()?;
                method.throws = self.throws_clause()?;
                if self.at_keyword("default") {
                    self.bump();
                    self.capture_until(&[TokenKind::Semicolon]);
                }
                self.expect(TokenKind::Semicolon, "`;`")?;
                let method = method.with_modifiers(prefix.modifiers);
                class.methods.push(method.at(self.location(start)));
            }
            "field" | "enum_constant" => {
                let prefix = self.prefix()?;
                let ty = self.type_ref(prefix.nullness)?;
                let name = self.ident("field name")?;
                let mut field = FieldDecl::new(name, ty).with_modifiers(prefix.modifiers);
                if self.eat(TokenKind::Eq) {
                    field = field.value(self.capture_until(&[TokenKind::Semicolon]));
                }
                self.expect(TokenKind::Semicolon, "`;`")?;
                class.fields.push(field.at(self.location(start)));
            }
            "property" => {
                let prefix = self.prefix()?;
                let ty = self.type_ref(prefix.nullness)?;
                let name = self.ident("property name")?;
                self.expect(TokenKind::Semicolon, "`;`")?;
                let property = PropertyDecl::new(name, ty).with_modifiers(prefix.modifiers);
                class.properties.push(property.at(self.location(start)));
            }
            _ => {
                self.pos -= 1;
                return self.fail("`ctor`, `method`, `field`, `property` or `enum_constant`");
            }
        }
        Ok(())
    }

    /// Annotations and modifier keywords, in any order.
    fn prefix(&mut self) -> ReadResult<Prefix> {
        let mut prefix = Prefix::default();
        loop {
            if self.at(TokenKind::At) {
                if self.nth(1).is_some_and(|t| t.text == "interface") {
                    break;
                }
                self.annotation(&mut prefix)?;
                continue;
            }
            let Some(word) = self.peek().filter(|t| t.kind == TokenKind::Ident).map(|t| t.text)
            else {
                break;
            };
            if let Some(visibility) = Visibility::from_keyword(word) {
                prefix.modifiers.set_visibility(visibility);
            } else if let Some(flag) = ModifierFlags::from_keyword(word) {
                prefix.modifiers.set(flag, true);
            } else if word == "optional" {
                prefix.optional = true;
            } else {
                break;
            }
            self.pos += 1;
        }
        Ok(prefix)
    }

    fn annotation(&mut self, prefix: &mut Prefix) -> ReadResult<()> {
        self.expect(TokenKind::At, "`@`")?;
        let name = self.dotted_name("annotation name")?;
        let mut arguments = None;
        if self.eat(TokenKind::LParen) {
            arguments = Some(self.capture_until(&[TokenKind::RParen]));
            self.expect(TokenKind::RParen, "`)`")?;
        }

        let simple = name.rsplit('.').next().unwrap_or(name.as_str());
        if NULLABLE_ANNOTATIONS.contains(&simple) {
            prefix.nullness = Nullness::Nullable;
        } else if NON_NULL_ANNOTATIONS.contains(&simple) {
            prefix.nullness = Nullness::NonNull;
        } else if simple == DEFAULT_VALUE_ANNOTATION {
            prefix.default_annotation = arguments.map(|a| Arc::from(unquote(a)));
        }
        prefix.modifiers.add_annotation(name);
        Ok(())
    }

    fn parameters(&mut self) -> ReadResult<Vec<ParamDecl>> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut parameters = Vec::new();
        if self.eat(TokenKind::RParen) {
            return Ok(parameters);
        }
        loop {
            parameters.push(self.parameter()?);
            if self.eat(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "`,` or `)`")?;
            return Ok(parameters);
        }
    }

    fn parameter(&mut self) -> ReadResult<ParamDecl> {
        let prefix = self.prefix()?;
        let ty = self.type_ref(prefix.nullness)?;
        let mut parameter = ParamDecl::new(ty);
        if self.at(TokenKind::Ident) {
            parameter = parameter.named(self.ident("parameter name")?);
        }
        let mut default = prefix.default_annotation;
        if self.eat(TokenKind::Eq) {
            default = Some(Arc::from(
                self.capture_until(&[TokenKind::Comma, TokenKind::RParen]),
            ));
        }
        if prefix.optional || default.is_some() {
            parameter = parameter.with_default(default.as_deref());
        }
        Ok(parameter.with_modifiers(prefix.modifiers))
    }

    fn throws_clause(&mut self) -> ReadResult<Vec<TypeRef>> {
        if !self.at_keyword("throws") {
            return Ok(Vec::new());
        }
        self.bump();
        self.type_list()
    }

    /// Types separated by commas or, in `extends`/`implements` clauses, by
    /// whitespace alone.
    fn type_list(&mut self) -> ReadResult<Vec<TypeRef>> {
        let mut types = vec![self.type_ref(Nullness::Unknown)?];
        loop {
            let separated = self.eat(TokenKind::Comma);
            let continues = separated
                || (self.at(TokenKind::Ident)
                    && !self.at_keyword("implements")
                    && !self.at_keyword("extends"));
            if !continues {
                return Ok(types);
            }
            types.push(self.type_ref(Nullness::Unknown)?);
        }
    }

    /// `<T extends A & B, U>`
    fn type_parameters(&mut self) -> ReadResult<Vec<TypeParamDecl>> {
        self.expect(TokenKind::Lt, "`<`")?;
        let mut parameters = Vec::new();
        loop {
            let mut parameter = TypeParamDecl::new(self.ident("type parameter")?);
            if self.at_keyword("extends") {
                self.bump();
                parameter = parameter.bound(self.type_ref(Nullness::Unknown)?);
                while self.eat(TokenKind::Amp) {
                    parameter = parameter.bound(self.type_ref(Nullness::Unknown)?);
                }
            }
            parameters.push(parameter);
            if self.eat(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::Gt, "`,` or `>`")?;
            return Ok(parameters);
        }
    }

    // ------------------------------------------------------------------------
    // Types and values
    // ------------------------------------------------------------------------

    /// A type reference. In annotation-nullness formats the nullness comes
    /// from the preceding annotations; otherwise from the `?`/`!` suffix, with
    /// no suffix meaning non-null.
    fn type_ref(&mut self, annotated: Nullness) -> ReadResult<TypeRef> {
        let start = self.start_offset();
        self.type_text()?;
        let text = self.slice(start, self.end_offset());
        let ty = TypeRef::new(text);
        if !self.format.kotlin_style_nulls() {
            return Ok(ty.with_nullness(annotated));
        }
        if ty.nullness() == Nullness::Unknown && !ty.is_primitive() {
            return Ok(ty.with_nullness(Nullness::NonNull));
        }
        Ok(ty)
    }

    fn type_text(&mut self) -> ReadResult<()> {
        while self.at(TokenKind::At) {
            let mut ignored = Prefix::default();
            self.annotation(&mut ignored)?;
        }
        if self.eat(TokenKind::Question) {
            if self.at_keyword("extends") || self.at_keyword("super") {
                self.bump();
                self.type_text()?;
            }
            return Ok(());
        }
        self.dotted_name("type")?;
        if self.eat(TokenKind::Lt) {
            loop {
                self.type_text()?;
                if self.eat(TokenKind::Comma) {
                    continue;
                }
                self.expect(TokenKind::Gt, "`,` or `>`")?;
                break;
            }
        }
        self.nullness_suffix();
        while self.eat(TokenKind::LBracket) {
            self.expect(TokenKind::RBracket, "`]`")?;
            self.nullness_suffix();
        }
        if self.eat(TokenKind::Ellipsis) {
            self.nullness_suffix();
        }
        Ok(())
    }

    fn nullness_suffix(&mut self) {
        if !self.eat(TokenKind::Question) {
            self.eat(TokenKind::Bang);
        }
    }

    /// Consume tokens up to (not including) one of `stops` at nesting depth
    /// zero and return the covered text.
    fn capture_until(&mut self, stops: &[TokenKind]) -> &'a str {
        let start = self.start_offset();
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            if depth == 0 && stops.contains(&token.kind) {
                break;
            }
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }
        if self.end_offset() < start {
            return "";
        }
        self.slice(start, self.end_offset())
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}
