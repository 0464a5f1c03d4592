//! Several signature files read as one source.

use std::sync::Arc;

use crate::parser::{FileFormat, SignatureFile};
use crate::syntax::{
    ClassDecl, ClassResolver, DeclarationSource, Origin, PackageDecl, SyntaxError,
};

/// Signature files combined into one declaration stream, in load order.
///
/// As a resolver, the first file declaring a name wins.
#[derive(Debug, Clone, Default)]
pub struct SignatureSet {
    files: Vec<SignatureFile>,
}

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: SignatureFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[SignatureFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<SignatureFile> for SignatureSet {
    fn from_iter<I: IntoIterator<Item = SignatureFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl DeclarationSource for SignatureSet {
    fn origin(&self) -> Origin {
        Origin::Text
    }

    fn declarations(&self) -> Vec<Arc<ClassDecl>> {
        self.files
            .iter()
            .flat_map(|f| f.classes().iter().cloned())
            .collect()
    }

    fn packages(&self) -> Vec<PackageDecl> {
        self.files
            .iter()
            .flat_map(|f| f.package_decls().iter().cloned())
            .collect()
    }

    fn syntax_errors(&self) -> Vec<SyntaxError> {
        self.files
            .iter()
            .flat_map(|f| f.errors().iter().cloned())
            .collect()
    }

    /// The format of the first file.
    fn format(&self) -> Option<FileFormat> {
        self.files.first().map(SignatureFile::file_format)
    }
}

impl ClassResolver for SignatureSet {
    fn resolve(&self, qualified_name: &str) -> Option<Arc<ClassDecl>> {
        self.files
            .iter()
            .find_map(|f| f.get(qualified_name).cloned())
    }
}
