//! Textual backend: reader for signature files.
//!
//! ## Architecture
//!
//! ```text
//! Signature text
//!     ↓
//! FileFormat::parse_header → version marker (fatal if missing/unknown)
//!     ↓
//! Lexer (logos) → Tokens
//!     ↓
//! Reader (recursive descent, error recovery) → ClassDecl / PackageDecl
//!     ↓
//! SignatureFile: DeclarationSource + ClassResolver
//! ```

mod format;
mod lexer;
mod signature;

pub use format::{FileFormat, FormatError};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use signature::SignatureFile;

use crate::base::FileId;

/// Parse a signature file that is not associated with any loaded file.
pub fn parse_signature(text: &str) -> Result<SignatureFile, FormatError> {
    SignatureFile::parse(text, FileId::new(0))
}
