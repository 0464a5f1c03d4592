//! Loading signature files from disk.
//!
//! ```text
//! load_signature_dir ─▶ walkdir (*.txt, sorted) ─▶ load_signature_file ─▶ SignatureSet
//!                                                        │
//!                                                    FileSet (path ↔ FileId)
//! ```

mod file_set;
mod loader;
mod signature_set;

pub use file_set::FileSet;
pub use loader::{
    LoadError, SIGNATURE_EXTENSION, collect_signature_paths, load_signature_dir, load_signature_file,
};
pub use signature_set::SignatureSet;
