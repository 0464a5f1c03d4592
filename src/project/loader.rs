//! Reading signature files and directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use super::file_set::FileSet;
use super::signature_set::SignatureSet;
use crate::parser::{FormatError, SignatureFile};

/// Extension of the signature files picked up by [`load_signature_dir`].
pub const SIGNATURE_EXTENSION: &str = "txt";

/// Errors that stop loading a file or directory.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, source: FormatError) -> Self {
        Self::Format {
            path: path.into(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Format { path, .. } => path,
        }
    }
}

/// Read and parse one signature file, registering its path in `files`.
///
/// Recoverable syntax problems end up in [`SignatureFile::errors`]; only an
/// unreadable file or a bad format header fails.
pub fn load_signature_file(
    path: impl AsRef<Path>,
    files: &mut FileSet,
) -> Result<SignatureFile, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let file = files.intern(path);
    let parsed = SignatureFile::parse(&text, file).map_err(|e| LoadError::format(path, e))?;
    debug!(
        "[LOAD] {} ({}): {} classes, {} syntax errors",
        path.display(),
        parsed.file_format(),
        parsed.classes().len(),
        parsed.errors().len()
    );
    Ok(parsed)
}

/// Every `*.txt` file below `dir`, in path order.
pub fn collect_signature_paths(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            LoadError::io(path, io::Error::from(e))
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(SIGNATURE_EXTENSION)
        {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load every signature file below `dir` into one [`SignatureSet`]. The
/// first failing file aborts the load.
pub fn load_signature_dir(
    dir: impl AsRef<Path>,
    files: &mut FileSet,
) -> Result<SignatureSet, LoadError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LoadError::io(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "directory not found"),
        ));
    }
    let mut set = SignatureSet::new();
    for path in collect_signature_paths(dir)? {
        set.push(load_signature_file(&path, files)?);
    }
    debug!("[LOAD] {}: {} signature files", dir.display(), set.len());
    Ok(set)
}
