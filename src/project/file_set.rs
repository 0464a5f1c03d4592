//! Path ↔ [`FileId`] mapping for one session.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::base::FileId;

/// Hands out one [`FileId`] per distinct path, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    paths: Vec<PathBuf>,
    ids: FxHashMap<PathBuf, FileId>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of `path`, allocating one on first use.
    pub fn intern(&mut self, path: impl AsRef<Path>) -> FileId {
        let path = path.as_ref();
        if let Some(&id) = self.ids.get(path) {
            return id;
        }
        let id = FileId::new(self.paths.len() as u32);
        self.paths.push(path.to_path_buf());
        self.ids.insert(path.to_path_buf(), id);
        id
    }

    pub fn file_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.ids.get(path.as_ref()).copied()
    }

    pub fn path(&self, file: FileId) -> Option<&Path> {
        self.paths.get(file.index()).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &Path)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, path)| (FileId::new(i as u32), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
