use std::path::{Component, Path, PathBuf};

use crate::CoreError;

/// Full replacement content for one file, as extracted from a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub file: String,
    pub content: String,
}

impl FileUpdate {
    pub fn new(file: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            content: content.into(),
        }
    }

    /// Resolve the target path under `root`, rejecting names that are empty,
    /// absolute, or climb out of `root`.
    pub fn resolve(&self, root: &Path) -> Result<PathBuf, CoreError> {
        let rel = Path::new(&self.file);
        if self.file.is_empty() {
            return Err(CoreError::UnsafePath("empty file name".into()));
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(CoreError::UnsafePath(self.file.clone())),
            }
        }
        Ok(root.join(rel))
    }
}
