use std::io::ErrorKind;
use std::path::Path;

use crate::CoreError;

/// The files the agent reads and may rewrite, relative to the site directory.
pub const TARGET_FILES: [&str; 2] = ["index.html", "style.css"];

/// Stands in for the content of a target file that is not on disk.
pub const MISSING_FILE_SENTINEL: &str = "(File does not exist yet)";

/// Current state of one target file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub name: String,
    /// `None` when the file does not exist.
    pub content: Option<String>,
}

impl SnapshotEntry {
    pub fn exists(&self) -> bool {
        self.content.is_some()
    }

    /// File content, or [`MISSING_FILE_SENTINEL`] for absent files.
    pub fn content_or_sentinel(&self) -> &str {
        self.content.as_deref().unwrap_or(MISSING_FILE_SENTINEL)
    }

    /// Fence language tag derived from the file extension.
    pub fn language_tag(&self) -> &str {
        language_tag(&self.name)
    }
}

/// Read-once view of the target files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl FileSnapshot {
    /// Snapshot [`TARGET_FILES`] under `dir`.
    pub fn read(dir: &Path) -> Result<Self, CoreError> {
        Self::read_files(dir, &TARGET_FILES)
    }

    /// Snapshot an explicit list of files under `dir`. Absent files are
    /// recorded as such; any other read failure is an error.
    pub fn read_files(dir: &Path, names: &[&str]) -> Result<Self, CoreError> {
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(name);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => Some(content),
                Err(e) if e.kind() == ErrorKind::NotFound => None,
                Err(e) => return Err(CoreError::Read { path, source: e }),
            };
            entries.push(SnapshotEntry {
                name: (*name).to_string(),
                content,
            });
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<SnapshotEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&SnapshotEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

pub fn language_tag(name: &str) -> &str {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "html",
        Some("css") => "css",
        Some("js") => "javascript",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_existing_and_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("index.html"), "<h1>Hi</h1>\n").unwrap();

        let snapshot = FileSnapshot::read(tmp.path()).unwrap();
        assert_eq!(snapshot.entries().len(), 2);

        let html = snapshot.get("index.html").unwrap();
        assert!(html.exists());
        assert_eq!(html.content_or_sentinel(), "<h1>Hi</h1>\n");

        let css = snapshot.get("style.css").unwrap();
        assert!(!css.exists());
        assert_eq!(css.content_or_sentinel(), MISSING_FILE_SENTINEL);
    }

    #[test]
    fn preserves_target_order() {
        let tmp = tempfile::tempdir().unwrap();
        let snapshot = FileSnapshot::read(tmp.path()).unwrap();
        let names: Vec<&str> = snapshot.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, TARGET_FILES);
    }

    #[test]
    fn empty_file_is_not_missing() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("style.css"), "").unwrap();
        let snapshot = FileSnapshot::read(tmp.path()).unwrap();
        let css = snapshot.get("style.css").unwrap();
        assert!(css.exists());
        assert_eq!(css.content_or_sentinel(), "");
    }

    #[test]
    fn non_utf8_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("index.html"), [0xff, 0xfe, 0x00]).unwrap();
        let err = FileSnapshot::read(tmp.path()).unwrap_err();
        assert!(matches!(err, CoreError::Read { .. }), "got {err:?}");
        assert!(err.to_string().contains("index.html"));
    }

    #[test]
    fn language_tags() {
        assert_eq!(language_tag("index.html"), "html");
        assert_eq!(language_tag("style.css"), "css");
        assert_eq!(language_tag("app.js"), "javascript");
        assert_eq!(language_tag("README"), "");
    }
}
