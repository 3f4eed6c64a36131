use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sitewright_core::{CoreError, FileUpdate};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// What happened to a batch of updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Paths written, in application order.
    pub written: Vec<PathBuf>,
    /// File names refused because they would land outside the site directory.
    pub rejected: Vec<String>,
}

/// Write each update under `root`, in order. A later update to the same file
/// replaces an earlier one. Unsafe names are skipped; I/O failures abort.
pub fn apply_updates(root: &Path, updates: &[FileUpdate]) -> Result<ApplyReport, CoreError> {
    let mut report = ApplyReport::default();

    for update in updates {
        let path = match update.resolve(root) {
            Ok(path) => path,
            Err(e) => {
                warn!("refusing to write {:?}: {e}", update.file);
                report.rejected.push(update.file.clone());
                continue;
            }
        };

        info!("updating {}...", update.file);
        write_atomic(&path, &update.content)?;
        report.written.push(path);
    }

    Ok(report)
}

/// Replace `path` with `content` via a temp file in the same directory and a
/// rename, so readers never observe a partial file. Existing permissions are
/// kept. A symlink at `path` is written through: its target gets the new
/// content and the link itself stays in place.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), CoreError> {
    let write_err = |source: io::Error| CoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = link_target(path).map_err(write_err)?;
    let path = target.as_path();
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp.path(), permissions).map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// The file a write to `path` should land in. Follows symlinks, including
/// dangling ones, whose target is created.
fn link_target(path: &Path) -> io::Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(resolved) => Ok(resolved),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let link = fs::read_link(path)?;
                Ok(parent_dir(path).join(link))
            }
            Err(e) => Err(e),
        },
        _ => Ok(path.to_path_buf()),
    }
}

// NamedTempFile creates files as 0600; new site files should be world-readable.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
