//! "Save bytes as named file".

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{RdapError, RdapResult};

/// Destination for exported reports.
pub trait ReportExporter: Send + Sync {
    /// Store `bytes` under `filename` and return where they went.
    fn export(&self, filename: &str, bytes: &[u8]) -> RdapResult<PathBuf>;
}

/// Writes exports into a directory, creating it when missing. Existing files are replaced.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// A filename must be a single plain path component.
fn check_filename(filename: &str) -> RdapResult<()> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !filename.contains(['/', '\\']) => Ok(()),
        _ => Err(RdapError::ValidationError(format!(
            "Invalid export filename: {filename:?}"
        ))),
    }
}

impl ReportExporter for FileExporter {
    fn export(&self, filename: &str, bytes: &[u8]) -> RdapResult<PathBuf> {
        check_filename(filename)?;

        fs::create_dir_all(&self.dir).map_err(|e| {
            RdapError::ExportError(format!("Cannot create {}: {e}", self.dir.display()))
        })?;

        let path = self.dir.join(filename);
        fs::write(&path, bytes)
            .map_err(|e| RdapError::ExportError(format!("Cannot write {}: {e}", path.display())))?;

        log::info!("[export] wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        let path = exporter.export("rdap-example.com.txt", b"report\n").unwrap();
        assert_eq!(path, dir.path().join("rdap-example.com.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "report\n");
    }

    #[test]
    fn test_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("2024");
        let exporter = FileExporter::new(&nested);
        exporter.export("a.txt", b"x").unwrap();
        assert!(nested.join("a.txt").is_file());
    }

    #[test]
    fn test_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        exporter.export("a.txt", b"first").unwrap();
        let path = exporter.export("a.txt", b"second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_export_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        for name in ["", ".", "..", "../escape.txt", "sub/file.txt", "sub\\file.txt", "/etc/passwd"] {
            assert!(
                matches!(exporter.export(name, b"x"), Err(RdapError::ValidationError(_))),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_export_allows_double_dot_inside_name() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(dir.path());
        assert!(exporter.export("rdap-a..b.txt", b"x").is_ok());
    }
}
