//! Best-effort capture of raw page HTML for failed lookups.
//!
//! When a certificate exhausts its retry budget the pipeline saves the
//! final page source to `<dir>/<cert_id>.html` so the failure can be
//! inspected offline. Snapshot failures are logged and swallowed; they
//! never affect the outcome of a lookup.

use std::path::{Path, PathBuf};

use certscan_core::CertId;
use tracing::{info, warn};

/// Writes per-certificate HTML snapshots into a debug directory.
#[derive(Debug, Clone)]
pub struct SnapshotRecorder {
    dir: PathBuf,
}

impl SnapshotRecorder {
    /// Creates a recorder rooted at `dir`. The directory is created
    /// lazily on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the snapshot for `cert_id` is written to.
    #[must_use]
    pub fn artifact_path(&self, cert_id: &CertId) -> PathBuf {
        self.dir.join(format!("{}.html", cert_id.as_str()))
    }

    /// Directory snapshots are written into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `page_content` as the snapshot for `cert_id`.
    ///
    /// Best effort: any I/O failure is logged at warn level and
    /// otherwise ignored.
    pub async fn save(&self, cert_id: &CertId, page_content: &str) {
        match self.write(cert_id, page_content).await {
            Ok(path) => {
                info!(
                    "Saved debug snapshot for certificate {} to {}",
                    cert_id,
                    path.display()
                );
            }
            Err(e) => {
                warn!("Failed to save snapshot for certificate {}: {}", cert_id, e);
            }
        }
    }

    async fn write(&self, cert_id: &CertId, page_content: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.artifact_path(cert_id);
        tokio::fs::write(&path, page_content).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(id: &str) -> CertId {
        CertId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_save_writes_html_file() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = SnapshotRecorder::new(dir.path().join("snaps"));

        let id = cert("PSA-12345");
        recorder.save(&id, "<html><body>gone</body></html>").await;

        let path = recorder.artifact_path(&id);
        assert!(path.exists());
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("gone"));
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // Point the recorder at a path occupied by a regular file so
        // create_dir_all fails.
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "not a directory").unwrap();

        let recorder = SnapshotRecorder::new(&blocker);
        recorder.save(&cert("12345"), "<html></html>").await;

        // Still a file, and no panic.
        assert!(blocker.is_file());
    }

    #[tokio::test]
    async fn test_artifact_path_uses_cert_id() {
        let recorder = SnapshotRecorder::new("debug_snapshots");
        let path = recorder.artifact_path(&cert("ABC-9"));
        assert_eq!(path, PathBuf::from("debug_snapshots/ABC-9.html"));
    }
}
