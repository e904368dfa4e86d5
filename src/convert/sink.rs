//! Artifact storage.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::model::DocumentId;

/// Where converted HTML is written and read back from.
pub trait ArtifactSink: Send + Sync {
    /// Store the artifact of document `id`, returning its location.
    ///
    /// The location depends on `id`, so documents sharing a file name never
    /// overwrite each other. Storing again for the same document replaces
    /// the previous bytes.
    fn store(&self, id: DocumentId, source_name: &str, bytes: &[u8]) -> Result<PathBuf>;

    /// Read back a stored artifact.
    ///
    /// Returns `Error::ArtifactMissingOnDisk` if nothing is stored there.
    fn retrieve(&self, location: &Path) -> Result<Vec<u8>>;
}

/// File name for an artifact: `<stem>-<id>.html`.
///
/// The stem of `source_name` is kept as a readable prefix; `id` makes the
/// name unique.
pub fn artifact_file_name(id: DocumentId, source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('.');
    let stem = if stem.is_empty() { "documento" } else { stem };
    format!("{}-{}.html", stem, id.simple())
}

/// Writes artifacts as files under a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = File::create(path)?;
        file.write_all(bytes)?;
        file.flush()
    }
}

impl ArtifactSink for DirectorySink {
    fn store(&self, id: DocumentId, source_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(artifact_file_name(id, source_name));
        self.write_file(&path, bytes)
            .map_err(|e| Error::Synthesis(format!("{}: {}", path.display(), e)))?;
        Ok(path)
    }

    fn retrieve(&self, location: &Path) -> Result<Vec<u8>> {
        match fs::read(location) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::ArtifactMissingOnDisk(location.to_path_buf()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop a stored artifact, returning its bytes.
    pub fn remove(&self, location: &Path) -> Option<Vec<u8>> {
        self.lock().remove(location)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ArtifactSink for MemorySink {
    fn store(&self, id: DocumentId, source_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let location = PathBuf::from(artifact_file_name(id, source_name));
        self.lock().insert(location.clone(), bytes.to_vec());
        Ok(location)
    }

    fn retrieve(&self, location: &Path) -> Result<Vec<u8>> {
        self.lock()
            .get(location)
            .cloned()
            .ok_or_else(|| Error::ArtifactMissingOnDisk(location.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_artifact_file_name() {
        let id = DocumentId(Uuid::nil());
        let suffix = "00000000000000000000000000000000";
        assert_eq!(
            artifact_file_name(id, "informe.pdf"),
            format!("informe-{}.html", suffix)
        );
        assert_eq!(
            artifact_file_name(id, "docs/mi archivo.PDF"),
            format!("mi_archivo-{}.html", suffix)
        );
        assert_eq!(
            artifact_file_name(id, "..."),
            format!("documento-{}.html", suffix)
        );
        assert_eq!(
            artifact_file_name(id, ""),
            format!("documento-{}.html", suffix)
        );
    }

    #[test]
    fn test_same_name_different_documents() {
        let a = DocumentId::new();
        let b = DocumentId::new();
        assert_ne!(
            artifact_file_name(a, "a/report.pdf"),
            artifact_file_name(b, "b/report.pdf")
        );
    }

    #[test]
    fn test_directory_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));
        let id = DocumentId::new();

        let location = sink.store(id, "a.pdf", b"<html></html>").unwrap();
        assert_eq!(
            location,
            dir.path().join("out").join(artifact_file_name(id, "a.pdf"))
        );
        assert_eq!(sink.retrieve(&location).unwrap(), b"<html></html>");
    }

    #[test]
    fn test_directory_sink_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let id = DocumentId::new();

        let first = sink.store(id, "a.pdf", b"one").unwrap();
        let second = sink.store(id, "a.pdf", b"two").unwrap();
        assert_eq!(first, second);
        assert_eq!(sink.retrieve(&second).unwrap(), b"two");
    }

    #[test]
    fn test_directory_sink_keeps_same_named_documents_apart() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        let first = sink.store(DocumentId::new(), "report.pdf", b"alpha").unwrap();
        let second = sink.store(DocumentId::new(), "report.pdf", b"beta").unwrap();
        assert_ne!(first, second);
        assert_eq!(sink.retrieve(&first).unwrap(), b"alpha");
        assert_eq!(sink.retrieve(&second).unwrap(), b"beta");
    }

    #[test]
    fn test_directory_sink_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let location = sink.store(DocumentId::new(), "a.pdf", b"x").unwrap();
        fs::remove_file(&location).unwrap();

        assert!(matches!(
            sink.retrieve(&location),
            Err(Error::ArtifactMissingOnDisk(p)) if p == location
        ));
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        let location = sink.store(DocumentId::new(), "b.pdf", b"html").unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.retrieve(&location).unwrap(), b"html");

        sink.remove(&location);
        assert!(sink.is_empty());
        assert!(matches!(
            sink.retrieve(&location),
            Err(Error::ArtifactMissingOnDisk(_))
        ));
    }
}
