//! Document byte sources.
//!
//! A [`ByteSource`] is the handle the environment gives us for a submitted
//! document: a name plus a way to open its bytes. Every read opens a fresh
//! reader that is dropped before the call returns.

mod backend;

pub use backend::{decode_pdf_string, LopdfBackend, PdfBackend};

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// A named, re-openable stream of document bytes.
pub trait ByteSource: Send + Sync {
    /// Name of the document as submitted (usually a file name).
    fn name(&self) -> &str;

    /// Open a fresh reader over the bytes.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;

    /// Read the whole source into memory.
    fn read_all(&self) -> io::Result<Vec<u8>> {
        let mut reader = self.open()?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Lowercase extension of the name, without the dot.
    fn extension(&self) -> Option<String> {
        Path::new(self.name())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// A document stored on the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    /// Create a source for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A document held in memory, e.g. an upload buffer.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    data: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.data.as_slice())))
    }

    fn read_all(&self) -> io::Result<Vec<u8>> {
        Ok(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extension_is_lowercased() {
        let source = MemorySource::new("Report.PDF", Vec::new());
        assert_eq!(source.extension(), Some("pdf".to_string()));

        let source = MemorySource::new("README", Vec::new());
        assert_eq!(source.extension(), None);
    }

    #[test]
    fn test_memory_source_reads_back() {
        let source = MemorySource::new("a.pdf", b"%PDF-1.4".to_vec());
        assert_eq!(source.read_all().unwrap(), b"%PDF-1.4");
        assert_eq!(source.len(), 8);
    }

    #[test]
    fn test_file_source_name_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"%PDF-1.7 body").unwrap();
        drop(file);

        let source = FileSource::new(&path);
        assert_eq!(source.name(), "scan.pdf");
        assert_eq!(source.read_all().unwrap(), b"%PDF-1.7 body");
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/dir/missing.pdf");
        assert!(source.read_all().is_err());
    }
}
