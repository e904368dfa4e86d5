//! Format validation.
//!
//! Checks run in order and stop at the first failure:
//! 1. the name carries a `.pdf` extension,
//! 2. the bytes start with a PDF header and parse as a PDF,
//! 3. the document has at least one page.
//!
//! No page text is read here.

use crate::detect::detect_format_from_bytes;
use crate::error::{catch_fault, Error, Result};
use crate::source::{ByteSource, LopdfBackend, PdfBackend};

/// The extension accepted by the validator.
pub const PDF_EXTENSION: &str = "pdf";

/// Message reported for a source that passes every check.
pub const VALID_FORMAT_MESSAGE: &str = "Formato PDF válido";

/// Confirms a byte source is a non-empty, parseable PDF.
#[derive(Debug, Clone, Default)]
pub struct FormatValidator {
    _private: (),
}

impl FormatValidator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Validate `source` without keeping the parsed document.
    pub fn validate(&self, source: &dyn ByteSource) -> Result<()> {
        self.open(source).map(|_| ())
    }

    /// Validate `source` and hand back the parsed document.
    ///
    /// The source's reader is closed before this returns, on every path.
    pub fn open(&self, source: &dyn ByteSource) -> Result<LopdfBackend> {
        self.check_extension(source)?;

        let data = source
            .read_all()
            .map_err(|e| Error::CorruptDocument(e.to_string()))?;
        let format = detect_format_from_bytes(&data)?;

        let backend = catch_fault(|| LopdfBackend::load_bytes(&data), Error::CorruptDocument)
            .map_err(|e| match e {
                Error::Io(io) => Error::CorruptDocument(io.to_string()),
                other => other,
            })?;

        if backend.page_count() == 0 {
            return Err(Error::EmptyDocument);
        }

        log::debug!(
            "{}: {} with {} pages",
            source.name(),
            format,
            backend.page_count()
        );
        Ok(backend)
    }

    fn check_extension(&self, source: &dyn ByteSource) -> Result<()> {
        match source.extension() {
            Some(ext) if ext == PDF_EXTENSION => Ok(()),
            _ => Err(Error::InvalidExtension),
        }
    }
}
