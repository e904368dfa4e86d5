//! Content extraction.
//!
//! Reads document-level metadata eagerly and page text lazily. Missing
//! metadata never fails an extraction; an unreadable page does.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::error::{catch_fault, Error, Result};
use crate::model::{Metadata, PageContent};
use crate::source::PdfBackend;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Document-level facts gathered by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Number of pages
    pub page_count: u32,

    /// Source length in bytes
    pub size_bytes: u64,

    /// Source length in megabytes, rounded to two decimals
    pub size_mb: f64,

    /// Title, author and flags
    pub metadata: Metadata,
}

impl ExtractionReport {
    /// Title, or "Untitled".
    pub fn title(&self) -> &str {
        self.metadata.title_or_default()
    }

    /// Author, or "Unknown".
    pub fn author(&self) -> &str {
        self.metadata.author_or_default()
    }

    /// Whether the source carries the structurally-tagged marker.
    pub fn structurally_tagged(&self) -> bool {
        self.metadata.tagged
    }
}

/// Convert a byte length to megabytes, rounded to two decimals.
pub fn size_in_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}

/// A report plus the page texts still to be read.
pub struct Extraction<'a> {
    /// Document-level facts
    pub report: ExtractionReport,

    /// Page texts, read on demand
    pub pages: PageTexts<'a>,
}

/// Single-pass iterator over page texts, in page order.
///
/// Stops after the first error; reading again requires a new extraction.
pub struct PageTexts<'a> {
    backend: &'a dyn PdfBackend,
    next: usize,
    count: usize,
}

impl<'a> PageTexts<'a> {
    fn new(backend: &'a dyn PdfBackend) -> Self {
        Self {
            backend,
            next: 0,
            count: backend.page_count() as usize,
        }
    }
}

impl Iterator for PageTexts<'_> {
    type Item = Result<PageContent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let backend = self.backend;
        match catch_fault(|| backend.page_text(index), Error::Extraction) {
            Ok(text) => Some(Ok(PageContent::new(index, text))),
            Err(e) => {
                log::warn!("Failed to extract text from page {}: {}", index + 1, e);
                self.next = self.count;
                Some(Err(match e {
                    Error::Extraction(_) => e,
                    other => Error::Extraction(other.to_string()),
                }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (0, Some(remaining))
    }
}

impl FusedIterator for PageTexts<'_> {}

/// Pulls metadata and page text out of a parsed PDF.
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    _private: (),
}

impl ContentExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Read the report and prepare lazy page reads.
    pub fn extract<'a>(&self, backend: &'a dyn PdfBackend) -> Extraction<'a> {
        Extraction {
            report: self.report(backend),
            pages: PageTexts::new(backend),
        }
    }

    /// Read the report and every page, all or nothing.
    pub fn extract_all(&self, backend: &dyn PdfBackend) -> Result<(ExtractionReport, Vec<PageContent>)> {
        let Extraction { report, pages } = self.extract(backend);
        let pages = pages.collect::<Result<Vec<_>>>()?;
        Ok((report, pages))
    }

    fn report(&self, backend: &dyn PdfBackend) -> ExtractionReport {
        let size_bytes = backend.byte_len();
        ExtractionReport {
            page_count: backend.page_count(),
            size_bytes,
            size_mb: size_in_mb(size_bytes),
            metadata: Metadata {
                title: backend.info_string(b"Title"),
                author: backend.info_string(b"Author"),
                pdf_version: backend.version(),
                encrypted: backend.is_encrypted(),
                tagged: self.structurally_tagged(backend),
            },
        }
    }

    /// The accessibility marker, with any failure read as `false`.
    fn structurally_tagged(&self, backend: &dyn PdfBackend) -> bool {
        match catch_fault(|| backend.is_marked(), Error::Extraction) {
            Ok(marked) => marked,
            Err(e) => {
                log::debug!("Ignoring unreadable accessibility marker: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::PdfFixture;
    use crate::source::LopdfBackend;

    /// Backend whose pages fail from a given index on.
    struct FlakyBackend {
        pages: Vec<&'static str>,
        fail_from: usize,
        marker: Result<bool>,
    }

    impl PdfBackend for FlakyBackend {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_text(&self, index: usize) -> Result<String> {
            if index >= self.fail_from {
                return Err(Error::Extraction(format!("página {} ilegible", index + 1)));
            }
            Ok(self.pages[index].to_string())
        }

        fn info_string(&self, _key: &[u8]) -> Option<String> {
            None
        }

        fn is_marked(&self) -> Result<bool> {
            match &self.marker {
                Ok(b) => Ok(*b),
                Err(_) => Err(Error::Extraction("MarkInfo roto".to_string())),
            }
        }

        fn version(&self) -> String {
            "1.7".to_string()
        }

        fn is_encrypted(&self) -> bool {
            false
        }

        fn byte_len(&self) -> u64 {
            3 * 1024 * 1024 + 512 * 1024
        }
    }

    #[test]
    fn test_size_in_mb() {
        assert_eq!(size_in_mb(0), 0.0);
        assert_eq!(size_in_mb(1024 * 1024), 1.0);
        assert_eq!(size_in_mb(1_500_000), 1.43);
    }

    #[test]
    fn test_report_defaults_missing_metadata() {
        let data = PdfFixture::new().page(&["x"]).build();
        let backend = LopdfBackend::load_bytes(&data).unwrap();
        let extraction = ContentExtractor::new().extract(&backend);

        assert_eq!(extraction.report.title(), "Untitled");
        assert_eq!(extraction.report.author(), "Unknown");
        assert!(!extraction.report.structurally_tagged());
        assert_eq!(extraction.report.page_count, 1);
        assert_eq!(extraction.report.size_bytes, data.len() as u64);
    }

    #[test]
    fn test_report_reads_metadata_and_marker() {
        let data = PdfFixture::new()
            .page(&["x"])
            .title("Guía")
            .author("Equipo")
            .marked(true)
            .build();
        let backend = LopdfBackend::load_bytes(&data).unwrap();
        let report = ContentExtractor::new().extract(&backend).report;

        assert_eq!(report.title(), "Guía");
        assert_eq!(report.author(), "Equipo");
        assert!(report.structurally_tagged());
    }

    #[test]
    fn test_malformed_marker_reads_false() {
        let backend = FlakyBackend {
            pages: vec!["a"],
            fail_from: usize::MAX,
            marker: Err(Error::Extraction(String::new())),
        };
        let report = ContentExtractor::new().extract(&backend).report;
        assert!(!report.structurally_tagged());
        assert_eq!(report.size_mb, 3.5);
    }

    #[test]
    fn test_pages_are_lazy_and_ordered() {
        let backend = FlakyBackend {
            pages: vec!["uno", "", "tres"],
            fail_from: usize::MAX,
            marker: Ok(false),
        };
        let pages: Vec<_> = ContentExtractor::new()
            .extract(&backend)
            .pages
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0], PageContent::new(0, "uno"));
        assert_eq!(pages[1], PageContent::empty(1));
        assert_eq!(pages[2].index, 2);
    }

    #[test]
    fn test_page_failure_stops_iteration() {
        let backend = FlakyBackend {
            pages: vec!["uno", "dos", "tres"],
            fail_from: 1,
            marker: Ok(false),
        };
        let mut pages = ContentExtractor::new().extract(&backend).pages;
        assert!(pages.next().unwrap().is_ok());
        assert!(matches!(pages.next(), Some(Err(Error::Extraction(_)))));
        assert!(pages.next().is_none());
    }

    #[test]
    fn test_extract_all_discards_partial_results() {
        let backend = FlakyBackend {
            pages: vec!["uno", "dos"],
            fail_from: 1,
            marker: Ok(true),
        };
        let result = ContentExtractor::new().extract_all(&backend);
        assert!(matches!(result, Err(Error::Extraction(_))));
    }
}
