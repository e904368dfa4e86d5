//! # accesspdf
//!
//! Converts PDF documents into accessibility-annotated HTML.
//!
//! A document is validated, its metadata and page text extracted, each
//! text line classified as heading or paragraph, and the result rendered
//! as a semantic HTML document with a declared language, a skip link and
//! one labelled section per page.
//!
//! ## Quick Start
//!
//! ```no_run
//! use accesspdf::{convert_to_markup, DirectorySink, SourceDocument};
//! use std::sync::Arc;
//!
//! let mut doc = SourceDocument::from_path("informe.pdf");
//! let result = convert_to_markup(&mut doc, Arc::new(DirectorySink::new("salida")));
//! if let Some(artifact) = result.artifact {
//!     println!("{} ({} tags)", artifact.location.display(), artifact.tag_count);
//! } else {
//!     eprintln!("{}", result.message);
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`validate`]: extension, header and page-count checks
//! - [`extract`]: metadata plus lazy per-page text
//! - [`classify`]: line-level heading/paragraph classification
//! - [`render`]: HTML synthesis and JSON reports
//! - [`convert`]: the orchestrator, artifact sinks and state recording

pub mod classify;
pub mod convert;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod source;
pub mod validate;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use classify::{ClassifyOptions, LineClassifier, StructureClassifier, UppercaseHeuristic};
pub use convert::{
    ArtifactSink, ConvertOptions, Converter, DirectorySink, MemorySink, NoopRecorder,
    StateRecorder,
};
pub use detect::{detect_format_from_bytes, PdfFormat};
pub use error::{Error, Result};
pub use extract::{ContentExtractor, ExtractionReport};
pub use model::{
    BlockKind, ClassifiedPage, ContentBlock, ConversionResult, ConvertedArtifact, DocumentId,
    DocumentState, Metadata, Outcome, PageContent, SourceDocument,
};
pub use render::{JsonFormat, MarkupSynthesizer, RenderOptions};
pub use source::{ByteSource, FileSource, MemorySource};
pub use validate::{FormatValidator, VALID_FORMAT_MESSAGE};

use std::sync::Arc;

/// Check that a byte source is a non-empty PDF.
///
/// Returns whether it passed and a message for the user: either
/// [`VALID_FORMAT_MESSAGE`] or the reason it was rejected.
///
/// # Example
///
/// ```no_run
/// use accesspdf::{validate_format, FileSource};
///
/// let (ok, message) = validate_format(&FileSource::new("informe.pdf"));
/// println!("{}: {}", ok, message);
/// ```
pub fn validate_format(source: &dyn ByteSource) -> (bool, String) {
    match FormatValidator::new().validate(source) {
        Ok(()) => (true, VALID_FORMAT_MESSAGE.to_string()),
        Err(e) => (false, e.to_string()),
    }
}

/// Validate a byte source and read its metadata and every page.
///
/// Fails if any page cannot be read; nothing partial is returned.
pub fn extract_content(source: &dyn ByteSource) -> Result<ExtractionReport> {
    let backend = FormatValidator::new().open(source)?;
    let (report, _pages) = ContentExtractor::new().extract_all(&backend)?;
    Ok(report)
}

/// Convert a document with default options, storing the artifact in `sink`.
pub fn convert_to_markup(doc: &mut SourceDocument, sink: Arc<dyn ArtifactSink>) -> ConversionResult {
    Converter::new(sink).convert(doc)
}
