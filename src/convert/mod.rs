//! Conversion orchestration.
//!
//! [`Converter`] drives a [`SourceDocument`] through validation, extraction,
//! classification, synthesis and storage. Whatever the outcome, the attempt's
//! message and elapsed time are recorded on the document.
//!
//! # Example
//!
//! ```no_run
//! use accesspdf::convert::{Converter, DirectorySink};
//! use accesspdf::SourceDocument;
//! use std::sync::Arc;
//!
//! let converter = Converter::new(Arc::new(DirectorySink::new("salida")));
//! let mut doc = SourceDocument::from_path("informe.pdf");
//! let result = converter.convert(&mut doc);
//! println!("{} ({:?})", result.message, result.elapsed);
//! ```

mod recorder;
mod sink;

pub use recorder::{NoopRecorder, StateRecorder};
pub use sink::{artifact_file_name, ArtifactSink, DirectorySink, MemorySink};

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;

use crate::classify::{ClassifyOptions, StructureClassifier};
use crate::error::{catch_fault, Error, Result};
use crate::extract::{ContentExtractor, Extraction, ExtractionReport};
use crate::model::{ConversionResult, ConvertedArtifact, DocumentState, SourceDocument};
use crate::render::{MarkupSynthesizer, RenderOptions};
use crate::source::LopdfBackend;
use crate::validate::{FormatValidator, VALID_FORMAT_MESSAGE};

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Rendering options
    pub render: RenderOptions,

    /// Line classification options
    pub classify: ClassifyOptions,

    /// Convert batches on the rayon pool
    pub parallel: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set classification options.
    pub fn with_classify_options(mut self, options: ClassifyOptions) -> Self {
        self.classify = options;
        self
    }

    /// Set the declared document language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.render = self.render.with_language(language);
        self
    }

    /// Set the accessibility level label.
    pub fn with_accessibility_level(mut self, level: impl Into<String>) -> Self {
        self.render = self.render.with_accessibility_level(level);
        self
    }

    /// Convert batches one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            classify: ClassifyOptions::default(),
            parallel: true,
        }
    }
}

/// Orchestrates the PDF to accessible HTML pipeline.
///
/// A conversion takes `&mut SourceDocument`, so two conversions of the same
/// document cannot run at once. Distinct documents convert independently.
pub struct Converter {
    validator: FormatValidator,
    extractor: ContentExtractor,
    classifier: StructureClassifier,
    synthesizer: MarkupSynthesizer,
    sink: Arc<dyn ArtifactSink>,
    recorder: Arc<dyn StateRecorder>,
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with default options.
    pub fn new(sink: Arc<dyn ArtifactSink>) -> Self {
        Self::with_options(sink, ConvertOptions::default())
    }

    /// Create a converter with custom options.
    pub fn with_options(sink: Arc<dyn ArtifactSink>, options: ConvertOptions) -> Self {
        Self {
            validator: FormatValidator::new(),
            extractor: ContentExtractor::new(),
            classifier: StructureClassifier::with_options(&options.classify),
            synthesizer: MarkupSynthesizer::new(options.render.clone()),
            sink,
            recorder: Arc::new(NoopRecorder),
            options,
        }
    }

    /// Report document and artifact changes to `recorder`.
    pub fn with_recorder(mut self, recorder: Arc<dyn StateRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Replace the structure classifier.
    pub fn with_classifier(mut self, classifier: StructureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Validate a document.
    ///
    /// A pending or failed document moves to `Valid` or `Invalid`. A valid
    /// or converted document is checked again without changing state, so a
    /// converted one keeps its artifact; if the check fails it moves to
    /// `Invalid` and the artifact is unlinked. An invalid document is
    /// refused.
    pub fn validate(&self, doc: &mut SourceDocument) -> Result<()> {
        let start = Instant::now();
        let outcome = match doc.state() {
            DocumentState::Converted => self.recheck(doc),
            _ => self.admit(doc, "validar").map(|_| ()),
        };
        let message = match &outcome {
            Ok(()) => VALID_FORMAT_MESSAGE.to_string(),
            Err(e) => e.to_string(),
        };
        doc.record_outcome(message, start.elapsed());
        self.recorder.record_document(doc);
        outcome
    }

    /// Extract metadata and every page's text from a valid document.
    ///
    /// Results are applied to the document only if every page reads; any
    /// failure moves it to `ConversionFailed`.
    pub fn extract_content(&self, doc: &mut SourceDocument) -> Result<ExtractionReport> {
        if doc.state() != DocumentState::Valid {
            return Err(Error::InvalidState {
                document: doc.name().to_string(),
                from: doc.state(),
                action: "analizar",
            });
        }

        let start = Instant::now();
        let outcome = self
            .validator
            .open(doc.source())
            .and_then(|backend| self.extractor.extract_all(&backend))
            .map(|(report, _pages)| report);

        let message = match &outcome {
            Ok(report) => {
                doc.apply_report(report);
                format!("Contenido extraído: {} páginas", report.page_count)
            }
            Err(e) => {
                self.mark_failed(doc);
                e.to_string()
            }
        };
        doc.record_outcome(message, start.elapsed());
        self.recorder.record_document(doc);
        outcome
    }

    /// Convert a document, reporting the outcome as a [`ConversionResult`].
    ///
    /// Never panics and never returns early without recording elapsed time.
    pub fn convert(&self, doc: &mut SourceDocument) -> ConversionResult {
        let attempt = self.try_convert(doc);
        let message = doc.last_message().unwrap_or_default().to_string();
        let elapsed = doc.last_elapsed().unwrap_or_default();
        match attempt {
            Ok(artifact) => ConversionResult::success(message, elapsed, artifact),
            Err(_) => ConversionResult::failure(message, elapsed),
        }
    }

    /// Convert a document, returning the typed error on failure.
    ///
    /// A pending, converted or failed document is validated first. On
    /// success the new artifact replaces any previous one; the old bytes are
    /// left where they are.
    pub fn try_convert(&self, doc: &mut SourceDocument) -> Result<ConvertedArtifact> {
        let start = Instant::now();
        let attempt = self
            .admit(doc, "convertir")
            .and_then(|backend| self.produce(doc, &backend, start))
            .and_then(|artifact| {
                doc.transition(DocumentState::Converted)?;
                Ok(artifact)
            });
        let elapsed = start.elapsed();

        let message = match &attempt {
            Ok(artifact) => {
                if let Some(previous) = doc.link_artifact(artifact.clone()) {
                    if previous.location != artifact.location {
                        log::debug!(
                            "{}: previous artifact {} is no longer referenced",
                            doc.name(),
                            previous.location.display()
                        );
                    }
                }
                self.recorder.record_artifact(doc, artifact);
                log::info!(
                    "{}: converted in {:?} ({} tags, {} bytes)",
                    doc.name(),
                    elapsed,
                    artifact.tag_count,
                    artifact.size_bytes
                );
                format!(
                    "Conversión exitosa: {} ({} etiquetas)",
                    doc.name(),
                    artifact.tag_count
                )
            }
            Err(e) => {
                self.mark_failed(doc);
                log::warn!("{}: conversion failed: {}", doc.name(), e);
                e.to_string()
            }
        };

        doc.record_outcome(message, elapsed);
        self.recorder.record_document(doc);
        attempt
    }

    /// Convert several documents, in parallel unless the options say otherwise.
    ///
    /// Results are in the same order as `docs`.
    pub fn convert_all(&self, docs: &mut [SourceDocument]) -> Vec<ConversionResult> {
        if self.options.parallel {
            docs.par_iter_mut().map(|doc| self.convert(doc)).collect()
        } else {
            docs.iter_mut().map(|doc| self.convert(doc)).collect()
        }
    }

    /// Bytes of the document's current artifact.
    pub fn download(&self, doc: &SourceDocument) -> Result<Vec<u8>> {
        let artifact = doc
            .artifact()
            .ok_or_else(|| Error::ArtifactNotFound(doc.name().to_string()))?;
        self.sink.retrieve(&artifact.location)
    }

    /// Bring `doc` to `Valid` and hand back its parsed form.
    fn admit(&self, doc: &mut SourceDocument, action: &'static str) -> Result<LopdfBackend> {
        match doc.state() {
            DocumentState::Invalid => Err(Error::InvalidState {
                document: doc.name().to_string(),
                from: DocumentState::Invalid,
                action,
            }),
            DocumentState::Valid => self.validator.open(doc.source()),
            _ => match self.validator.open(doc.source()) {
                Ok(backend) => {
                    doc.transition(DocumentState::Valid)?;
                    Ok(backend)
                }
                Err(e) => {
                    log::warn!("{}: validation failed: {}", doc.name(), e);
                    doc.transition(DocumentState::Invalid)?;
                    Err(e)
                }
            },
        }
    }

    /// Check a converted document's source again, keeping its state on success.
    fn recheck(&self, doc: &mut SourceDocument) -> Result<()> {
        match self.validator.validate(doc.source()) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("{}: validation failed: {}", doc.name(), e);
                doc.transition(DocumentState::Invalid)?;
                Err(e)
            }
        }
    }

    fn produce(
        &self,
        doc: &mut SourceDocument,
        backend: &LopdfBackend,
        start: Instant,
    ) -> Result<ConvertedArtifact> {
        let Extraction { report, pages } = self.extractor.extract(backend);

        // Each page's text is dropped once classified.
        let mut classified = Vec::with_capacity(report.page_count as usize);
        for page in pages {
            classified.push(self.classifier.classify_page(&page?));
        }
        doc.apply_report(&report);

        let synthesis = catch_fault(
            || self.synthesizer.synthesize(report.title(), &classified),
            Error::Synthesis,
        )?;
        let tag_count = synthesis.tag_count();
        let tags_used = synthesis.tags.tags_used();
        let bytes = synthesis.into_bytes();

        let id = doc.id();
        let name = doc.name().to_string();
        let location = catch_fault(|| self.sink.store(id, &name, &bytes), Error::Synthesis)?;

        Ok(ConvertedArtifact {
            document_id: id,
            source_name: name,
            location,
            size_bytes: bytes.len() as u64,
            tag_count,
            tags_used,
            language: self.options.render.language.clone(),
            accessibility_level: self.options.render.accessibility_level.clone(),
            generated_at: Utc::now(),
            elapsed: start.elapsed(),
        })
    }

    fn mark_failed(&self, doc: &mut SourceDocument) {
        if doc.state() == DocumentState::Valid {
            if let Err(e) = doc.transition(DocumentState::ConversionFailed) {
                log::error!("{}", e);
            }
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Arc::new(MemorySink::new()))
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("classifier", &self.classifier)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
