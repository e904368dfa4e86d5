//! Source document and its lifecycle.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ConvertedArtifact;
use crate::error::{Error, Result};
use crate::extract::ExtractionReport;
use crate::source::{ByteSource, FileSource, MemorySource};

/// Placeholder shown when a document has no title.
pub const UNTITLED: &str = "Untitled";

/// Placeholder shown when a document has no author.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Identity of a [`SourceDocument`], stable across re-conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Hyphen-free form used in artifact file names.
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation and conversion state of a [`SourceDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentState {
    /// Ingested, not yet validated.
    Pending,
    /// Passed format validation.
    Valid,
    /// Rejected by format validation; the document should be discarded.
    Invalid,
    /// Extraction or synthesis failed.
    ConversionFailed,
    /// An artifact was produced.
    Converted,
}

impl DocumentState {
    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// `Converted` and `ConversionFailed` may re-enter validation for a
    /// re-conversion. `Invalid` is final.
    pub fn can_transition_to(self, next: DocumentState) -> bool {
        use DocumentState::*;
        matches!(
            (self, next),
            (Pending, Valid)
                | (Pending, Invalid)
                | (Valid, Converted)
                | (Valid, ConversionFailed)
                | (Converted, Valid)
                | (Converted, Invalid)
                | (ConversionFailed, Valid)
                | (ConversionFailed, Invalid)
        )
    }

    /// Whether the state ends a conversion attempt.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DocumentState::Invalid | DocumentState::ConversionFailed | DocumentState::Converted
        )
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentState::Pending => "Pending",
            DocumentState::Valid => "Valid",
            DocumentState::Invalid => "Invalid",
            DocumentState::ConversionFailed => "ConversionFailed",
            DocumentState::Converted => "Converted",
        };
        f.write_str(name)
    }
}

/// Document-level metadata read from the PDF.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title, if the info dictionary carries one
    pub title: Option<String>,

    /// Document author, if the info dictionary carries one
    pub author: Option<String>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Whether the document is encrypted
    pub encrypted: bool,

    /// Whether the catalog marks the document as structurally tagged
    pub tagged: bool,
}

impl Metadata {
    /// Title, or [`UNTITLED`] when absent.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    /// Author, or [`UNKNOWN_AUTHOR`] when absent.
    pub fn author_or_default(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_AUTHOR)
    }
}

/// A PDF submitted for conversion.
///
/// Holds the byte source handle plus everything validation, extraction and
/// conversion record about it. State changes go through
/// [`DocumentState::can_transition_to`].
pub struct SourceDocument {
    id: DocumentId,
    source: Arc<dyn ByteSource>,
    name: String,
    state: DocumentState,
    size_bytes: u64,
    size_mb: f64,
    page_count: u32,
    metadata: Metadata,
    artifact: Option<ConvertedArtifact>,
    last_message: Option<String>,
    last_elapsed: Option<Duration>,
}

impl SourceDocument {
    /// Wrap a byte source as a new pending document.
    pub fn new(source: impl ByteSource + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    /// Wrap an already shared byte source.
    pub fn from_shared(source: Arc<dyn ByteSource>) -> Self {
        let name = source.name().to_string();
        Self {
            id: DocumentId::new(),
            source,
            name,
            state: DocumentState::Pending,
            size_bytes: 0,
            size_mb: 0.0,
            page_count: 0,
            metadata: Metadata::default(),
            artifact: None,
            last_message: None,
            last_elapsed: None,
        }
    }

    /// Create a pending document backed by a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    /// Create a pending document backed by in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::new(MemorySource::new(name, data))
    }

    /// Identity assigned at ingestion.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Document name (file name as submitted).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The byte source backing this document.
    pub fn source(&self) -> &dyn ByteSource {
        self.source.as_ref()
    }

    /// Current state.
    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// Byte length recorded by extraction.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Size in megabytes recorded by extraction.
    pub fn size_mb(&self) -> f64 {
        self.size_mb
    }

    /// Page count recorded by extraction.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Extracted metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Whether the source PDF is structurally tagged.
    pub fn is_tagged(&self) -> bool {
        self.metadata.tagged
    }

    /// The artifact linked to this document, if any.
    pub fn artifact(&self) -> Option<&ConvertedArtifact> {
        self.artifact.as_ref()
    }

    /// Message recorded by the last validation, extraction or conversion attempt.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Elapsed time of the last validation, extraction or conversion attempt.
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }

    pub(crate) fn transition(&mut self, next: DocumentState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::InvalidState {
                document: self.name.clone(),
                from: self.state,
                action: action_for(next),
            });
        }
        log::debug!("{}: {} -> {}", self.name, self.state, next);
        if matches!(next, DocumentState::Invalid | DocumentState::ConversionFailed) {
            self.artifact = None;
        }
        self.state = next;
        Ok(())
    }

    /// Copy a complete extraction report onto the document.
    pub(crate) fn apply_report(&mut self, report: &ExtractionReport) {
        self.size_bytes = report.size_bytes;
        self.size_mb = report.size_mb;
        self.page_count = report.page_count;
        self.metadata = report.metadata.clone();
    }

    /// Link a new artifact, replacing any previous one.
    pub(crate) fn link_artifact(&mut self, artifact: ConvertedArtifact) -> Option<ConvertedArtifact> {
        self.artifact.replace(artifact)
    }

    pub(crate) fn record_outcome(&mut self, message: impl Into<String>, elapsed: Duration) {
        self.last_message = Some(message.into());
        self.last_elapsed = Some(elapsed);
    }
}

impl fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDocument")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("state", &self.state)
            .field("page_count", &self.page_count)
            .field("size_bytes", &self.size_bytes)
            .field("metadata", &self.metadata)
            .field("artifact", &self.artifact)
            .finish()
    }
}

fn action_for(next: DocumentState) -> &'static str {
    match next {
        DocumentState::Pending => "reiniciar",
        DocumentState::Valid | DocumentState::Invalid => "validar",
        DocumentState::ConversionFailed | DocumentState::Converted => "convertir",
    }
}
