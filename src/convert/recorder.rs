//! Persistence hook for document and artifact records.

use crate::model::{ConvertedArtifact, SourceDocument};

/// Receives document state and new artifacts after every operation that
/// changes them.
///
/// Implementations decide how records are stored; the converter only
/// guarantees it calls them once the document is in its final state for
/// the operation.
pub trait StateRecorder: Send + Sync {
    /// Called after validation, extraction or conversion touched `doc`.
    fn record_document(&self, doc: &SourceDocument);

    /// Called once per successful conversion, before `record_document`.
    fn record_artifact(&self, doc: &SourceDocument, artifact: &ConvertedArtifact);
}

/// Recorder that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl StateRecorder for NoopRecorder {
    fn record_document(&self, _doc: &SourceDocument) {}

    fn record_artifact(&self, _doc: &SourceDocument, _artifact: &ConvertedArtifact) {}
}
