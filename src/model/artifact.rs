//! Conversion outputs.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DocumentId;

/// The HTML document produced by a successful conversion.
///
/// Immutable once created. A later conversion of the same source produces a
/// new artifact that replaces this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedArtifact {
    /// Identity of the source document
    pub document_id: DocumentId,

    /// Name of the source document
    pub source_name: String,

    /// Where the sink stored the bytes
    pub location: PathBuf,

    /// Artifact size in bytes
    pub size_bytes: u64,

    /// Number of structural tags emitted
    pub tag_count: usize,

    /// Distinct structural tag names, in first-use order
    pub tags_used: Vec<String>,

    /// Declared document language (e.g., "es")
    pub language: String,

    /// Accessibility level label (e.g., "AA")
    pub accessibility_level: String,

    /// When the artifact was generated
    pub generated_at: DateTime<Utc>,

    /// Time the conversion took
    pub elapsed: Duration,
}

impl ConvertedArtifact {
    /// Artifact size in kilobytes.
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

/// Outcome of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}

/// What a conversion reports back to its caller.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    /// Success or failure
    pub outcome: Outcome,

    /// Human-readable message
    pub message: String,

    /// Wall-clock time spent
    pub elapsed: Duration,

    /// The produced artifact, on success
    pub artifact: Option<ConvertedArtifact>,
}

impl ConversionResult {
    /// A successful conversion.
    pub fn success(message: impl Into<String>, elapsed: Duration, artifact: ConvertedArtifact) -> Self {
        Self {
            outcome: Outcome::Success,
            message: message.into(),
            elapsed,
            artifact: Some(artifact),
        }
    }

    /// A failed conversion.
    pub fn failure(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            outcome: Outcome::Failure,
            message: message.into(),
            elapsed,
            artifact: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}
