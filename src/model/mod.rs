//! Document model types.
//!
//! These types carry a document from ingestion through validation,
//! extraction and classification to the converted artifact.

mod artifact;
mod block;
mod document;

pub use artifact::{ConversionResult, ConvertedArtifact, Outcome};
pub use block::{BlockKind, ClassifiedPage, ContentBlock, PageContent};
pub use document::{DocumentId, DocumentState, Metadata, SourceDocument, UNKNOWN_AUTHOR, UNTITLED};
