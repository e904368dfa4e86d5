//! Error types for accesspdf.
//!
//! Display strings are user-facing: each one says what failed and why.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::DocumentState;

/// Result type alias for accesspdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while validating, extracting or converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the source or writing the artifact.
    #[error("Error de entrada/salida: {0}")]
    Io(#[from] io::Error),

    /// The document name does not carry a `.pdf` extension.
    #[error("Solo se permiten archivos PDF.")]
    InvalidExtension,

    /// The byte stream could not be parsed as a PDF.
    #[error("Archivo dañado o ilegible: {0}")]
    CorruptDocument(String),

    /// The PDF parsed but has no pages.
    #[error("El documento PDF no contiene páginas.")]
    EmptyDocument,

    /// Reading page text or metadata failed after validation.
    #[error("Error analizando contenido: {0}")]
    Extraction(String),

    /// Producing or storing the HTML artifact failed.
    #[error("Error generando el documento HTML: {0}")]
    Synthesis(String),

    /// A download was requested for a document that has no artifact.
    #[error("No existe un documento HTML generado para {0}")]
    ArtifactNotFound(String),

    /// The document claims an artifact but its bytes are gone.
    #[error("El documento HTML registrado no se encuentra en disco: {}", .0.display())]
    ArtifactMissingOnDisk(PathBuf),

    /// The requested action is not allowed from the document's current state.
    #[error("No se puede {action} el documento {document} en estado {from}")]
    InvalidState {
        /// Document name.
        document: String,
        /// State the document was in.
        from: DocumentState,
        /// Action that was refused.
        action: &'static str,
    },
}

impl Error {
    /// Whether this error comes from format validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidExtension | Error::CorruptDocument(_) | Error::EmptyDocument
        )
    }

    /// Whether this error comes from the download path.
    ///
    /// `ArtifactNotFound` means "convert first"; `ArtifactMissingOnDisk`
    /// means the recorded state and storage disagree.
    pub fn is_download(&self) -> bool {
        matches!(
            self,
            Error::ArtifactNotFound(_) | Error::ArtifactMissingOnDisk(_)
        )
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::CorruptDocument(err.to_string()),
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Synthesis(err.to_string())
    }
}

/// Run a parser call, turning a panic inside it into an error.
///
/// `wrap` builds the error from the panic message, which is also logged at
/// warn level. The process panic hook still runs before the unwind is
/// caught; applications that must keep stderr clean install their own hook
/// (the `accesspdf` binary routes it through `log`).
pub(crate) fn catch_fault<T>(
    call: impl FnOnce() -> Result<T>,
    wrap: impl FnOnce(String) -> Error,
) -> Result<T> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(call)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::warn!("contained internal fault: {}", message);
            Err(wrap(message))
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "fallo interno del analizador".to_string())
}
