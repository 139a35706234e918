//! Errors that stop the audit of a file, or of the whole run.

use std::path::PathBuf;

use thiserror::Error;

/// An error outside of font decoding.
///
/// Malformed font data is never an error at this level: it is reported as a
/// [`Diagnostic::DecodeFailure`](crate::Diagnostic::DecodeFailure).
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
