//! Error types for DocuStore.
//!
//! One unified error type for the whole crate, following the error taxonomy
//! of the design: input validation, storage, artifact (de)serialization,
//! recovery, scraping, and cancellation each get their own variant so
//! callers can match on kind rather than parse strings.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for DocuStore operations.
pub type Result<T> = std::result::Result<T, DocuError>;

/// Unified error type for DocuStore.
#[derive(Debug, Error)]
pub enum DocuError {
    /// Caller-supplied input failed validation (empty title/content, bad URL).
    #[error("invalid input: {0}")]
    InputError(String),

    /// The authoritative document store failed (open, transaction, query).
    #[error("storage error: {0}")]
    StorageError(#[from] rusqlite::Error),

    /// A derived artifact (index or counter) failed to encode or decode.
    ///
    /// Recoverable on startup: the engine falls back to rebuilding the
    /// artifact from the document store. Surfaces unchanged on ingest,
    /// where the document row is already durable.
    #[error("artifact error for {path}: {source}")]
    ArtifactError {
        /// Path of the artifact that failed to (de)serialize.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: ArtifactCause,
    },

    /// Recovery itself failed; fatal for the current startup.
    #[error("recovery failed: {0}")]
    RecoveryError(String),

    /// The external scraper collaborator failed.
    #[error("scrape failed for {url}: {reason}")]
    ScrapeError {
        /// URL that failed to scrape.
        url: String,
        /// Human-readable reason.
        reason: String,
    },

    /// An operation was aborted by an upstream cancellation signal.
    #[error("operation cancelled")]
    CancelledError,

    /// Plain I/O error (artifact files, data directory creation).
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Underlying causes of an [`DocuError::ArtifactError`].
#[derive(Debug, Error)]
pub enum ArtifactCause {
    /// File could not be read or written.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Header was missing, had the wrong magic, or an unsupported version.
    #[error("{0}")]
    BadHeader(String),

    /// MessagePack payload failed to decode.
    #[error(transparent)]
    Decode(#[from] rmp_serde::decode::Error),

    /// MessagePack payload failed to encode.
    #[error(transparent)]
    Encode(#[from] rmp_serde::encode::Error),
}

impl DocuError {
    /// True for errors a caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DocuError::CancelledError | DocuError::StorageError(_))
    }
}
