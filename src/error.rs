//! Error types for release-grab
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (parsing, catalog matching, specifications)
//! - A distinguishable fault taxonomy for download client failures
//! - Context information (release title, specification name, etc.)

use thiserror::Error;

/// Result type alias for release-grab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for release-grab
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Title parsing failed in a way that cannot be recovered by hint retry
    #[error("parse error: {0}")]
    Parse(String),

    /// Catalog matcher could not complete a lookup
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A decision specification faulted while evaluating a release
    #[error("specification '{name}' failed: {message}")]
    Specification {
        /// Name of the specification that faulted
        name: String,
        /// Description of the fault
        message: String,
    },

    /// Download client fetch failure
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Pending queue write failed
    #[error("pending queue error: {0}")]
    PendingQueue(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Download client fault taxonomy
///
/// The grab orchestrator pattern-matches on these variants to decide whether a
/// failed fetch trips the per-protocol circuit breaker, rejects the release,
/// or is merely logged. Client implementations must map their wire-level
/// failures onto the right variant.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The download client itself is unreachable or refusing work.
    ///
    /// Structural, not content-specific: subsequent fetches on the same
    /// transport protocol are suppressed for the remainder of the batch.
    #[error("download client unavailable: {0}")]
    ClientUnavailable(String),

    /// The release is permanently unobtainable from its source (e.g. the
    /// indexer returned a 404 for the download URL).
    #[error("release unavailable on indexer: {0}")]
    ReleaseUnavailable(String),

    /// Any other fetch failure
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Whether this fault indicates the client itself is down rather than a
    /// problem with the specific release.
    pub fn is_client_unavailable(&self) -> bool {
        matches!(self, FetchError::ClientUnavailable(_))
    }
}
