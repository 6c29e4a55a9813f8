//! Download client seam
//!
//! The wire protocols for actual download clients (SABnzbd, qBittorrent and
//! friends) live outside this crate. The orchestrator only needs a single
//! fetch entry point with a distinguishable fault taxonomy; see
//! [`FetchError`] for how failures are classified.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::RemoteAlbum;

/// Abstraction over sending a release to a download client.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Send a release to the download client appropriate for its protocol.
    ///
    /// Implementations are expected to apply their own timeout policy; this
    /// crate never wraps the call in one.
    ///
    /// # Errors
    ///
    /// - [`FetchError::ClientUnavailable`] when the client itself is down —
    ///   trips the per-protocol circuit breaker for the rest of the batch.
    /// - [`FetchError::ReleaseUnavailable`] when the release is permanently
    ///   gone from its source — the decision is rejected.
    /// - [`FetchError::Other`] for anything else — logged and rejected.
    async fn fetch(&self, remote: &RemoteAlbum) -> Result<(), FetchError>;
}
