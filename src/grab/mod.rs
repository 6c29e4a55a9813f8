//! Grab orchestration — routes decisions to the download client, the pending
//! queue, or the rejected pile.
//!
//! One [`GrabOrchestrator::process`] call handles one batch (one poll cycle
//! or one search) with a deterministic left-to-right scan. Batch-local state
//! (satisfied albums, tripped protocols, the pending accumulator) lives on
//! the stack of that call, so independent batches can run concurrently
//! against the same orchestrator.

use std::collections::HashSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::DownloadClient;
use crate::decision::{Decision, Rejection};
use crate::error::FetchError;
use crate::pending::{PendingItem, PendingQueue, PendingReason};
use crate::types::{AlbumId, DownloadProtocol, Event};

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

/// Outcome of processing one decision batch.
///
/// Every input decision lands in exactly one bucket or is silently skipped
/// (duplicate of an already-satisfied album set, or suppressed by the
/// protocol breaker).
#[derive(Debug, Default)]
pub struct ProcessResult {
    /// Decisions successfully sent to the download client
    pub grabbed: Vec<Decision>,
    /// Temporarily-rejected decisions queued for a later retry pass
    pub pending: Vec<Decision>,
    /// Permanently-rejected decisions, plus approved decisions whose grab
    /// attempt failed
    pub rejected: Vec<Decision>,
    /// Album identities satisfied during this run
    pub satisfied: HashSet<AlbumId>,
}

/// Consumes decision batches: dedupes against already-satisfied albums,
/// attempts grabs through the download client, trips a per-protocol breaker
/// on structural client failures, and batches pending-queue insertions into
/// a single write.
pub struct GrabOrchestrator {
    client: Arc<dyn DownloadClient>,
    pending_queue: Arc<dyn PendingQueue>,
    event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl GrabOrchestrator {
    /// Create an orchestrator over the given download client and pending
    /// queue.
    pub fn new(
        client: Arc<dyn DownloadClient>,
        pending_queue: Arc<dyn PendingQueue>,
        config: &crate::config::Config,
    ) -> Self {
        let (event_tx, _rx) = tokio::sync::broadcast::channel(config.event_channel_capacity);
        Self {
            client,
            pending_queue,
            event_tx,
        }
    }

    /// Subscribe to events emitted while batches are processed.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Process a batch of decisions in input order.
    pub async fn process(&self, decisions: Vec<Decision>) -> ProcessResult {
        self.process_cancellable(decisions, &CancellationToken::new())
            .await
    }

    /// Process a batch of decisions, stopping early when `cancel` fires.
    ///
    /// On cancellation the partial result assembled so far is returned —
    /// completed grabs are never lost — and any accumulated pending items
    /// are still flushed in one write.
    pub async fn process_cancellable(
        &self,
        decisions: Vec<Decision>,
        cancel: &CancellationToken,
    ) -> ProcessResult {
        let mut result = ProcessResult::default();
        let mut unavailable_protocols: HashSet<DownloadProtocol> = HashSet::new();
        let mut pending_items: Vec<PendingItem> = Vec::new();

        for mut decision in decisions {
            if cancel.is_cancelled() {
                info!("Batch processing cancelled, returning partial result");
                break;
            }

            let album_ids = decision.album_ids();
            let already_satisfied = !album_ids.is_empty()
                && album_ids.iter().any(|id| result.satisfied.contains(id));

            if decision.is_approved() {
                if already_satisfied {
                    debug!(
                        title = %decision.remote_album.release.title,
                        "Album already grabbed this run, skipping duplicate"
                    );
                    continue;
                }

                let protocol = decision.remote_album.release.protocol;
                if unavailable_protocols.contains(&protocol) {
                    // Not a rejection: nothing was tried, so there is
                    // nothing user-actionable to report.
                    debug!(
                        title = %decision.remote_album.release.title,
                        %protocol,
                        "Download client unavailable, skipping grab attempt"
                    );
                    continue;
                }

                match self.client.fetch(&decision.remote_album).await {
                    Ok(()) => {
                        result.satisfied.extend(album_ids);
                        let _ = self.event_tx.send(Event::ReleaseGrabbed {
                            title: decision.remote_album.release.title.clone(),
                            indexer: decision.remote_album.release.indexer.clone(),
                        });
                        result.grabbed.push(decision);
                    }
                    Err(e) if e.is_client_unavailable() => {
                        warn!(
                            title = %decision.remote_album.release.title,
                            %protocol,
                            error = %e,
                            "Download client unavailable, suppressing further grabs on this protocol"
                        );
                        unavailable_protocols.insert(protocol);
                        let _ = self
                            .event_tx
                            .send(Event::ProtocolUnavailable { protocol });
                    }
                    Err(e @ FetchError::ReleaseUnavailable(_)) => {
                        warn!(
                            title = %decision.remote_album.release.title,
                            error = %e,
                            "Release unavailable on indexer"
                        );
                        decision.rejections.push(Rejection::permanent(e.to_string()));
                        self.reject(&mut result, decision);
                    }
                    Err(e) => {
                        warn!(
                            title = %decision.remote_album.release.title,
                            error = %e,
                            "Couldn't add release to download client"
                        );
                        decision.rejections.push(Rejection::permanent(e.to_string()));
                        self.reject(&mut result, decision);
                    }
                }
            } else if decision.is_temporarily_rejected() {
                if already_satisfied {
                    debug!(
                        title = %decision.remote_album.release.title,
                        "Album already grabbed this run, not queueing retry"
                    );
                    continue;
                }

                let _ = self.event_tx.send(Event::ReleasePended {
                    title: decision.remote_album.release.title.clone(),
                    reasons: decision.joined_reasons(),
                });
                pending_items.push(PendingItem {
                    decision: decision.clone(),
                    reason: PendingReason::Delay,
                });
                result.pending.push(decision);
            } else {
                self.reject(&mut result, decision);
            }
        }

        if !pending_items.is_empty() {
            let count = pending_items.len();
            if let Err(e) = self.pending_queue.add_batch(pending_items).await {
                warn!(count, error = %e, "Couldn't write pending releases");
            }
        }

        result
    }

    fn reject(&self, result: &mut ProcessResult, decision: Decision) {
        let _ = self.event_tx.send(Event::ReleaseRejected {
            title: decision.remote_album.release.title.clone(),
            reasons: decision.joined_reasons(),
        });
        result.rejected.push(decision);
    }
}
