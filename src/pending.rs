//! Pending queue seam
//!
//! Temporarily-rejected decisions are parked in a durable pending queue and
//! retried by a later pass outside this crate. The orchestrator batches all
//! insertions from one run into a single write.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::decision::Decision;

/// Why a decision was routed to the pending queue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingReason {
    /// Temporarily rejected; retry once conditions may have changed
    Delay,
}

/// A decision queued for a later retry pass, with the reason it was queued
#[derive(Clone, Debug)]
pub struct PendingItem {
    /// The temporarily-rejected decision
    pub decision: Decision,
    /// Why it was queued
    pub reason: PendingReason,
}

/// Abstraction over the durable pending release store.
#[async_trait]
pub trait PendingQueue: Send + Sync {
    /// Insert a batch of pending items in one write.
    ///
    /// The orchestrator issues at most one call per processed batch, so
    /// implementations can treat each call as a single transaction.
    async fn add_batch(&self, items: Vec<PendingItem>) -> crate::Result<()>;
}
