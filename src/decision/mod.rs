//! Decision engine — screens candidate releases against pluggable rules.
//!
//! The engine is organized into focused submodules:
//! - [`specification`] - The rule contract every specification implements
//! - [`engine`] - Priority-tiered evaluation over a specification set
//! - [`maker`] - The per-candidate parse/match/score/evaluate pipeline
//!
//! This module holds the shared verdict vocabulary: [`Rejection`],
//! [`RejectionKind`] and [`Decision`].

pub mod engine;
pub mod maker;
pub mod specification;

pub use engine::SpecificationEngine;
pub use maker::DecisionMaker;
pub use specification::{DecisionSpecification, SpecVerdict};

use serde::{Deserialize, Serialize};

use crate::types::{AlbumId, RemoteAlbum};

/// Severity class of a rejection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionKind {
    /// Final for this run and later runs; never retried without new input
    Permanent,
    /// Conditions may change; eligible for a delayed retry
    Temporary,
}

/// One reason a release was rejected
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rejection {
    /// Human-readable reason, carried verbatim to the UI and logs
    pub reason: String,
    /// Whether the rejection is final or retry-eligible
    pub kind: RejectionKind,
    /// Name of the specification that produced this rejection, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Rejection {
    /// Create a permanent rejection
    pub fn permanent(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            kind: RejectionKind::Permanent,
            origin: None,
        }
    }

    /// Create a temporary rejection
    pub fn temporary(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            kind: RejectionKind::Temporary,
            origin: None,
        }
    }

    /// Create a rejection of the given kind
    pub fn new(reason: impl Into<String>, kind: RejectionKind) -> Self {
        Self {
            reason: reason.into(),
            kind,
            origin: None,
        }
    }

    /// Attach the name of the specification that produced this rejection
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

/// The verdict for one remote album: approved when the rejection list is
/// empty, rejected with reasons otherwise.
#[derive(Clone, Debug)]
pub struct Decision {
    /// The evaluated pipeline record
    pub remote_album: RemoteAlbum,
    /// Rejections collected during evaluation, in evaluation order
    pub rejections: Vec<Rejection>,
}

impl Decision {
    /// Build an approved decision
    pub fn approved(remote_album: RemoteAlbum) -> Self {
        Self {
            remote_album,
            rejections: Vec::new(),
        }
    }

    /// Build a rejected decision with a single rejection
    pub fn rejected(remote_album: RemoteAlbum, rejection: Rejection) -> Self {
        Self {
            remote_album,
            rejections: vec![rejection],
        }
    }

    /// Build a decision from a list of rejections (approved when empty)
    pub fn with_rejections(remote_album: RemoteAlbum, rejections: Vec<Rejection>) -> Self {
        Self {
            remote_album,
            rejections,
        }
    }

    /// Whether the release was accepted
    pub fn is_approved(&self) -> bool {
        self.rejections.is_empty()
    }

    /// Whether at least one rejection is retry-eligible
    pub fn is_temporarily_rejected(&self) -> bool {
        self.rejections
            .iter()
            .any(|r| r.kind == RejectionKind::Temporary)
    }

    /// Identities of the matched albums this decision covers
    pub fn album_ids(&self) -> Vec<AlbumId> {
        self.remote_album.album_ids()
    }

    /// Rejection reasons joined for log display
    pub fn joined_reasons(&self) -> String {
        self.rejections
            .iter()
            .map(|r| r.reason.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DownloadProtocol, ReleaseInfo};

    fn release() -> ReleaseInfo {
        ReleaseInfo {
            guid: "guid-1".into(),
            title: "Artist - Album [MP3 320]".into(),
            indexer_id: 1,
            indexer: "test-indexer".into(),
            protocol: DownloadProtocol::Usenet,
            publish_date: None,
            size: 1024,
            download_url: None,
            info: None,
        }
    }

    #[test]
    fn test_approved_iff_no_rejections() {
        let decision = Decision::approved(RemoteAlbum::new(release()));
        assert!(decision.is_approved());
        assert!(!decision.is_temporarily_rejected());

        let decision = Decision::rejected(
            RemoteAlbum::new(release()),
            Rejection::permanent("Unknown Artist"),
        );
        assert!(!decision.is_approved());
        assert!(!decision.is_temporarily_rejected());
    }

    #[test]
    fn test_temporary_detection_with_mixed_rejections() {
        let decision = Decision::with_rejections(
            RemoteAlbum::new(release()),
            vec![
                Rejection::permanent("wrong quality"),
                Rejection::temporary("delay not elapsed"),
            ],
        );
        assert!(decision.is_temporarily_rejected());
    }

    #[test]
    fn test_joined_reasons_preserves_order() {
        let decision = Decision::with_rejections(
            RemoteAlbum::new(release()),
            vec![Rejection::permanent("first"), Rejection::permanent("second")],
        );
        assert_eq!(decision.joined_reasons(), "first, second");
    }
}
