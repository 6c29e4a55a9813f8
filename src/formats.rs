//! Custom format scoring seam
//!
//! Custom formats are user-defined release traits (release group, codec
//! flags, and so on) that contribute a score to the final decision. The
//! matching and score tables live outside this crate.

use serde::{Deserialize, Serialize};

use crate::types::RemoteAlbum;

/// A custom format matched against a release
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFormat {
    /// Display name of the format
    pub name: String,
}

/// Abstraction over custom format matching and scoring.
///
/// Both operations are lookups against in-memory user configuration, so the
/// trait is synchronous.
pub trait FormatScorer: Send + Sync {
    /// Determine which custom formats a release matches
    fn formats(&self, remote: &RemoteAlbum, size: u64) -> Vec<CustomFormat>;

    /// Compute the score a set of matched formats earns for a release.
    ///
    /// The score depends on the matched artist's quality profile, so the
    /// whole remote record is passed alongside the formats.
    fn score(&self, remote: &RemoteAlbum, formats: &[CustomFormat]) -> i32;
}
