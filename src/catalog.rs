//! Catalog matching seam
//!
//! Maps parsed release info onto known library entries. The catalog service
//! itself (lookup tables, fuzzy matching, persistence) is external; the
//! decision maker only consumes the resolution result.

use async_trait::async_trait;

use crate::types::{Album, Artist, ParsedAlbumInfo, SearchCriteria};

/// Outcome of resolving parsed info against the catalog
#[derive(Clone, Debug, Default)]
pub struct ResolvedMatch {
    /// The matched artist, if one was found
    pub artist: Option<Artist>,
    /// The matched albums (possibly empty even when the artist matched)
    pub albums: Vec<Album>,
}

impl ResolvedMatch {
    /// Whether neither an artist nor any album was resolved
    pub fn is_empty(&self) -> bool {
        self.artist.is_none() && self.albums.is_empty()
    }
}

/// Abstraction over catalog resolution.
///
/// A failed lookup (no match) is a normal `Ok` result with an empty
/// [`ResolvedMatch`]; `Err` is reserved for infrastructure faults, which the
/// decision maker converts into a generic rejection at the per-candidate
/// boundary.
#[async_trait]
pub trait CatalogMatcher: Send + Sync {
    /// Resolve parsed album info to catalog entries.
    ///
    /// When `criteria` is supplied the matcher may bias resolution towards
    /// the searched artist and albums.
    async fn resolve(
        &self,
        parsed: &ParsedAlbumInfo,
        criteria: Option<&SearchCriteria>,
    ) -> crate::Result<ResolvedMatch>;
}
