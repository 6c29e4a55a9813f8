//! Core types for release-grab

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a catalog artist
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ArtistId(pub i64);

impl ArtistId {
    /// Create a new ArtistId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ArtistId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a catalog album
///
/// This is the stable identity the grab orchestrator uses for dedupe: once an
/// album id has been satisfied in a run, later decisions covering it are
/// skipped.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AlbumId(pub i64);

impl AlbumId {
    /// Create a new AlbumId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for AlbumId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AlbumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AlbumId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Transport protocol a release is delivered over
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadProtocol {
    /// NZB delivery via a Usenet download client
    Usenet,
    /// Magnet/torrent delivery via a BitTorrent client
    Torrent,
}

impl std::fmt::Display for DownloadProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadProtocol::Usenet => write!(f, "usenet"),
            DownloadProtocol::Torrent => write!(f, "torrent"),
        }
    }
}

/// How a release entered the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseSource {
    /// Discovered during a periodic feed poll
    Rss,
    /// Pushed by an indexer notification
    Push,
    /// Automated search triggered by the scheduler
    Search,
    /// Search explicitly invoked by a user
    UserInvokedSearch,
    /// Interactive search where the user picks the release manually
    InteractiveSearch,
}

/// One externally-discovered release under consideration for download.
///
/// Immutable once received from the indexer; everything computed during
/// screening lives on [`RemoteAlbum`] instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Indexer-assigned unique identifier for this release
    pub guid: String,
    /// Free-text release title as published
    pub title: String,
    /// Identifier of the indexer that produced this release
    pub indexer_id: i64,
    /// Display name of the indexer
    pub indexer: String,
    /// Transport protocol for delivery
    pub protocol: DownloadProtocol,
    /// When the release was published, if the indexer reported it
    pub publish_date: Option<DateTime<Utc>>,
    /// Payload size in bytes
    pub size: u64,
    /// URL the download client should fetch, if known up front
    pub download_url: Option<String>,
    /// Opaque indexer-specific metadata, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
}

/// Structured metadata extracted from a release's free-text title.
///
/// Produced by the external [`TitleParser`](crate::parser::TitleParser); any
/// field may be missing when the title only partially parsed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParsedAlbumInfo {
    /// Artist name as parsed from the title
    pub artist_name: String,
    /// Album titles as parsed from the title
    pub album_titles: Vec<String>,
    /// Quality descriptor (e.g. "MP3-320", "FLAC"), if recognised
    pub quality: Option<String>,
    /// Release group, if present in the title
    pub release_group: Option<String>,
    /// Whether the title looks like a full-discography release
    pub discography: bool,
}

impl ParsedAlbumInfo {
    /// Whether a usable artist name was extracted
    pub fn has_artist_name(&self) -> bool {
        !self.artist_name.trim().is_empty()
    }
}

/// A catalog artist resolved from parsed release info
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Artist {
    /// Stable catalog identity
    pub id: ArtistId,
    /// Canonical artist name
    pub name: String,
}

/// A catalog album resolved from parsed release info
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Album {
    /// Stable catalog identity used for dedupe
    pub id: AlbumId,
    /// Canonical album title
    pub title: String,
}

/// Search context supplied when decisions are made for a search rather than a
/// feed poll.
///
/// Carries the known target so parsing and matching can retry with hints, and
/// flags distinguishing the three search provenance kinds.
#[derive(Clone, Debug)]
pub struct SearchCriteria {
    /// The artist the search was issued for
    pub artist: Artist,
    /// The albums the search was issued for
    pub albums: Vec<Album>,
    /// True when the user is picking releases manually
    pub interactive: bool,
    /// True when the search was explicitly invoked by a user
    pub user_invoked: bool,
}

impl SearchCriteria {
    /// The provenance tag decisions from this search should carry
    pub fn release_source(&self) -> ReleaseSource {
        if self.interactive {
            ReleaseSource::InteractiveSearch
        } else if self.user_invoked {
            ReleaseSource::UserInvokedSearch
        } else {
            ReleaseSource::Search
        }
    }
}

/// The full in-flight record for one candidate release moving through the
/// pipeline: the original release, everything parsed/matched/computed for it,
/// and its provenance.
///
/// Owned exclusively by the pipeline invocation that created it.
#[derive(Clone, Debug)]
pub struct RemoteAlbum {
    /// The originating candidate release
    pub release: ReleaseInfo,
    /// Structured info parsed from the title, if parsing succeeded
    pub parsed_info: Option<ParsedAlbumInfo>,
    /// Matched catalog artist, if resolution succeeded
    pub artist: Option<Artist>,
    /// Matched catalog albums (possibly empty)
    pub albums: Vec<Album>,
    /// Custom formats matched against this release
    pub custom_formats: Vec<crate::formats::CustomFormat>,
    /// Score computed from the matched custom formats
    pub custom_format_score: i32,
    /// Whether this release is eligible for an automatic grab
    pub download_allowed: bool,
    /// How this release entered the pipeline
    pub source: ReleaseSource,
}

impl RemoteAlbum {
    /// Build a bare record around a release, before any matching has run
    pub fn new(release: ReleaseInfo) -> Self {
        Self {
            release,
            parsed_info: None,
            artist: None,
            albums: Vec::new(),
            custom_formats: Vec::new(),
            custom_format_score: 0,
            download_allowed: false,
            source: ReleaseSource::Rss,
        }
    }

    /// Identities of the matched albums, in match order
    pub fn album_ids(&self) -> Vec<AlbumId> {
        self.albums.iter().map(|a| a.id).collect()
    }
}

/// Event emitted by the grab orchestrator during batch processing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A release was sent to the download client
    ReleaseGrabbed {
        /// Release title
        title: String,
        /// Indexer the release came from
        indexer: String,
    },

    /// A temporarily-rejected release was queued for a later retry pass
    ReleasePended {
        /// Release title
        title: String,
        /// Joined rejection reasons
        reasons: String,
    },

    /// A release ended the batch rejected
    ReleaseRejected {
        /// Release title
        title: String,
        /// Joined rejection reasons
        reasons: String,
    },

    /// A download client became unavailable; remaining releases on this
    /// protocol are skipped for the rest of the batch
    ProtocolUnavailable {
        /// The affected transport protocol
        protocol: DownloadProtocol,
    },
}
