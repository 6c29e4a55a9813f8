//! Title parsing seam
//!
//! The heuristics that turn a free-text release title into structured
//! metadata live outside this crate. The decision maker only needs the two
//! entry points below: a plain parse, and a hinted parse used when a search
//! context names the artist and albums the title should refer to.

use crate::types::{Album, Artist, ParsedAlbumInfo};

/// Abstraction over release title parsing.
///
/// Implementations are pure string analysis and therefore synchronous. A
/// return of `None` means the title could not be parsed at all; a `Some`
/// with empty fields means it parsed only partially.
pub trait TitleParser: Send + Sync {
    /// Parse a release title into structured album info
    fn parse(&self, title: &str) -> Option<ParsedAlbumInfo>;

    /// Parse a release title using a known target artist and albums as hints.
    ///
    /// Used when a plain parse failed (or misattributed fields) but a search
    /// context knows what the title ought to contain.
    fn parse_with_hints(
        &self,
        title: &str,
        artist: &Artist,
        albums: &[Album],
    ) -> Option<ParsedAlbumInfo>;
}
