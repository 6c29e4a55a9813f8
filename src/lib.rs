//! # release-grab
//!
//! Release screening and grab orchestration core for media automation
//! backends.
//!
//! ## Design Philosophy
//!
//! release-grab is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Pluggable** - Parsing, catalog matching, scoring, download clients and
//!   the pending store are all trait seams supplied by the embedder
//! - **Fault-isolating** - One bad release, rule or client never aborts a
//!   batch; faults become rejections or tripped breakers
//! - **Deterministic** - Batches are scanned left to right; dedupe and
//!   circuit-breaker outcomes are part of the observable contract
//!
//! ## Pipeline
//!
//! Raw candidate releases flow through the [`DecisionMaker`], which parses
//! and matches each one against the catalog and evaluates it with the
//! [`SpecificationEngine`]. The resulting decisions are handed to the
//! [`GrabOrchestrator`], which grabs approved releases through the download
//! client, queues temporarily-rejected ones for a later retry pass, and
//! reports everything else as rejected.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use release_grab::{Config, DecisionMaker, GrabOrchestrator, SpecificationEngine};
//! # use release_grab::{
//! #     Album, Artist, CatalogMatcher, CustomFormat, DownloadClient, FetchError, FormatScorer,
//! #     ParsedAlbumInfo, PendingItem, PendingQueue, RemoteAlbum, ResolvedMatch, SearchCriteria,
//! #     TitleParser,
//! # };
//! # struct MyParser;
//! # impl TitleParser for MyParser {
//! #     fn parse(&self, _t: &str) -> Option<ParsedAlbumInfo> { None }
//! #     fn parse_with_hints(&self, _t: &str, _a: &Artist, _al: &[Album]) -> Option<ParsedAlbumInfo> { None }
//! # }
//! # struct MyMatcher;
//! # #[async_trait::async_trait]
//! # impl CatalogMatcher for MyMatcher {
//! #     async fn resolve(&self, _p: &ParsedAlbumInfo, _c: Option<&SearchCriteria>) -> release_grab::Result<ResolvedMatch> {
//! #         Ok(ResolvedMatch::default())
//! #     }
//! # }
//! # struct MyScorer;
//! # impl FormatScorer for MyScorer {
//! #     fn formats(&self, _r: &RemoteAlbum, _s: u64) -> Vec<CustomFormat> { vec![] }
//! #     fn score(&self, _r: &RemoteAlbum, _f: &[CustomFormat]) -> i32 { 0 }
//! # }
//! # struct MyClient;
//! # #[async_trait::async_trait]
//! # impl DownloadClient for MyClient {
//! #     async fn fetch(&self, _r: &RemoteAlbum) -> Result<(), FetchError> { Ok(()) }
//! # }
//! # struct MyPendingQueue;
//! # #[async_trait::async_trait]
//! # impl PendingQueue for MyPendingQueue {
//! #     async fn add_batch(&self, _i: Vec<PendingItem>) -> release_grab::Result<()> { Ok(()) }
//! # }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = Config::default();
//!
//! let maker = DecisionMaker::new(
//!     Arc::new(MyParser),
//!     Arc::new(MyMatcher),
//!     Arc::new(MyScorer),
//!     Arc::new(SpecificationEngine::new(vec![])),
//!     config.clone(),
//! );
//! let orchestrator = GrabOrchestrator::new(
//!     Arc::new(MyClient),
//!     Arc::new(MyPendingQueue),
//!     &config,
//! );
//!
//! let reports = vec![/* releases from your indexers */];
//! let decisions = maker.rss_decisions(reports, false).await;
//! let result = orchestrator.process(decisions).await;
//!
//! println!(
//!     "grabbed {} pending {} rejected {}",
//!     result.grabbed.len(),
//!     result.pending.len(),
//!     result.rejected.len()
//! );
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Download client seam
pub mod backend;
/// Catalog matching seam
pub mod catalog;
/// Configuration types
pub mod config;
/// Decision engine (specifications, evaluation, decision maker)
pub mod decision;
/// Error types
pub mod error;
/// Custom format scoring seam
pub mod formats;
/// Grab orchestration
pub mod grab;
/// Title parsing seam
pub mod parser;
/// Pending queue seam
pub mod pending;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use backend::DownloadClient;
pub use catalog::{CatalogMatcher, ResolvedMatch};
pub use config::Config;
pub use decision::{
    Decision, DecisionMaker, DecisionSpecification, Rejection, RejectionKind, SpecVerdict,
    SpecificationEngine,
};
pub use error::{Error, FetchError, Result};
pub use formats::{CustomFormat, FormatScorer};
pub use grab::{GrabOrchestrator, ProcessResult};
pub use parser::TitleParser;
pub use pending::{PendingItem, PendingQueue, PendingReason};
pub use types::{
    Album, AlbumId, Artist, ArtistId, DownloadProtocol, Event, ParsedAlbumInfo, ReleaseInfo,
    ReleaseSource, RemoteAlbum, SearchCriteria,
};
