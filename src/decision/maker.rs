//! The per-candidate parse/match/score/evaluate pipeline.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, error, info};

use super::engine::SpecificationEngine;
use super::{Decision, Rejection};
use crate::catalog::CatalogMatcher;
use crate::config::Config;
use crate::formats::FormatScorer;
use crate::parser::TitleParser;
use crate::types::{ReleaseInfo, ReleaseSource, RemoteAlbum, SearchCriteria};

/// Drives one decision per candidate release through parsing, catalog
/// matching, format scoring and specification evaluation.
///
/// Candidates are processed independently: a fault while handling one release
/// is converted into a rejected decision for that release and never aborts
/// the batch. Output order always matches input order, even when candidates
/// are evaluated concurrently.
pub struct DecisionMaker {
    parser: Arc<dyn TitleParser>,
    matcher: Arc<dyn CatalogMatcher>,
    scorer: Arc<dyn FormatScorer>,
    engine: Arc<SpecificationEngine>,
    config: Config,
}

impl DecisionMaker {
    /// Create a decision maker over the given collaborators.
    pub fn new(
        parser: Arc<dyn TitleParser>,
        matcher: Arc<dyn CatalogMatcher>,
        scorer: Arc<dyn FormatScorer>,
        engine: Arc<SpecificationEngine>,
        config: Config,
    ) -> Self {
        Self {
            parser,
            matcher,
            scorer,
            engine,
            config,
        }
    }

    /// Build decisions for releases discovered by a feed poll (or pushed by
    /// an indexer when `pushed` is set).
    ///
    /// Un-parseable titles are dropped without a decision: feed processing is
    /// tolerant of noise.
    pub async fn rss_decisions(&self, reports: Vec<ReleaseInfo>, pushed: bool) -> Vec<Decision> {
        self.decide_all(reports, pushed, None).await
    }

    /// Build decisions for releases returned by a search.
    ///
    /// Every report yields a decision; un-parseable titles are rejected with
    /// "Unable to parse release" so search results are never silently
    /// dropped.
    pub async fn search_decisions(
        &self,
        reports: Vec<ReleaseInfo>,
        criteria: &SearchCriteria,
    ) -> Vec<Decision> {
        self.decide_all(reports, false, Some(criteria)).await
    }

    async fn decide_all(
        &self,
        reports: Vec<ReleaseInfo>,
        pushed: bool,
        criteria: Option<&SearchCriteria>,
    ) -> Vec<Decision> {
        if reports.is_empty() {
            info!("No results found");
            return Vec::new();
        }

        info!(count = reports.len(), "Processing releases");

        let concurrency = self.config.max_concurrent_evaluations.max(1);
        let decisions: Vec<Option<Decision>> = futures::stream::iter(reports)
            .map(|report| self.decide(report, pushed, criteria))
            .buffered(concurrency)
            .collect()
            .await;

        decisions.into_iter().flatten().collect()
    }

    /// Process one candidate end to end. `None` means the candidate was
    /// un-parseable feed noise and no decision is emitted for it.
    async fn decide(
        &self,
        report: ReleaseInfo,
        pushed: bool,
        criteria: Option<&SearchCriteria>,
    ) -> Option<Decision> {
        debug!(title = %report.title, indexer = %report.indexer, "Processing release");

        let mut decision = match self.decide_inner(&report, criteria).await {
            Ok(decision) => decision,
            Err(e) => {
                error!(title = %report.title, error = %e, "Couldn't process release");
                Some(Decision::rejected(
                    RemoteAlbum::new(report),
                    Rejection::permanent("Unexpected error processing release"),
                ))
            }
        };

        if let Some(decision) = decision.as_mut() {
            decision.remote_album.source = match criteria {
                Some(c) => c.release_source(),
                None if pushed => ReleaseSource::Push,
                None => ReleaseSource::Rss,
            };

            if decision.is_approved() {
                debug!(title = %decision.remote_album.release.title, "Release accepted");
            } else {
                debug!(
                    title = %decision.remote_album.release.title,
                    reasons = %decision.joined_reasons(),
                    "Release rejected"
                );
            }
        }

        decision
    }

    async fn decide_inner(
        &self,
        report: &ReleaseInfo,
        criteria: Option<&SearchCriteria>,
    ) -> crate::Result<Option<Decision>> {
        let mut parsed = self.parser.parse(&report.title);

        if parsed.is_none()
            && let Some(c) = criteria
        {
            parsed = self
                .parser
                .parse_with_hints(&report.title, &c.artist, &c.albums);
        }

        let mut decision = None;

        if let Some(parsed_info) = parsed.clone().filter(|p| p.has_artist_name()) {
            let mut resolved = self.matcher.resolve(&parsed_info, criteria).await?;
            let mut parsed_used = parsed_info;

            // The title may have parsed but misattributed fields; retry with
            // the search target as hints before concluding nothing matched.
            if (resolved.artist.is_none() || resolved.albums.is_empty())
                && let Some(c) = criteria
            {
                debug!(
                    title = %report.title,
                    "Artist/albums unresolved, reparsing with search criteria"
                );
                if let Some(hinted) =
                    self.parser
                        .parse_with_hints(&report.title, &c.artist, &c.albums)
                    && hinted.has_artist_name()
                {
                    resolved = self.matcher.resolve(&hinted, criteria).await?;
                    parsed_used = hinted;
                }
            }

            let mut remote = RemoteAlbum::new(report.clone());
            remote.parsed_info = Some(parsed_used);
            remote.artist = resolved.artist;
            remote.albums = resolved.albums;

            if remote.artist.is_none() {
                // Populate the searched artist so a forced grab from an
                // interactive search can still proceed downstream.
                if let Some(c) = criteria {
                    remote.artist = Some(c.artist.clone());
                    remote.albums = c.albums.clone();
                }

                decision = Some(Decision::rejected(
                    remote,
                    Rejection::permanent("Unknown Artist"),
                ));
            } else if remote.albums.is_empty() {
                if let Some(c) = criteria {
                    remote.albums = c.albums.clone();
                }

                decision = Some(Decision::rejected(
                    remote,
                    Rejection::permanent("Unable to parse albums from release name"),
                ));
            } else {
                let formats = self.scorer.formats(&remote, report.size);
                let score = self.scorer.score(&remote, &formats);
                remote.custom_formats = formats;
                remote.custom_format_score = score;
                remote.download_allowed = true;

                let rejections = self.engine.evaluate(&remote, criteria).await;
                decision = Some(Decision::with_rejections(remote, rejections));
            }
        }

        // Search results are never silently dropped; feed noise is.
        if decision.is_none() && criteria.is_some() {
            let mut remote = RemoteAlbum::new(report.clone());
            remote.parsed_info = parsed;
            decision = Some(Decision::rejected(
                remote,
                Rejection::permanent("Unable to parse release"),
            ));
        }

        Ok(decision)
    }
}
