//! Priority-tiered evaluation over a specification set.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, trace};

use super::specification::{DecisionSpecification, SpecVerdict};
use super::{Rejection, RejectionKind};
use crate::types::{RemoteAlbum, SearchCriteria};

/// Evaluates a release against every registered specification, tier by tier.
///
/// Specifications are grouped by ascending priority. Every specification in a
/// tier runs; the first tier that yields at least one rejection terminates
/// evaluation and its rejections become the decision's rejections. A release
/// that passes every tier is approved (empty rejection list).
pub struct SpecificationEngine {
    specifications: Vec<Arc<dyn DecisionSpecification>>,
}

impl SpecificationEngine {
    /// Create an engine over the given specification set.
    ///
    /// Registration order is irrelevant; only each specification's priority
    /// determines when it runs.
    pub fn new(specifications: Vec<Arc<dyn DecisionSpecification>>) -> Self {
        Self { specifications }
    }

    /// Number of registered specifications
    pub fn len(&self) -> usize {
        self.specifications.len()
    }

    /// Whether the engine has no specifications (every release is approved)
    pub fn is_empty(&self) -> bool {
        self.specifications.is_empty()
    }

    /// Evaluate one release and return the rejections that apply to it.
    ///
    /// An empty result means the release is approved. Evaluation is
    /// deterministic for a fixed specification set and input.
    pub async fn evaluate(
        &self,
        remote: &RemoteAlbum,
        criteria: Option<&SearchCriteria>,
    ) -> Vec<Rejection> {
        let mut tiers: BTreeMap<i32, Vec<&Arc<dyn DecisionSpecification>>> = BTreeMap::new();
        for spec in &self.specifications {
            tiers.entry(spec.priority()).or_default().push(spec);
        }

        for (priority, tier) in tiers {
            let mut rejections = Vec::new();

            for spec in tier {
                match spec.evaluate(remote, criteria).await {
                    Ok(SpecVerdict::Accepted) => {}
                    Ok(SpecVerdict::NotApplicable) => {
                        trace!(
                            specification = spec.name(),
                            title = %remote.release.title,
                            "Specification not applicable, skipping"
                        );
                    }
                    Ok(SpecVerdict::Rejected(reason)) => {
                        rejections.push(Rejection::new(reason, spec.kind()).with_origin(spec.name()));
                    }
                    Err(e) => {
                        // A faulting rule must not abort evaluation of the
                        // rest of the tier.
                        error!(
                            specification = spec.name(),
                            title = %remote.release.title,
                            error = %e,
                            "Couldn't evaluate specification"
                        );
                        rejections.push(
                            Rejection::new(
                                format!("{}: {}", spec.name(), e),
                                RejectionKind::Permanent,
                            )
                            .with_origin(spec.name()),
                        );
                    }
                }
            }

            if !rejections.is_empty() {
                trace!(
                    priority,
                    count = rejections.len(),
                    title = %remote.release.title,
                    "Tier produced rejections, stopping evaluation"
                );
                return rejections;
            }
        }

        Vec::new()
    }
}
