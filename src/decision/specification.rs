//! The rule contract every decision specification implements.
//!
//! Concrete rule business logic (quality cutoffs, size windows, delay
//! profiles) lives with the embedding application; this crate only defines
//! the evaluation protocol. Specifications are heterogeneous objects behind
//! one capability contract: a priority, a severity class, and an evaluation
//! function.

use async_trait::async_trait;

use super::RejectionKind;
use crate::types::{RemoteAlbum, SearchCriteria};

/// Outcome of evaluating one specification against one release
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecVerdict {
    /// The release satisfies this specification
    Accepted,
    /// The specification does not apply to this input shape; treated as
    /// accepted and logged at trace
    NotApplicable,
    /// The release fails this specification for the given reason
    Rejected(String),
}

/// A single screening rule.
///
/// Specifications are grouped by [`priority`](DecisionSpecification::priority)
/// and evaluated tier by tier: cheap structural checks should claim low
/// priorities so expensive rules never run against releases that were already
/// rejected.
#[async_trait]
pub trait DecisionSpecification: Send + Sync {
    /// Stable name used in logs and as the rejection origin
    fn name(&self) -> &'static str;

    /// Evaluation tier; lower runs earlier. Order within a tier is
    /// irrelevant — every specification in a tier runs.
    fn priority(&self) -> i32 {
        0
    }

    /// Severity class of rejections this specification produces
    fn kind(&self) -> RejectionKind;

    /// Evaluate a release, optionally in the context of a search.
    ///
    /// # Errors
    ///
    /// An `Err` is treated as an isolated rule fault: the engine logs it,
    /// synthesizes a rejection carrying the fault message, and keeps
    /// evaluating the remaining specifications in the tier.
    async fn evaluate(
        &self,
        remote: &RemoteAlbum,
        criteria: Option<&SearchCriteria>,
    ) -> crate::Result<SpecVerdict>;
}
