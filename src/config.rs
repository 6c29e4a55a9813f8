//! Configuration for the decision pipeline

use serde::{Deserialize, Serialize};

/// Library configuration
///
/// All fields have sensible defaults; construct with `Config::default()` and
/// override what you need.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of candidates evaluated concurrently per batch.
    ///
    /// Candidate evaluation has no cross-candidate data dependency, so the
    /// decision maker fans out up to this many parse/match/evaluate futures
    /// at a time. Output order always matches input order. Set to 1 for
    /// strictly sequential evaluation.
    #[serde(default = "default_max_concurrent_evaluations")]
    pub max_concurrent_evaluations: usize,

    /// Capacity of the grab orchestrator's event broadcast channel.
    ///
    /// Slow subscribers that fall more than this many events behind will
    /// observe lagged receives.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_max_concurrent_evaluations() -> usize {
    4
}

fn default_event_channel_capacity() -> usize {
    256
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_evaluations: default_max_concurrent_evaluations(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}
