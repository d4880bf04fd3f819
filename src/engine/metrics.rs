//! Engine run metrics.
//!
//! Small, always-collected counters used by the CLI report and by callers who
//! want to keep an eye on matching cost:
//!
//! - [`MatchMetrics`] per sentence: how much backtracking the search did.
//! - [`RunMetrics`] per statement: where the time went.
//!
//! Collecting them costs a couple of `Instant::now()` calls per sentence.

use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

/// Search effort for one sentence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchMetrics {
    /// Search frames expanded (each backtracking candidate counts once).
    pub steps: usize,
    /// Deepest trie level visited.
    pub depth: usize,
    /// Wall time spent in the matcher.
    pub elapsed: Duration,
}

/// Timing for one `handle_user_statement` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunMetrics {
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent in the normalization pipeline and sentence splitter.
    pub normalize: Duration,
    /// Time spent matching and rendering all sentences.
    pub resolve: Duration,
}
