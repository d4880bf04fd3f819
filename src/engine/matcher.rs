//! Wildcard matching against the pattern graph.
//!
//! The matcher performs a depth-first, backtracking walk from the root. At
//! every position it tries, in order:
//!
//! 1. the child keyed by the exact input token,
//! 2. the `_` child (consumes exactly one token),
//! 3. the `*` child (consumes one or more tokens, longest first).
//!
//! The first path that consumes every token and ends on a node that owns a
//! template wins. Because the order is fixed, the result is deterministic:
//! authored exact words always beat wildcards at the same position.
//!
//! ## Search layout
//!
//! The walk uses an explicit stack instead of recursion. Candidates are pushed
//! in reverse precedence so the LIFO pop order equals the recursive order:
//!
//! ```text
//! node HELLO at pos 1, tokens [HELLO, BIG, WORLD]
//!
//! push  * (pos 2)        <- shortest `*`, tried last
//! push  * (pos 3)        <- longest `*`
//! push  _ (pos 2)
//! push  BIG (pos 2)      <- exact, popped first
//! ```
//!
//! ## Guard
//!
//! Chains of `*` can make the search exponential in the number of tokens.
//! [`MatchLimits`] caps both the number of expanded frames and the trie depth;
//! hitting either ends the search with [`MatchError::GuardExceeded`] instead
//! of burning unbounded time.

use super::graph::{Node, PatternGraph, WILDCARD_MANY, WILDCARD_ONE, is_wildcard};
use super::metrics::MatchMetrics;
use crate::TemplateRef;
use serde::Deserialize;
use std::ops::Range;
use std::time::Instant;

/// Bounds on a single sentence search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatchLimits {
    /// Deepest trie level the search may reach.
    pub max_depth: usize,
    /// Maximum number of search frames expanded per sentence.
    pub max_steps: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        MatchLimits { max_depth: 256, max_steps: 10_000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// Every branch was exhausted without reaching a template.
    #[error("no pattern matches the input")]
    NoMatch,
    /// The search hit [`MatchLimits`] before finding a template.
    #[error("match guard exceeded after {steps} steps at depth {depth}")]
    GuardExceeded { steps: usize, depth: usize },
}

/// A successful match.
#[derive(Debug, Clone)]
pub(crate) struct Match<'g> {
    pub template: &'g TemplateRef,
    /// Text consumed by each wildcard, in pattern order.
    pub captures: Vec<String>,
}

struct Frame<'g> {
    node: &'g Node,
    /// Next input token to consume.
    position: usize,
    /// Trie depth of `node`.
    depth: usize,
    /// Token ranges consumed by wildcards so far.
    captures: Vec<Range<usize>>,
}

impl<'g> Frame<'g> {
    fn advance(&self, node: &'g Node, end: usize, capture: bool) -> Frame<'g> {
        let mut captures = self.captures.clone();
        if capture {
            captures.push(self.position..end);
        }
        Frame { node, position: end, depth: self.depth + 1, captures }
    }
}

/// Match already-normalized `tokens` against `graph`.
///
/// Returns the match (or why there is none) together with the search effort.
pub(crate) fn match_sentence<'g, S: AsRef<str>>(
    graph: &'g PatternGraph,
    tokens: &[S],
    limits: MatchLimits,
) -> (Result<Match<'g>, MatchError>, MatchMetrics) {
    let started = Instant::now();
    let mut metrics = MatchMetrics::default();

    let result = search(graph, tokens, limits, &mut metrics);
    metrics.elapsed = started.elapsed();
    (result, metrics)
}

fn search<'g, S: AsRef<str>>(
    graph: &'g PatternGraph,
    tokens: &[S],
    limits: MatchLimits,
    metrics: &mut MatchMetrics,
) -> Result<Match<'g>, MatchError> {
    let mut stack = vec![Frame { node: graph.root(), position: 0, depth: 0, captures: Vec::new() }];

    while let Some(frame) = stack.pop() {
        metrics.steps += 1;
        metrics.depth = metrics.depth.max(frame.depth);
        if metrics.steps > limits.max_steps || frame.depth > limits.max_depth {
            return Err(MatchError::GuardExceeded { steps: metrics.steps, depth: frame.depth });
        }

        if frame.position == tokens.len() {
            // Wildcards never match zero tokens, so only a terminal here counts.
            if let Some(template) = frame.node.template() {
                let captures = frame.captures.iter().map(|range| join(&tokens[range.clone()])).collect();
                return Ok(Match { template, captures });
            }
            continue;
        }

        if let Some(many) = frame.node.child(WILDCARD_MANY) {
            for end in frame.position + 1..=tokens.len() {
                stack.push(frame.advance(many, end, true));
            }
        }

        if let Some(one) = frame.node.child(WILDCARD_ONE) {
            stack.push(frame.advance(one, frame.position + 1, true));
        }

        let token = tokens[frame.position].as_ref();
        if !is_wildcard(token) {
            if let Some(exact) = frame.node.child(token) {
                stack.push(frame.advance(exact, frame.position + 1, false));
            }
        }
    }

    Err(MatchError::NoMatch)
}

fn join<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}
