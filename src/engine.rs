//! Conversational text engine.
//!
//! This module groups the moving parts that turn one raw user statement into
//! an authored response. The public entry point is [`crate::Engine`] in
//! `api.rs`; everything here is the machinery it coordinates.
//!
//! ## How the parts work together
//!
//! ```text
//! categories ──┐
//!              │  PatternGraph::build              (graph.rs)
//!              └──────────────┬───────────────
//!                             │
//! raw text ── Pipeline::normalize ──┐              (normalize.rs)
//!              sanitize             │
//!              substitute ──────────┼─ SettingsDictionary (substitute.rs)
//!              case-fold            │
//!                                   v
//!                    SentenceSplitter::split        (splitter.rs)
//!                                   │
//!                        ┌──────────┴──────────┐
//!                        v                     v
//!                 resolve sentence 1 ... resolve sentence n   (resolve.rs)
//!                   - match_sentence (matcher.rs)
//!                   - fallback on miss / guard trip
//!                   - Render hook (render.rs)
//!                        │
//!                        v
//!                 Vec<SubQuery> ──> ChatHistory (history.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `substitute.rs`: ordered, case-insensitive dictionary and the
//!   marker-protected substitution pass.
//! - `normalize.rs`: the fixed transformer chain (sanitize, substitute,
//!   case-fold).
//! - `splitter.rs`: sentence decomposition on configured delimiters.
//! - `graph.rs`: the immutable trie of authored patterns.
//! - `matcher.rs`: backtracking wildcard search with a step/depth guard.
//! - `render.rs`: the injectable template rendering hook and the default
//!   `<star/>`/`<srai>` renderer.
//! - `resolve.rs`: per-sentence `SubQuery` construction.
//! - `history.rs`: append-only chat history with snapshot reads.
//! - `metrics.rs`: timing and search-effort counters.
//!
//! ## Debugging
//!
//! The engine logs through `tracing`. The CLI honors `COLLOQUY_LOG`
//! (for example `COLLOQUY_LOG=colloquy=debug`) to print per-sentence
//! resolution traces.

#[path = "engine/graph.rs"]
mod graph;
#[path = "engine/history.rs"]
mod history;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
pub(crate) mod normalize;
#[path = "engine/render.rs"]
mod render;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/splitter.rs"]
pub(crate) mod splitter;
#[path = "engine/substitute.rs"]
pub(crate) mod substitute;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use graph::{Node, PatternGraph, WILDCARD_MANY, WILDCARD_ONE};
pub use history::{ChatHistory, ChatHistoryEntry, EntryFlags, HistorySnapshot};
pub use matcher::{MatchError, MatchLimits};
pub use metrics::{MatchMetrics, RunMetrics};
pub use normalize::{NormalizeTrace, Pipeline};
pub use render::{Render, RenderContext, TemplateRenderer};
pub use resolve::{MatchOutcome, SubQuery};
pub use splitter::SentenceSplitter;
pub use substitute::{MARKER, SettingsDictionary, substitute};

pub(crate) use resolve::{RedirectBudget, Resolver};
