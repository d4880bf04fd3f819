extern crate self as colloquy;

use std::sync::Arc;

#[macro_use]
mod macros;
mod api;
mod brain;
mod engine;
mod error;
mod explore;

pub use api::{Engine, EngineBuilder, Options, UserStatementResponse};
pub use brain::{Brain, CategoryEntry, SubstitutionEntry};
pub use engine::{
    ChatHistory, ChatHistoryEntry, EntryFlags, HistorySnapshot, MARKER, MatchError, MatchLimits, MatchMetrics,
    MatchOutcome, Node, NormalizeTrace, PatternGraph, Pipeline, Render, RenderContext, RunMetrics, SentenceSplitter,
    SettingsDictionary, SubQuery, TemplateRenderer, WILDCARD_MANY, WILDCARD_ONE, substitute,
};
pub use error::{Error, Result};
pub use explore::{Explore, Property, outline};

// --- Authored knowledge ------------------------------------------------------

/// Authored render instructions attached to a terminal trie node.
///
/// `pattern` is the normalized pattern the template was authored for; it is
/// kept for diagnostics (conflict reports, explorer, CLI traces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pattern: String,
    text: String,
}

impl Template {
    pub fn new(pattern: impl Into<String>, text: impl Into<String>) -> Self {
        Template { pattern: pattern.into(), text: text.into() }
    }

    /// Normalized pattern this template answers.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Raw authored template text (before rendering).
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One authored `(pattern, template)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub pattern: String,
    pub template: String,
}

impl Category {
    pub fn new(pattern: impl Into<String>, template: impl Into<String>) -> Self {
        Category { pattern: pattern.into(), template: template.into() }
    }
}

/// Shared template handle. Templates live in the graph for the process
/// lifetime; sub-queries keep a reference to the one they resolved to.
pub type TemplateRef = Arc<Template>;
