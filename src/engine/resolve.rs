//! Sentence resolution.
//!
//! A [`SubQuery`] is one normalized sentence together with the template it
//! resolved to and the rendered response. The [`Resolver`] builds them:
//!
//! ```text
//! sentence ──▶ match_sentence ──┬─ Ok(match)        ──▶ template + captures
//!                               ├─ NoMatch          ──▶ fallback template
//!                               └─ GuardExceeded    ──▶ fallback template + warn!
//!                                        │
//!                                        ▼
//!                               Render::render ──▶ SubQuery
//! ```
//!
//! Resolution never fails: every sentence yields a `SubQuery`.
//!
//! `<srai>` redirects re-enter the resolver through the render context. Each
//! redirect runs the text through the full pipeline again. A [`RedirectBudget`]
//! lives for one statement and bounds the work three ways; a refused redirect
//! renders as `""` and logs a warning:
//!
//! - nesting deeper than `max_srai_depth`;
//! - more than `max_srai_redirects` redirects in total;
//! - a sentence that is already being resolved further up the chain (a cycle).

use super::graph::PatternGraph;
use super::matcher::{MatchError, MatchLimits, match_sentence};
use super::metrics::MatchMetrics;
use super::normalize::Pipeline;
use super::render::{Render, RenderContext};
use super::splitter::SentenceSplitter;
use crate::TemplateRef;
use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// How a sentence found its template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    /// An authored pattern matched.
    Matched,
    /// No pattern matched; the fallback template was used.
    Unmatched,
    /// The search guard tripped; the fallback template was used.
    GuardExceeded,
}

impl MatchOutcome {
    pub fn is_fallback(self) -> bool {
        !matches!(self, MatchOutcome::Matched)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchOutcome::Matched => "matched",
            MatchOutcome::Unmatched => "unmatched",
            MatchOutcome::GuardExceeded => "guard-exceeded",
        }
    }
}

/// One resolved sentence. Immutable once built.
#[derive(Debug, Clone)]
pub struct SubQuery {
    input_text: String,
    template: TemplateRef,
    captures: Vec<String>,
    response: String,
    outcome: MatchOutcome,
    metrics: MatchMetrics,
}

impl SubQuery {
    /// The normalized, trimmed sentence this sub-query answers.
    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Template used to answer (the fallback template when unmatched).
    pub fn template(&self) -> &TemplateRef {
        &self.template
    }

    /// Wildcard captures, in pattern order.
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.outcome
    }

    pub fn is_fallback(&self) -> bool {
        self.outcome.is_fallback()
    }

    pub fn metrics(&self) -> &MatchMetrics {
        &self.metrics
    }
}

/// Per-statement accounting for `<srai>` redirects.
pub(crate) struct RedirectBudget {
    max_depth: usize,
    max_redirects: usize,
    used: Cell<usize>,
    /// Sentences currently being resolved, outermost first.
    active: RefCell<Vec<String>>,
}

impl RedirectBudget {
    pub fn new(max_depth: usize, max_redirects: usize) -> Self {
        RedirectBudget { max_depth, max_redirects, used: Cell::new(0), active: RefCell::new(Vec::new()) }
    }

    /// Redirects granted so far.
    pub fn used(&self) -> usize {
        self.used.get()
    }

    fn try_spend(&self, text: &str, depth: usize) -> bool {
        if depth > self.max_depth {
            tracing::warn!(text, depth, limit = self.max_depth, "srai redirect depth exceeded");
            return false;
        }
        if self.used.get() >= self.max_redirects {
            tracing::warn!(text, limit = self.max_redirects, "srai redirect budget exhausted for this statement");
            return false;
        }
        self.used.set(self.used.get() + 1);
        true
    }

    fn is_active(&self, sentence: &str) -> bool {
        self.active.borrow().iter().any(|s| s == sentence)
    }

    fn enter(&self, sentence: &str) {
        self.active.borrow_mut().push(sentence.to_string());
    }

    fn leave(&self) {
        self.active.borrow_mut().pop();
    }
}

/// Borrowed view of the engine parts needed to resolve sentences.
///
/// Built once per statement; the redirect budget is shared by every sentence
/// of that statement.
pub(crate) struct Resolver<'e> {
    pub graph: &'e PatternGraph,
    pub pipeline: &'e Pipeline,
    pub splitter: &'e SentenceSplitter,
    pub renderer: &'e dyn Render,
    pub fallback: &'e TemplateRef,
    pub limits: MatchLimits,
    pub redirects: RedirectBudget,
}

impl Resolver<'_> {
    /// Resolve one already-normalized sentence.
    pub fn resolve(&self, sentence: &str) -> SubQuery {
        self.redirects.enter(sentence);
        let sub_query = self.resolve_at(sentence, 0);
        self.redirects.leave();
        sub_query
    }

    fn resolve_at(&self, sentence: &str, depth: usize) -> SubQuery {
        let tokens: Vec<&str> = sentence.split_whitespace().collect();
        let (result, metrics) = match_sentence(self.graph, &tokens, self.limits);

        let (template, captures, outcome) = match result {
            Ok(found) => {
                tracing::debug!(
                    input = sentence,
                    pattern = found.template.pattern(),
                    captures = ?found.captures,
                    steps = metrics.steps,
                    "sentence matched"
                );
                (Arc::clone(found.template), found.captures, MatchOutcome::Matched)
            }
            Err(MatchError::NoMatch) => {
                tracing::debug!(input = sentence, steps = metrics.steps, "no pattern matched; using fallback");
                (Arc::clone(self.fallback), Vec::new(), MatchOutcome::Unmatched)
            }
            Err(err @ MatchError::GuardExceeded { .. }) => {
                tracing::warn!(input = sentence, error = %err, "match guard tripped; review authored wildcards");
                (Arc::clone(self.fallback), Vec::new(), MatchOutcome::GuardExceeded)
            }
        };

        let redirect = |text: &str| self.redirect(text, depth + 1);
        let ctx = RenderContext::new(sentence, &captures).with_redirect(&redirect);
        let response = self.renderer.render(&template, &ctx);

        SubQuery { input_text: sentence.to_string(), template, captures, response, outcome, metrics }
    }

    fn redirect(&self, text: &str, depth: usize) -> String {
        if !self.redirects.try_spend(text, depth) {
            return String::new();
        }

        let normalized = self.pipeline.normalize(text);
        let mut responses = Vec::new();
        for sentence in self.splitter.split(&normalized) {
            if self.redirects.is_active(&sentence) {
                tracing::warn!(sentence = sentence.as_str(), "srai redirect cycle skipped");
                continue;
            }
            self.redirects.enter(&sentence);
            let response = self.resolve_at(&sentence, depth).response;
            self.redirects.leave();
            if !response.is_empty() {
                responses.push(response);
            }
        }
        responses.join(" ")
    }
}
