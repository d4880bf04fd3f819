//! Normalization pipeline.
//!
//! Every inbound statement (and every `<srai>` redirect) passes through the
//! same fixed chain before it reaches the pattern graph:
//!
//! ```text
//! raw ── Sanitize ── Substitute ── CaseFold ──> normalized
//!        illegal      dictionary    upper-case
//!        chars -> ' ' (marker-safe)
//! ```
//!
//! The order is part of the contract:
//!
//! - Sanitize runs first so stray punctuation cannot defeat the `\b` word
//!   boundaries the substitution patterns rely on.
//! - CaseFold runs last so substituted values reach the graph in the same case
//!   as the authored patterns. Dictionary lookups are case-insensitive, so
//!   folding earlier would not change which entries match.

use super::substitute::SettingsDictionary;
use crate::Result;
use regex::Regex;
use std::sync::Arc;

/// Default illegal-character class: anything that is not a letter, digit,
/// whitespace, apostrophe or sentence delimiter.
pub(crate) const DEFAULT_ILLEGAL_PATTERN: &str = r"[^\p{L}\p{N}\s'.!?;]";

/// Replace illegal characters with one space each.
#[derive(Debug, Clone)]
pub(crate) struct Sanitize {
    illegal: Regex,
}

impl Sanitize {
    pub(crate) fn new(pattern: &str) -> Result<Self> {
        Ok(Sanitize { illegal: Regex::new(pattern)? })
    }

    pub(crate) fn apply(&self, input: &str) -> String {
        self.illegal.replace_all(input, " ").into_owned()
    }
}

/// Apply the substitution dictionary.
#[derive(Debug, Clone)]
pub(crate) struct Substitute {
    dictionary: Arc<SettingsDictionary>,
}

impl Substitute {
    pub(crate) fn apply(&self, input: &str) -> String {
        self.dictionary.substitute(input)
    }
}

/// Locale-independent upper-casing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CaseFold;

impl CaseFold {
    pub(crate) fn apply(&self, input: &str) -> String {
        input.to_uppercase()
    }
}

/// Intermediate output of each stage, used by the CLI report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeTrace {
    pub sanitized: String,
    pub substituted: String,
    pub folded: String,
}

/// The fixed sanitize → substitute → case-fold chain.
#[derive(Debug, Clone)]
pub struct Pipeline {
    sanitize: Sanitize,
    substitute: Substitute,
    case_fold: CaseFold,
}

impl Pipeline {
    /// Build a pipeline from an illegal-character regex and a dictionary.
    ///
    /// Fails when `illegal_pattern` does not compile.
    pub fn new(illegal_pattern: &str, dictionary: SettingsDictionary) -> Result<Self> {
        Self::with_shared_dictionary(illegal_pattern, Arc::new(dictionary))
    }

    pub(crate) fn with_shared_dictionary(illegal_pattern: &str, dictionary: Arc<SettingsDictionary>) -> Result<Self> {
        Ok(Pipeline { sanitize: Sanitize::new(illegal_pattern)?, substitute: Substitute { dictionary }, case_fold: CaseFold })
    }

    pub fn dictionary(&self) -> &SettingsDictionary {
        &self.substitute.dictionary
    }

    /// Run every stage in order.
    pub fn normalize(&self, input: &str) -> String {
        let sanitized = self.sanitize.apply(input);
        let substituted = self.substitute.apply(&sanitized);
        self.case_fold.apply(&substituted)
    }

    /// Like [`Pipeline::normalize`] but keeps each stage's output.
    pub fn normalize_traced(&self, input: &str) -> NormalizeTrace {
        let sanitized = self.sanitize.apply(input);
        let substituted = self.substitute.apply(&sanitized);
        let folded = self.case_fold.apply(&substituted);
        NormalizeTrace { sanitized, substituted, folded }
    }
}
