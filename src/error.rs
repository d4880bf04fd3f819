use thiserror::Error;

/// Errors raised while assembling an engine from authored data.
///
/// Matching itself never fails from the caller's point of view: unmatched
/// input resolves to the fallback template. Everything here is a
/// configuration problem detected before the engine starts.
#[derive(Debug, Error)]
pub enum Error {
    /// Two categories reach the same terminal trie path.
    #[error("duplicate pattern \"{pattern}\" conflicts with already loaded \"{existing}\"")]
    DuplicatePattern { pattern: String, existing: String },

    /// A category pattern with no tokens.
    #[error("empty pattern for template \"{template}\"")]
    EmptyPattern { template: String },

    /// The configured illegal-character pattern is not a valid regex.
    #[error("invalid illegal-character pattern: {0}")]
    InvalidIllegalPattern(#[from] regex::Error),

    /// Brain file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Brain file is not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
