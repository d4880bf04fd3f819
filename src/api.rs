use crate::engine::normalize::DEFAULT_ILLEGAL_PATTERN;
use crate::engine::splitter::DEFAULT_DELIMITERS;
use crate::engine::{
    ChatHistory, MatchLimits, PatternGraph, Pipeline, RedirectBudget, Render, Resolver, RunMetrics,
    SentenceSplitter, SettingsDictionary, SubQuery, TemplateRenderer,
};
use crate::{Category, Result, Template, TemplateRef};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

/// Engine configuration.
///
/// Everything here is fixed before the engine starts. Missing fields in a
/// brain file fall back to [`Options::default`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Regex matching characters that sanitization replaces with a space.
    pub illegal_characters: String,
    /// Characters that end a sentence.
    pub sentence_delimiters: Vec<char>,
    /// Template used when a sentence matches nothing (or trips the guard).
    pub fallback_template: String,
    /// Bounds on the backtracking search.
    pub limits: MatchLimits,
    /// Maximum nesting of `<srai>` redirects.
    pub max_srai_depth: usize,
    /// Maximum number of `<srai>` redirects across one statement.
    pub max_srai_redirects: usize,
    /// User recorded in history by [`Engine::handle_user_statement`].
    pub default_user: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            illegal_characters: DEFAULT_ILLEGAL_PATTERN.to_string(),
            sentence_delimiters: DEFAULT_DELIMITERS.to_vec(),
            fallback_template: "I'm not sure how to respond to that.".to_string(),
            limits: MatchLimits::default(),
            max_srai_depth: 16,
            max_srai_redirects: 64,
            default_user: "user".to_string(),
        }
    }
}

/// Pattern used to label the fallback template in traces and the explorer.
pub(crate) const FALLBACK_PATTERN: &str = "<fallback>";

/// Result of [`Engine::handle_user_statement`].
#[derive(Debug, Clone)]
pub struct UserStatementResponse {
    /// The text exactly as received.
    pub raw_input: String,
    /// Output of the normalization pipeline (before sentence splitting).
    pub normalized: String,
    /// Per-sentence responses joined with a single space.
    pub text: String,
    /// Per-sentence results, in input order. Shared with the history entries.
    pub sub_queries: Arc<[SubQuery]>,
    pub metrics: RunMetrics,
}

/// Collects configuration and authored data, then builds an [`Engine`].
pub struct EngineBuilder {
    options: Options,
    substitutions: SettingsDictionary,
    categories: Vec<Category>,
    renderer: Box<dyn Render>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder {
            options: Options::default(),
            substitutions: SettingsDictionary::new(),
            categories: Vec::new(),
            renderer: Box::new(TemplateRenderer),
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Append one substitution (see [`SettingsDictionary::insert`]).
    pub fn substitution(mut self, name: &str, value: &str) -> Self {
        self.substitutions.insert(name, value);
        self
    }

    /// Replace the whole substitution dictionary.
    pub fn substitutions(mut self, dictionary: SettingsDictionary) -> Self {
        self.substitutions = dictionary;
        self
    }

    pub fn category(mut self, pattern: impl Into<String>, template: impl Into<String>) -> Self {
        self.categories.push(Category::new(pattern, template));
        self
    }

    pub fn categories<I: IntoIterator<Item = Category>>(mut self, categories: I) -> Self {
        self.categories.extend(categories);
        self
    }

    /// Install a custom template renderer instead of [`TemplateRenderer`].
    pub fn renderer<R: Render + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Compile the pipeline and the pattern graph.
    ///
    /// Fails on an invalid illegal-character pattern, an empty pattern or two
    /// categories with the same pattern path.
    pub fn build(self) -> Result<Engine> {
        let EngineBuilder { options, substitutions, categories, renderer } = self;

        let pipeline = Pipeline::new(&options.illegal_characters, substitutions)?;
        let splitter = SentenceSplitter::new(options.sentence_delimiters.iter().copied());
        let graph = PatternGraph::build(categories)?;
        let fallback = Arc::new(Template::new(FALLBACK_PATTERN, options.fallback_template.clone()));

        tracing::info!(
            categories = graph.len(),
            nodes = graph.node_count(),
            substitutions = pipeline.dictionary().len(),
            "engine ready"
        );

        Ok(Engine { options, pipeline, splitter, graph, fallback, renderer, history: ChatHistory::new() })
    }
}

/// The conversational engine.
///
/// Built once, then shared: `handle_user_statement` takes `&self`, and the
/// engine is `Send + Sync`. The only state that changes after construction is
/// the append-only [`ChatHistory`].
pub struct Engine {
    options: Options,
    pipeline: Pipeline,
    splitter: SentenceSplitter,
    graph: PatternGraph,
    fallback: TemplateRef,
    renderer: Box<dyn Render>,
    history: ChatHistory,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("categories", &self.graph.len())
            .field("substitutions", &self.pipeline.dictionary().len())
            .field("renderer", &"<renderer>")
            .field("history", &self.history.len())
            .finish()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Answer `text` on behalf of [`Options::default_user`].
    ///
    /// Never fails: sentences that match nothing resolve to the fallback
    /// template, and empty input yields the fallback response.
    ///
    /// # Example
    /// ```
    /// use colloquy::Engine;
    ///
    /// let engine = Engine::builder().category("HI", "Hello!").build().unwrap();
    /// let out = engine.handle_user_statement("Hi");
    /// assert_eq!(out.text, "Hello!");
    /// assert_eq!(engine.history().len(), 2);
    /// ```
    pub fn handle_user_statement(&self, text: &str) -> UserStatementResponse {
        self.handle_user_statement_as(&self.options.default_user, text)
    }

    /// Answer `text` and record `user` as the originator in the history.
    pub fn handle_user_statement_as(&self, user: &str, text: &str) -> UserStatementResponse {
        let total_start = Instant::now();

        let normalized = self.pipeline.normalize(text);
        let mut sentences = self.splitter.split(&normalized);
        if sentences.is_empty() {
            // Nothing left to match; resolve the empty sentence to get the fallback.
            sentences.push(String::new());
        }
        let normalize = total_start.elapsed();

        let resolve_start = Instant::now();
        let resolver = self.resolver();
        let sub_queries: Vec<SubQuery> = sentences.iter().map(|sentence| resolver.resolve(sentence)).collect();
        let resolve = resolve_start.elapsed();

        let text_out = sub_queries
            .iter()
            .map(SubQuery::response)
            .filter(|response| !response.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let sub_queries: Arc<[SubQuery]> = Arc::from(sub_queries);
        self.history.record_turn(user, text, &text_out, Arc::clone(&sub_queries));

        let metrics = RunMetrics { total: total_start.elapsed(), normalize, resolve };
        tracing::debug!(
            user,
            sentences = sub_queries.len(),
            redirects = resolver.redirects.used(),
            total = ?metrics.total,
            "statement handled"
        );

        UserStatementResponse { raw_input: text.to_string(), normalized, text: text_out, sub_queries, metrics }
    }

    /// Run only the normalization pipeline.
    pub fn normalize(&self, text: &str) -> String {
        self.pipeline.normalize(text)
    }

    /// Split already-normalized text into sentences.
    pub fn split(&self, normalized: &str) -> Vec<String> {
        self.splitter.split(normalized)
    }

    pub fn graph(&self) -> &PatternGraph {
        &self.graph
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn fallback_template(&self) -> &TemplateRef {
        &self.fallback
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver {
            graph: &self.graph,
            pipeline: &self.pipeline,
            splitter: &self.splitter,
            renderer: self.renderer.as_ref(),
            fallback: &self.fallback,
            limits: self.options.limits,
            redirects: RedirectBudget::new(self.options.max_srai_depth, self.options.max_srai_redirects),
        }
    }
}
