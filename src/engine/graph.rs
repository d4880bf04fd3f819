//! Pattern graph (trie of authored categories).
//!
//! Each category pattern is tokenized on whitespace and stored as a path from
//! the root. Categories share common prefixes:
//!
//! ```text
//! categories: HELLO WORLD, HELLO *, HI
//!
//! (root "")
//!  ├─ HELLO
//!  │   ├─ *      => template("HELLO *")
//!  │   └─ WORLD  => template("HELLO WORLD")
//!  └─ HI         => template("HI")
//! ```
//!
//! ## Invariants
//!
//! - Child keys are unique per node (`BTreeMap`), so iteration order is
//!   stable for explorers and reports.
//! - The root's `word` is the empty string.
//! - A node owns at most one template; a second category reaching the same
//!   terminal fails the build with [`Error::DuplicatePattern`].
//! - The tree is forward-owned (no parent pointers). Parent lookups go
//!   through the flat [`PatternGraph::categories`] index instead.
//!
//! The graph is never mutated after [`PatternGraph::build`] returns, so it can
//! be shared across threads and traversed without locks.

use crate::{Category, Error, Result, Template, TemplateRef};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Pattern token matching exactly one input word.
pub const WILDCARD_ONE: &str = "_";
/// Pattern token matching one or more input words.
pub const WILDCARD_MANY: &str = "*";

/// One position in the trie.
#[derive(Debug, Clone, Default)]
pub struct Node {
    word: String,
    children: BTreeMap<String, Node>,
    template: Option<TemplateRef>,
}

impl Node {
    fn with_word(word: &str) -> Self {
        Node { word: word.to_string(), ..Node::default() }
    }

    /// Token consumed to reach this node (`""` for the root).
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Read-only view of the outgoing edges.
    pub fn children(&self) -> &BTreeMap<String, Node> {
        &self.children
    }

    pub fn child(&self, token: &str) -> Option<&Node> {
        self.children.get(token)
    }

    pub fn template(&self) -> Option<&TemplateRef> {
        self.template.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.template.is_some()
    }

    pub fn is_wildcard(&self) -> bool {
        is_wildcard(&self.word)
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.values().map(Node::subtree_size).sum::<usize>()
    }
}

pub(crate) fn is_wildcard(token: &str) -> bool {
    token == WILDCARD_ONE || token == WILDCARD_MANY
}

/// Tokenize an authored pattern: split on whitespace, upper-case words and
/// keep wildcard tokens as-is.
pub(crate) fn pattern_tokens(pattern: &str) -> Vec<String> {
    pattern
        .split_whitespace()
        .map(|token| if is_wildcard(token) { token.to_string() } else { token.to_uppercase() })
        .collect()
}

/// Immutable knowledge base of authored categories.
#[derive(Debug, Clone, Default)]
pub struct PatternGraph {
    root: Node,
    /// Flat `(path, template)` index in insertion order.
    index: Vec<(Vec<String>, TemplateRef)>,
}

impl PatternGraph {
    /// Build the graph from authored categories.
    ///
    /// Fails on the first empty pattern or duplicate terminal path.
    pub fn build<I>(categories: I) -> Result<Self>
    where
        I: IntoIterator<Item = Category>,
    {
        let mut graph = PatternGraph::default();
        for category in categories {
            graph.insert(category)?;
        }
        tracing::debug!(categories = graph.len(), nodes = graph.node_count(), "pattern graph built");
        Ok(graph)
    }

    fn insert(&mut self, category: Category) -> Result<()> {
        let tokens = pattern_tokens(&category.pattern);
        if tokens.is_empty() {
            return Err(Error::EmptyPattern { template: category.template });
        }

        let pattern = tokens.join(" ");
        let mut node = &mut self.root;
        for token in &tokens {
            node = node.children.entry(token.clone()).or_insert_with(|| Node::with_word(token));
        }

        if let Some(existing) = &node.template {
            return Err(Error::DuplicatePattern { pattern, existing: existing.pattern().to_string() });
        }

        let template = Arc::new(Template::new(pattern, category.template));
        node.template = Some(Arc::clone(&template));
        self.index.push((tokens, template));
        Ok(())
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of categories loaded.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of trie nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Flat view of every category path and its template.
    pub fn categories(&self) -> impl Iterator<Item = (&[String], &TemplateRef)> {
        self.index.iter().map(|(path, template)| (path.as_slice(), template))
    }

    /// Follow an exact token path from the root (wildcards are literal keys here).
    pub fn node_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter().try_fold(&self.root, |node, token| node.child(token.as_ref()))
    }

    /// Parent of the node at `path`, found through the index rather than back-pointers.
    pub fn parent_of<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        let (_, parent) = path.split_last()?;
        self.node_at(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> PatternGraph {
        PatternGraph::build(categories![
            "HELLO WORLD" => "exact",
            "hello *" => "wild",
            "HI" => "Hello!",
        ])
        .unwrap()
    }

    #[test]
    fn shares_prefixes() {
        let g = graph();
        assert_eq!(g.len(), 3);
        // root, HELLO, WORLD, *, HI
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.root().word(), "");

        let hello = g.root().child("HELLO").unwrap();
        assert_eq!(hello.word(), "HELLO");
        assert!(!hello.is_terminal());
        let keys: Vec<&str> = hello.children().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["*", "WORLD"]);
        assert!(hello.child("*").unwrap().is_wildcard());
    }

    #[test]
    fn patterns_are_case_folded() {
        let g = graph();
        let node = g.node_at(&["HELLO", "*"]).unwrap();
        assert_eq!(node.template().unwrap().pattern(), "HELLO *");
        assert_eq!(node.template().unwrap().text(), "wild");
    }

    #[test]
    fn duplicate_terminal_is_rejected() {
        let err = PatternGraph::build(categories!["HI *" => "a", "hi  *" => "b"]).unwrap_err();
        match err {
            Error::DuplicatePattern { pattern, existing } => {
                assert_eq!(pattern, "HI *");
                assert_eq!(existing, "HI *");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn prefix_of_another_pattern_is_not_a_conflict() {
        let g = PatternGraph::build(categories!["HI" => "a", "HI THERE" => "b"]).unwrap();
        assert!(g.node_at(&["HI"]).unwrap().is_terminal());
        assert!(g.node_at(&["HI", "THERE"]).unwrap().is_terminal());
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let err = PatternGraph::build(categories!["   " => "nothing"]).unwrap_err();
        assert!(matches!(err, Error::EmptyPattern { .. }));
    }

    #[test]
    fn flat_index_supports_parent_lookup() {
        let g = graph();
        let paths: Vec<String> = g.categories().map(|(path, _)| path.join(" ")).collect();
        assert_eq!(paths, vec!["HELLO WORLD", "HELLO *", "HI"]);

        let parent = g.parent_of(&["HELLO", "WORLD"]).unwrap();
        assert_eq!(parent.word(), "HELLO");
        assert_eq!(g.parent_of(&["HI"]).unwrap().word(), "");
        assert!(g.parent_of::<&str>(&[]).is_none());
    }
}
