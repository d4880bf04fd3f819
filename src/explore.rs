//! Read-only explorer contract.
//!
//! Diagnostic UIs walk the live knowledge graph and the chat history through
//! the [`Explore`] trait instead of reaching into engine internals. Each
//! explorable type reports a title, a flat list of named properties and its
//! navigable children.
//!
//! ```text
//! PatternGraph ─▶ Node("") ─▶ Node("HELLO") ─▶ Node("*") ─▶ Template
//! HistorySnapshot ─▶ ChatHistoryEntry ─▶ SubQuery ─▶ Template
//! ```

use crate::engine::{ChatHistoryEntry, HistorySnapshot, Node, PatternGraph, SubQuery};
use crate::Template;
use std::fmt::Write as _;

/// A named, displayable property of an explorable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub value: String,
}

impl Property {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Property { name, value: value.into() }
    }
}

/// Capability: "has navigable child properties".
pub trait Explore {
    /// Short label for tree views.
    fn title(&self) -> String;

    fn properties(&self) -> Vec<Property> {
        Vec::new()
    }

    fn children(&self) -> Vec<&dyn Explore> {
        Vec::new()
    }

    fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

/// Render `root` as an indented outline, at most `max_depth` levels deep.
pub fn outline(root: &dyn Explore, max_depth: usize) -> String {
    let mut out = String::new();
    write_outline(root, 0, max_depth, &mut out);
    out
}

fn write_outline(item: &dyn Explore, level: usize, max_depth: usize, out: &mut String) {
    let _ = writeln!(out, "{}{}", "  ".repeat(level), item.title());
    if level >= max_depth {
        return;
    }
    for child in item.children() {
        write_outline(child, level + 1, max_depth, out);
    }
}

impl Explore for PatternGraph {
    fn title(&self) -> String {
        "knowledge graph".to_string()
    }

    fn properties(&self) -> Vec<Property> {
        vec![Property::new("categories", self.len().to_string()), Property::new("nodes", self.node_count().to_string())]
    }

    fn children(&self) -> Vec<&dyn Explore> {
        vec![self.root() as &dyn Explore]
    }
}

impl Explore for Node {
    fn title(&self) -> String {
        if self.word().is_empty() { "(root)".to_string() } else { self.word().to_string() }
    }

    fn properties(&self) -> Vec<Property> {
        let mut props = vec![
            Property::new("word", self.word()),
            Property::new("children", self.children().len().to_string()),
        ];
        if let Some(template) = self.template() {
            props.push(Property::new("pattern", template.pattern()));
        }
        props
    }

    fn children(&self) -> Vec<&dyn Explore> {
        let mut children: Vec<&dyn Explore> = Vec::new();
        if let Some(template) = self.template() {
            children.push(&**template);
        }
        children.extend(self.children().values().map(|n| n as &dyn Explore));
        children
    }
}

impl Explore for Template {
    fn title(&self) -> String {
        format!("=> {}", self.text())
    }

    fn properties(&self) -> Vec<Property> {
        vec![Property::new("pattern", self.pattern()), Property::new("text", self.text())]
    }
}

impl Explore for SubQuery {
    fn title(&self) -> String {
        format!("{} -> {}", self.input_text(), self.response())
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("input", self.input_text()),
            Property::new("response", self.response()),
            Property::new("pattern", self.template().pattern()),
            Property::new("captures", self.captures().join(" | ")),
            Property::new("outcome", self.outcome().as_str()),
            Property::new("steps", self.metrics().steps.to_string()),
        ]
    }

    fn children(&self) -> Vec<&dyn Explore> {
        vec![&**self.template() as &dyn Explore]
    }
}

impl Explore for ChatHistoryEntry {
    fn title(&self) -> String {
        let side = if self.is_inbound() { self.user() } else { "engine" };
        format!("#{} {}: {}", self.sequence(), side, self.text())
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("sequence", self.sequence().to_string()),
            Property::new("timestamp", self.timestamp().to_rfc3339()),
            Property::new("user", self.user()),
            Property::new("flags", format!("{:?}", self.flags())),
            Property::new("text", self.text()),
        ]
    }

    fn children(&self) -> Vec<&dyn Explore> {
        self.sub_queries().iter().map(|sq| sq as &dyn Explore).collect()
    }
}

impl Explore for HistorySnapshot {
    fn title(&self) -> String {
        format!("history ({} entries)", self.len())
    }

    fn children(&self) -> Vec<&dyn Explore> {
        self.iter().map(|entry| entry as &dyn Explore).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_outline_lists_nodes_and_templates() {
        let graph = PatternGraph::build(categories!["HELLO *" => "hi", "HELLO WORLD" => "hey"]).unwrap();
        let text = outline(&graph, 8);
        let expected = "\
knowledge graph
  (root)
    HELLO
      *
        => hi
      WORLD
        => hey
";
        assert_eq!(text, expected);
    }

    #[test]
    fn outline_respects_depth() {
        let graph = PatternGraph::build(categories!["A B C" => "x"]).unwrap();
        assert_eq!(outline(&graph, 2), "knowledge graph\n  (root)\n    A\n");
    }

    #[test]
    fn node_properties_expose_word_and_children() {
        let graph = PatternGraph::build(categories!["HI" => "Hello!"]).unwrap();
        let root = graph.root();
        assert!(root.has_children());
        let props = root.properties();
        assert_eq!(props[0], Property::new("word", ""));
        assert_eq!(props[1], Property::new("children", "1"));

        let hi = root.child("HI").unwrap();
        assert!(hi.properties().contains(&Property::new("pattern", "HI")));
    }
}
