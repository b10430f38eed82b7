//! Abstract diagram description handed to the layout engine.
//!
//! This module provides:
//! - The [`Graph`] value: nodes with labels and attributes, plus styled edges
//! - Output formats: DOT (Graphviz) and JSON

pub mod format;

pub use format::{to_dot, to_json, Layout, OutputFormat};

use crate::label::Label;
use crate::style::{AttrValue, Attributes};
use schemars::JsonSchema;
use serde::Serialize;

/// A diagram node
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Node {
    id: String,
    label: Label,
    attributes: Attributes,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A directed diagram edge; `source` is the tail, `target` the head
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Edge {
    source: String,
    target: String,
    attributes: Attributes,
}

impl Edge {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Text attribute value, if present
    pub fn text(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_str)
    }

    /// Whether the edge connects `a` and `b`, in either direction
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Nodes and edges of a diagram, plus diagram-wide attributes.
///
/// Built once by a grapher and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Graph {
    attributes: Attributes,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub(crate) fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub(crate) fn add_node(&mut self, id: impl Into<String>, label: Label, attributes: Attributes) {
        self.nodes.push(Node {
            id: id.into(),
            label,
            attributes,
        });
    }

    pub(crate) fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        attributes: Attributes,
    ) {
        self.edges.push(Edge {
            source: source.into(),
            target: target.into(),
            attributes,
        });
    }

    /// Diagram-wide attributes (layout direction, limits, ...)
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Nodes in entity order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges connecting `a` and `b`, in either direction
    pub fn edges_between<'g>(&'g self, a: &'g str, b: &'g str) -> impl Iterator<Item = &'g Edge> {
        self.edges.iter().filter(move |e| e.connects(a, b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
