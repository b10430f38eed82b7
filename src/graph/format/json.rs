//! JSON format output for graphs.

use crate::graph::Graph;

/// Generate pretty-printed JSON output from a graph
pub fn to_json(graph: &Graph) -> String {
    serde_json::to_string_pretty(graph).unwrap_or_else(|_| "{}".to_string())
}
