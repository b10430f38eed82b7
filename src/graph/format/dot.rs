//! Graphviz DOT format output.

use crate::graph::Graph;
use crate::style::{AttrValue, Attributes};

/// Generate DOT format output for a graph
pub fn to_dot(graph: &Graph) -> String {
    let mut output = String::new();

    output.push_str("digraph G {\n");
    if !graph.attributes().is_empty() {
        output.push_str(&format!("  graph [{}];\n", attr_list(graph.attributes())));
    }
    if !graph.nodes().is_empty() {
        output.push('\n');
    }

    for node in graph.nodes() {
        let mut attributes = attr_list(node.attributes());
        if !attributes.is_empty() {
            attributes.push_str(", ");
        }
        output.push_str(&format!(
            "  {} [{}label=<{}>];\n",
            escape_dot_id(node.id()),
            attributes,
            node.label().to_html()
        ));
    }

    if !graph.edges().is_empty() {
        output.push('\n');
    }

    for edge in graph.edges() {
        let attributes = attr_list(edge.attributes());
        if attributes.is_empty() {
            output.push_str(&format!(
                "  {} -> {};\n",
                escape_dot_id(edge.source()),
                escape_dot_id(edge.target())
            ));
        } else {
            output.push_str(&format!(
                "  {} -> {} [{}];\n",
                escape_dot_id(edge.source()),
                escape_dot_id(edge.target()),
                attributes
            ));
        }
    }

    output.push_str("}\n");
    output
}

/// `key=value` pairs separated by commas
fn attr_list(attributes: &Attributes) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!("{}={}", escape_dot_id(key), attr_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Numbers and booleans are bare, text is always quoted
fn attr_value(value: &AttrValue) -> String {
    match value {
        AttrValue::Text(s) => quote(s),
        other => other.to_string(),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Escape a string for use as a DOT node ID
fn escape_dot_id(s: &str) -> String {
    if s.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
    {
        s.to_string()
    } else {
        quote(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::{BlockLayout, Label, LabelBlock, LabelRow};
    use crate::style::attrs;

    fn label(title: &str) -> Label {
        Label {
            title: title.to_string(),
            header: Attributes::new(),
            blocks: vec![LabelBlock {
                layout: BlockLayout::Lines,
                rows: vec![LabelRow::text("id: Integer")],
            }],
        }
    }

    fn create_test_graph() -> Graph {
        let mut graph = Graph::new(attrs([("mclimit", AttrValue::Int(1000))]));
        graph.add_node("Parent", label("Parent"), attrs([("shape", "plaintext".into())]));
        graph.add_node("Child", label("Child"), Attributes::new());
        graph.add_edge(
            "Parent",
            "Child",
            attrs([
                ("headlabel", "  +children  ".into()),
                ("arrowsize", AttrValue::Float(0.6)),
                ("labelfloat", "true".into()),
            ]),
        );
        graph
    }

    #[test]
    fn test_dot_structure() {
        let output = to_dot(&create_test_graph());

        assert!(output.starts_with("digraph G {\n"));
        assert!(output.contains("  graph [mclimit=1000];\n"));
        assert!(output.ends_with("}\n"));
    }

    #[test]
    fn test_dot_nodes_carry_html_labels() {
        let output = to_dot(&create_test_graph());

        assert!(output.contains("  Parent [shape=\"plaintext\", label=<<TABLE"));
        assert!(output.contains("  Child [label=<<TABLE"));
        assert!(output.contains("id: Integer<BR/>"));
    }

    #[test]
    fn test_dot_edge_attributes() {
        let output = to_dot(&create_test_graph());

        assert!(output.contains(
            "  Parent -> Child [arrowsize=0.6, headlabel=\"  +children  \", labelfloat=\"true\"];"
        ));
    }

    #[test]
    fn test_escape_dot_id() {
        assert_eq!(escape_dot_id("users"), "users");
        assert_eq!(escape_dot_id("user orders"), "\"user orders\"");
        assert_eq!(escape_dot_id("1st"), "\"1st\"");
        assert_eq!(escape_dot_id("a\"b"), "\"a\\\"b\"");
        assert_eq!(escape_dot_id(""), "\"\"");
    }
}
