//! Table graphs: one node per table, one edge per foreign key column pair.

use super::skip_set;
use crate::config::GrapherOptions;
use crate::graph::Graph;
use crate::label::LabelRenderer;
use crate::schema::{Column, ForeignKey, TableSchema};
use crate::style::{attrs, overlay, Attributes, Style};
use ahash::AHashMap;

/// Builds table graphs
#[derive(Debug, Clone)]
pub struct TableGrapher {
    options: GrapherOptions,
    style: Style,
    renderer: LabelRenderer,
}

impl TableGrapher {
    pub fn new(options: GrapherOptions) -> Self {
        let style = Style::resolve(&options.style);
        let renderer = LabelRenderer::new(&options, style.node_table_header.clone());
        Self {
            options,
            style,
            renderer,
        }
    }

    pub fn options(&self) -> &GrapherOptions {
        &self.options
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Build the graph of `tables`, leaving out the tables named in the options
    pub fn graph(&self, tables: &[TableSchema]) -> Graph {
        self.graph_with_skip(tables, &self.options.skip)
    }

    /// Build the graph of `tables`, leaving out `skip` (case-insensitive)
    pub fn graph_with_skip<S: AsRef<str>>(&self, tables: &[TableSchema], skip: &[S]) -> Graph {
        let skip = skip_set(skip);
        let included: AHashMap<String, &TableSchema> = tables
            .iter()
            .map(|t| (t.name.to_lowercase(), t))
            .filter(|(name, _)| !skip.contains(name))
            .collect();

        let mut graph = Graph::new(self.options.graph_options.clone());

        for table in tables {
            if !included.contains_key(&table.name.to_lowercase()) {
                continue;
            }
            graph.add_node(
                table.name.as_str(),
                self.renderer.table_label(table),
                self.style.node.clone(),
            );
        }

        for table in tables {
            if !included.contains_key(&table.name.to_lowercase()) {
                continue;
            }
            for fk in &table.foreign_keys {
                let Some(referenced) = included.get(&fk.referenced_table.to_lowercase()) else {
                    continue;
                };
                self.add_foreign_key_edges(&mut graph, table, fk, referenced);
            }
        }

        graph
    }

    fn add_foreign_key_edges(
        &self,
        graph: &mut Graph,
        table: &TableSchema,
        fk: &ForeignKey,
        referenced: &TableSchema,
    ) {
        for (column, referenced_column) in fk.column_pairs() {
            let local = table.get_column(column);
            let remote = referenced.get_column(referenced_column);
            // ports must match the declared column names
            let column = local.map_or(column, |c| c.name.as_str());
            let referenced_column = remote.map_or(referenced_column, |c| c.name.as_str());

            let single_parent = local.is_some_and(|c| c.is_primary_key || c.is_unique);
            let arrowtail = if single_parent { "empty" } else { "crow" };
            let inheritance = local.is_some_and(is_pk) && remote.is_some_and(is_pk);

            let edge_attrs = if inheritance {
                attrs([
                    ("arrowhead", "none".into()),
                    ("arrowtail", arrowtail.into()),
                    ("dir", "both".into()),
                    ("tailport", referenced_column.into()),
                    ("headport", column.into()),
                ])
            } else {
                attrs([
                    ("arrowhead", "odot".into()),
                    ("arrowtail", arrowtail.into()),
                    ("dir", "both".into()),
                    ("tailport", column.into()),
                    ("headport", referenced_column.into()),
                ])
            };
            let attributes: Attributes = overlay(&self.style.edge, &edge_attrs);

            if inheritance {
                graph.add_edge(referenced.name.as_str(), table.name.as_str(), attributes);
            } else {
                graph.add_edge(table.name.as_str(), referenced.name.as_str(), attributes);
            }
        }
    }
}

fn is_pk(column: &Column) -> bool {
    column.is_primary_key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_schema;
    use crate::style::AttrValue;

    fn tables(sql: &str) -> Vec<TableSchema> {
        parse_schema(sql).into_tables()
    }

    #[test]
    fn test_association_edge() {
        let tables = tables(
            "CREATE TABLE users (id INT PRIMARY KEY, email TEXT);
             CREATE TABLE orders (id INT PRIMARY KEY, user_id INT REFERENCES users(id));",
        );
        let graph = TableGrapher::new(GrapherOptions::default()).graph(&tables);

        assert_eq!(graph.node_count(), 2);
        let edge = &graph.edges()[0];
        assert_eq!((edge.source(), edge.target()), ("orders", "users"));
        assert_eq!(edge.text("arrowhead"), Some("odot"));
        assert_eq!(edge.text("arrowtail"), Some("crow"));
        assert_eq!(edge.text("tailport"), Some("user_id"));
        assert_eq!(edge.text("headport"), Some("id"));
        assert_eq!(edge.text("dir"), Some("both"));
        assert_eq!(edge.attr("arrowsize"), Some(&AttrValue::Float(0.6)));
    }

    #[test]
    fn test_shared_primary_key_is_inheritance() {
        let tables = tables(
            "CREATE TABLE employee (id INT PRIMARY KEY, name TEXT);
             CREATE TABLE manager (id INT PRIMARY KEY REFERENCES employee(id), budget INT);",
        );
        let graph = TableGrapher::new(GrapherOptions::default()).graph(&tables);

        let edge = &graph.edges()[0];
        assert_eq!((edge.source(), edge.target()), ("employee", "manager"));
        assert_eq!(edge.text("arrowhead"), Some("none"));
        assert_eq!(edge.text("arrowtail"), Some("empty"));
        assert_eq!(edge.text("tailport"), Some("id"));
        assert_eq!(edge.text("headport"), Some("id"));
    }

    #[test]
    fn test_unique_fk_is_single_parent() {
        let tables = tables(
            "CREATE TABLE users (id INT PRIMARY KEY);
             CREATE TABLE profiles (id INT PRIMARY KEY, user_id INT UNIQUE REFERENCES users(id));",
        );
        let graph = TableGrapher::new(GrapherOptions::default()).graph(&tables);

        let edge = &graph.edges()[0];
        assert_eq!(edge.text("arrowtail"), Some("empty"));
        assert_eq!(edge.text("arrowhead"), Some("odot"));
    }

    #[test]
    fn test_skip_drops_nodes_and_edges() {
        let tables = tables(
            "CREATE TABLE users (id INT PRIMARY KEY);
             CREATE TABLE orders (id INT PRIMARY KEY, user_id INT REFERENCES users(id));",
        );
        let graph = TableGrapher::new(GrapherOptions::default()).graph_with_skip(&tables, &["Users"]);

        assert_eq!(graph.node_count(), 1);
        assert!(graph.node("orders").is_some());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_reference_outside_set_is_dropped() {
        let tables = tables("CREATE TABLE orders (id INT PRIMARY KEY, user_id INT REFERENCES users(id));");
        let graph = TableGrapher::new(GrapherOptions::default()).graph(&tables);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_composite_key_yields_edge_per_pair() {
        let tables = tables(
            "CREATE TABLE a (x INT, y INT, PRIMARY KEY (x, y));
             CREATE TABLE b (id INT PRIMARY KEY, ax INT, ay INT,
                FOREIGN KEY (ax, ay) REFERENCES a (x, y));",
        );
        let graph = TableGrapher::new(GrapherOptions::default()).graph(&tables);
        assert_eq!(graph.edges_between("a", "b").count(), 2);
    }

    #[test]
    fn test_no_graph_level_defaults() {
        let tables = tables("CREATE TABLE t (id INT);");
        let graph = TableGrapher::new(GrapherOptions::default()).graph(&tables);
        assert!(graph.attributes().is_empty());
    }
}
