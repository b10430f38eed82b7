//! Model graph tests over the Parent/Child/Toy family and smaller fixtures.

use sql_graphs::config::GrapherOptions;
use sql_graphs::graph::{to_dot, Graph};
use sql_graphs::grapher::ModelGrapher;
use sql_graphs::model::{Attribute, Model, ModelSet, Operation, Param, Relationship};
use sql_graphs::style::{attrs, AttrValue, StyleOverrides, NODE_TABLE_HEADER};
use std::collections::BTreeMap;
use std::path::Path;

fn family() -> Vec<Model> {
    let set = ModelSet::new(vec![
        Model::new("Parent", "parent")
            .with_attribute(Attribute::new("id", "Integer").not_null())
            .with_attribute(Attribute::new("name", "Text"))
            .with_relationship(
                Relationship::new("children", "Child")
                    .collection()
                    .local_column("id")
                    .back_populates("parents"),
            )
            .with_operation(Operation::new("add_child").param(Param::new("name"))),
        Model::new("Child", "child")
            .with_attribute(Attribute::new("id", "Integer").not_null())
            .with_attribute(Attribute::new("name", "Text"))
            .with_attribute(Attribute::new("favourite_toy_id", "Integer"))
            .with_relationship(
                Relationship::new("parents", "Parent")
                    .collection()
                    .local_column("id")
                    .back_populates("children"),
            )
            .with_relationship(
                Relationship::new("toys", "Toy")
                    .collection()
                    .local_column("id")
                    .back_populates("owner"),
            )
            .with_relationship(
                Relationship::new("favourite_toy", "Toy").local_column("favourite_toy_id"),
            )
            .with_operation(Operation::new("add_parent").param(Param::new("name")))
            .with_operation(
                Operation::new("add_toy").param(Param::with_default("name", "'Doodle'")),
            ),
        Model::new("Toy", "toy")
            .with_attribute(Attribute::new("id", "Integer").not_null())
            .with_attribute(Attribute::new("name", "Text"))
            .with_attribute(Attribute::new("child_id", "Integer").not_null())
            .with_relationship(
                Relationship::new("owner", "Child")
                    .local_column("child_id")
                    .back_populates("toys"),
            ),
    ]);
    set.link_reverses().into_models()
}

fn family_grapher() -> ModelGrapher {
    let mut style = StyleOverrides::new();
    style.insert(
        NODE_TABLE_HEADER.to_string(),
        attrs([("bgcolor", "#000088".into())]),
    );
    ModelGrapher::new(GrapherOptions {
        show_operations: true,
        style,
        ..Default::default()
    })
}

/// Map of node id to the trimmed label at that end of the edge
fn edge_labels(graph: &Graph) -> Vec<BTreeMap<String, String>> {
    graph
        .edges()
        .iter()
        .map(|edge| {
            let label = |key: &str| edge.text(key).unwrap_or("").trim().to_string();
            let mut ends = BTreeMap::new();
            ends.insert(edge.target().to_string(), label("headlabel"));
            ends.insert(edge.source().to_string(), label("taillabel"));
            ends
        })
        .collect()
}

fn labels(pairs: [(&str, &str); 2]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_model_names_are_node_ids() {
    let graph = family_grapher().graph(&family());
    let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["Parent", "Child", "Toy"]);
}

#[test]
fn test_edges_and_labels() {
    let graph = family_grapher().graph(&family());
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.edges_between("Child", "Parent").count(), 1);
    assert_eq!(graph.edges_between("Child", "Toy").count(), 2);

    let mut expected = vec![
        labels([("Child", "+children"), ("Parent", "+parents")]),
        labels([("Child", "owner"), ("Toy", "+toys")]),
        labels([("Child", ""), ("Toy", "0..1 favourite_toy")]),
    ];
    for found in edge_labels(&graph) {
        let position = expected
            .iter()
            .position(|e| *e == found)
            .unwrap_or_else(|| panic!("unexpected edge labels: {:?}", found));
        expected.remove(position);
    }
    assert!(expected.is_empty());
}

#[test]
fn test_labels_are_padded() {
    let graph = family_grapher().graph(&family());
    let favourite = graph
        .edges()
        .iter()
        .find(|e| e.text("headlabel") == Some("  0..1 favourite_toy  "))
        .unwrap();
    assert!(favourite.attr("taillabel").is_none());
    assert!(favourite.attr("dir").is_none());
}

#[test]
fn test_model_methods_in_nodes() {
    let graph = family_grapher().graph(&family());
    let rows = |id: &str| -> Vec<String> {
        graph
            .node(id)
            .unwrap()
            .label()
            .rows()
            .map(str::to_string)
            .collect()
    };

    assert!(rows("Child").contains(&"add_parent(name)".to_string()));
    assert!(rows("Child").contains(&"add_toy(name='Doodle')".to_string()));
    assert!(rows("Parent").contains(&"add_child(name)".to_string()));
    assert!(!rows("Toy").iter().any(|r| r.contains('(')));
}

#[test]
fn test_header_style_override() {
    let graph = family_grapher().graph(&family());
    let label = graph.node("Toy").unwrap().label();
    assert_eq!(label.header.get("bgcolor"), Some(&AttrValue::from("#000088")));
    assert_eq!(label.header.get("fontsize"), Some(&AttrValue::Int(10)));
    assert!(to_dot(&graph).contains("BGCOLOR=\"#000088\""));
}

#[test]
fn test_datatypes_hidden() {
    let grapher = ModelGrapher::new(GrapherOptions {
        show_datatypes: false,
        ..Default::default()
    });
    let graph = grapher.graph(&family());
    let rows: Vec<&str> = graph.node("Toy").unwrap().label().rows().collect();
    assert_eq!(rows, vec!["id", "name", "child_id"]);
}

#[test]
fn test_inheritance_edge() {
    let models = vec![
        Model::new("Employee", "employee").with_attribute(Attribute::new("id", "Integer")),
        Model::new("Manager", "manager")
            .with_parent("Employee")
            .with_attribute(Attribute::new("id", "Integer").on_table("employee"))
            .with_attribute(Attribute::new("budget", "Numeric").on_table("manager")),
    ];
    let graph = ModelGrapher::new(GrapherOptions::default()).graph(&models);

    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges()[0];
    assert_eq!((edge.source(), edge.target()), ("Employee", "Manager"));
    assert_eq!(edge.text("arrowhead"), Some("none"));
    assert_eq!(edge.text("arrowtail"), Some("empty"));
    assert!(edge.attr("headlabel").is_none());
    assert!(edge.attr("taillabel").is_none());
}

#[test]
fn test_inheritance_to_missing_parent_is_dropped() {
    let models = vec![Model::new("Manager", "manager").with_parent("Employee")];
    let graph = ModelGrapher::new(GrapherOptions::default()).graph(&models);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_viewonly_pair_is_dashed() {
    let models = ModelSet::new(vec![
        Model::new("A", "a").with_relationship(
            Relationship::new("bs", "B")
                .collection()
                .viewonly()
                .back_populates("a"),
        ),
        Model::new("B", "b").with_relationship(Relationship::new("a", "A").viewonly()),
    ])
    .link_reverses()
    .into_models();

    let graph = ModelGrapher::new(GrapherOptions::default()).graph(&models);
    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges()[0];
    assert_eq!(edge.text("style"), Some("dashed"));
    assert_eq!(edge.text("dir"), Some("both"));
}

#[test]
fn test_ambiguous_reverse_labels_once() {
    let models = vec![
        Model::new("A", "a").with_relationship(
            Relationship::new("bs", "B")
                .collection()
                .reverse_of("B", "a1")
                .reverse_of("B", "a2"),
        ),
        Model::new("B", "b")
            .with_relationship(Relationship::new("a1", "A").reverse_of("A", "bs"))
            .with_relationship(Relationship::new("a2", "A").reverse_of("A", "bs")),
    ];
    let graph = ModelGrapher::new(GrapherOptions::default()).graph(&models);

    assert_eq!(graph.edge_count(), 3);
    let labeled_bs = graph
        .edges()
        .iter()
        .filter(|e| {
            e.text("headlabel") == Some("  +bs  ") || e.text("taillabel") == Some("  +bs  ")
        })
        .count();
    assert_eq!(labeled_bs, 1);
    assert!(graph.edges().iter().all(|e| e.attr("taillabel").is_none()));
}

#[test]
fn test_subset_drops_outside_relationships() {
    let models: Vec<Model> = family()
        .into_iter()
        .filter(|m| m.name != "Parent")
        .collect();
    let graph = family_grapher().graph(&models);
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.edges_between("Child", "Parent").count(), 0);
}

#[test]
fn test_graphing_is_repeatable() {
    let grapher = family_grapher();
    let models = family();
    assert_eq!(grapher.graph(&models), grapher.graph(&models));
}

#[test]
fn test_demo_file_matches_built_models() {
    let set = ModelSet::load(Path::new("demos/family.yaml")).unwrap();
    assert_eq!(set.len(), 3);

    let from_file = family_grapher().graph(&set.models);
    let built = family_grapher().graph(&family());
    assert_eq!(from_file, built);
}
