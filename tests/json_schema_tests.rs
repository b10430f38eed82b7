//! Tests that verify JSON output and input files match the generated JSON schemas.

use jsonschema::Validator;
use serde_json::Value;
use sql_graphs::config::{GrapherConfig, GrapherOptions};
use sql_graphs::graph::to_json;
use sql_graphs::grapher::{ModelGrapher, TableGrapher};
use sql_graphs::input::read_source;
use sql_graphs::json_schema::get_schema;
use sql_graphs::model::ModelSet;
use sql_graphs::schema::parse_schema;
use std::fs;
use std::path::Path;

fn load_schema(name: &str) -> Validator {
    let schema = get_schema(name).unwrap_or_else(|| panic!("no schema named {}", name));
    let schema: Value = serde_json::to_value(schema).expect("Invalid schema JSON");
    Validator::new(&schema).expect("Failed to compile schema")
}

fn assert_valid(json: &Value, schema_name: &str) {
    let schema = load_schema(schema_name);
    if let Err(error) = schema.validate(json) {
        panic!(
            "JSON doesn't match {} schema:\n  - {}: {}\n\nValue was:\n{}",
            schema_name,
            error.instance_path(),
            error,
            serde_json::to_string_pretty(json).unwrap()
        );
    }
}

fn yaml_to_json(path: &str) -> Value {
    let content = fs::read_to_string(path).unwrap();
    serde_yaml_ng::from_str(&content).unwrap()
}

#[test]
fn test_model_graph_json_matches_schema() {
    let set = ModelSet::load(Path::new("demos/family.yaml")).unwrap();
    let options = GrapherOptions {
        show_operations: true,
        ..Default::default()
    };
    let graph = ModelGrapher::new(options).graph(&set.models);

    let json: Value = serde_json::from_str(&to_json(&graph)).unwrap();
    assert_valid(&json, "graph");
}

#[test]
fn test_table_graph_json_matches_schema() {
    let sql = read_source(Path::new("demos/family.sql")).unwrap();
    let tables = parse_schema(&sql).into_tables();
    let graph = TableGrapher::new(GrapherOptions::default()).graph(&tables);

    let json: Value = serde_json::from_str(&to_json(&graph)).unwrap();
    assert_valid(&json, "graph");
}

#[test]
fn test_demo_models_match_schema() {
    assert_valid(&yaml_to_json("demos/family.yaml"), "models");
}

#[test]
fn test_demo_config_matches_schema() {
    assert_valid(&yaml_to_json("demos/graph.yaml"), "config");
    let config = GrapherConfig::load(Path::new("demos/graph.yaml")).unwrap();
    assert!(config.show_operations);
}

#[test]
fn test_invalid_models_rejected() {
    let json: Value = serde_json::json!({
        "models": [{ "name": "Parent", "attributes": "not a list" }]
    });
    assert!(load_schema("models").validate(&json).is_err());
}
