//! JSON Schema generation for the file formats the CLI reads and writes.
//!
//! Schemas are generated using the schemars crate and can be exported via the
//! `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns every schema by name.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // JSON output of the models and tables commands
    schemas.insert("graph", schema_for!(crate::graph::Graph));

    // model descriptor files (YAML or JSON)
    schemas.insert("models", schema_for!(crate::model::ModelSet));

    // --config files
    schemas.insert("config", schema_for!(crate::config::GrapherConfig));

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names() {
        assert_eq!(schema_names(), vec!["config", "graph", "models"]);
        assert!(get_schema("graph").is_some());
        assert!(get_schema("analyze").is_none());
    }

    #[test]
    fn test_graph_schema_lists_fields() {
        let schema = serde_json::to_value(get_schema("graph").unwrap()).unwrap();
        let properties = &schema["properties"];
        assert!(properties.get("nodes").is_some());
        assert!(properties.get("edges").is_some());
        assert!(properties.get("attributes").is_some());
    }
}
