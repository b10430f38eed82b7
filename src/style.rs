//! Style categories for graph nodes and edges.
//!
//! Each category starts from a built-in attribute set and is layered with the
//! caller's overrides. Relationship and inheritance edges share the generic
//! `edge` category underneath their own attributes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Generic edge attributes, underneath every edge style
pub const EDGE: &str = "edge";
/// Parent to child edges between models (or tables sharing a primary key)
pub const INHERITANCE: &str = "inheritance";
/// Association edges between models
pub const RELATIONSHIP: &str = "relationship";
/// Overlay for relationships that are not write-authoritative
pub const RELATIONSHIP_VIEWONLY: &str = "relationship-viewonly";
/// Node attributes
pub const NODE: &str = "node";
/// Header cell of a node label (bgcolor, color, fontsize, top_margin)
pub const NODE_TABLE_HEADER: &str = "node_table_header";

/// A single Graphviz attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Text value, if this attribute holds one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(x) => write!(f, "{}", x),
            AttrValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(x: f64) -> Self {
        AttrValue::Float(x)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

/// Attribute name to value, ordered for stable output
pub type Attributes = BTreeMap<String, AttrValue>;

/// Per-category attribute overrides, keyed by category name
pub type StyleOverrides = BTreeMap<String, Attributes>;

/// Build an attribute map from name/value pairs
pub fn attrs<const N: usize>(pairs: [(&str, AttrValue); N]) -> Attributes {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Built-in attributes for a category; unknown categories are empty
pub fn default_category(category: &str) -> Attributes {
    match category {
        EDGE => attrs([
            ("arrowsize", AttrValue::Float(0.6)),
            ("fontname", "Bitstream Vera Sans".into()),
            ("fontsize", AttrValue::Int(8)),
            ("labelfloat", "true".into()),
            ("penwidth", AttrValue::Int(1)),
        ]),
        INHERITANCE => attrs([("arrowhead", "none".into()), ("arrowtail", "empty".into())]),
        RELATIONSHIP => attrs([("arrowhead", "vee".into()), ("arrowtail", "vee".into())]),
        RELATIONSHIP_VIEWONLY => attrs([("style", "dashed".into())]),
        NODE => attrs([
            ("fontname", "Bitstream Vera Sans".into()),
            ("fontsize", AttrValue::Int(8)),
            ("shape", "plaintext".into()),
        ]),
        NODE_TABLE_HEADER => attrs([
            ("bgcolor", "#444444".into()),
            ("color", "#FFFFFF".into()),
            ("fontsize", AttrValue::Int(10)),
            ("top_margin", AttrValue::Int(2)),
        ]),
        _ => Attributes::new(),
    }
}

/// Return `extra` layered over `base` as a new map
pub fn overlay(base: &Attributes, extra: &Attributes) -> Attributes {
    let mut result = base.clone();
    result.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    result
}

/// Resolved attributes for every style category
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub edge: Attributes,
    pub inheritance: Attributes,
    pub relationship: Attributes,
    pub relationship_viewonly: Attributes,
    pub node: Attributes,
    pub node_table_header: Attributes,
}

impl Style {
    /// Merge the built-in defaults with the given overrides
    pub fn resolve(overrides: &StyleOverrides) -> Self {
        let collapse = |keys: &[&str]| {
            keys.iter().fold(Attributes::new(), |merged, key| {
                let merged = overlay(&merged, &default_category(key));
                match overrides.get(*key) {
                    Some(extra) => overlay(&merged, extra),
                    None => merged,
                }
            })
        };

        Self {
            edge: collapse(&[EDGE]),
            inheritance: collapse(&[EDGE, INHERITANCE]),
            relationship: collapse(&[EDGE, RELATIONSHIP]),
            relationship_viewonly: collapse(&[RELATIONSHIP_VIEWONLY]),
            node: collapse(&[NODE]),
            node_table_header: collapse(&[NODE_TABLE_HEADER]),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::resolve(&StyleOverrides::new())
    }
}
