//! Model descriptors for ORM-style diagrams.
//!
//! This module provides:
//! - Data models for mapped classes: attributes, relationships, operations
//! - Inheritance through a parent model reference
//! - Loading model sets from YAML or JSON descriptor files
//!
//! The descriptors are plain data. Whatever modeling layer produces them is
//! responsible for filling in the reverse relationship links and for deciding
//! which operations are declared locally.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Reference to a relationship by owning model and key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipRef {
    pub model: String,
    pub key: String,
}

impl RelationshipRef {
    pub fn new(model: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for RelationshipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.model, self.key)
    }
}

fn default_true() -> bool {
    true
}

/// Mapped column attribute of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Short type label (e.g. `Integer`, `Text`)
    #[serde(rename = "type")]
    pub type_name: String,
    /// Table the column is declared on; `None` means the model's own table
    #[serde(default)]
    pub table: Option<String>,
    /// Whether the column allows NULL values
    #[serde(default = "default_true")]
    pub nullable: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            table: None,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn on_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// Directed association from the owning model to `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    /// Relationship key on the owning model
    pub key: String,
    /// Name of the related model
    pub target: String,
    /// The relationship yields a collection rather than a single value
    #[serde(default)]
    pub uselist: bool,
    /// Read-derived association, not written through
    #[serde(default)]
    pub viewonly: bool,
    /// Owning model attributes on the local side of the join
    #[serde(default)]
    pub local_columns: Vec<String>,
    /// Relationships on other models describing the same association
    #[serde(default)]
    pub reverse: Vec<RelationshipRef>,
    /// Key of the relationship on `target` that mirrors this one
    #[serde(default)]
    pub back_populates: Option<String>,
}

impl Relationship {
    pub fn new(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            target: target.into(),
            uselist: false,
            viewonly: false,
            local_columns: Vec::new(),
            reverse: Vec::new(),
            back_populates: None,
        }
    }

    pub fn collection(mut self) -> Self {
        self.uselist = true;
        self
    }

    pub fn viewonly(mut self) -> Self {
        self.viewonly = true;
        self
    }

    pub fn local_column(mut self, name: impl Into<String>) -> Self {
        self.local_columns.push(name.into());
        self
    }

    pub fn back_populates(mut self, key: impl Into<String>) -> Self {
        self.back_populates = Some(key.into());
        self
    }

    pub fn reverse_of(mut self, model: impl Into<String>, key: impl Into<String>) -> Self {
        self.reverse.push(RelationshipRef::new(model, key));
        self
    }
}

/// Operation parameter with an optional rendered default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Callable exposed by a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Operation {
    pub name: String,
    /// Parameters excluding the instance receiver
    #[serde(default)]
    pub params: Vec<Param>,
    /// Bound to instances (as opposed to class or static callables)
    #[serde(default = "default_true")]
    pub instance_bound: bool,
    /// Defined on the model itself rather than inherited
    #[serde(default = "default_true")]
    pub declared_locally: bool,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            instance_bound: true,
            declared_locally: true,
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn unbound(mut self) -> Self {
        self.instance_bound = false;
        self
    }

    pub fn inherited(mut self) -> Self {
        self.declared_locally = false;
        self
    }
}

/// A mapped model class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Model {
    /// Model name, used as the node identifier
    pub name: String,
    /// Primary table the model maps to
    pub table: String,
    /// Model this one inherits from
    #[serde(default)]
    pub parent: Option<String>,
    /// Mapped columns in declaration order
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Model {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            parent: None,
            attributes: Vec::new(),
            relationships: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Get an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Get a relationship by key
    pub fn relationship(&self, key: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.key == key)
    }

    /// Whether the attribute is declared on another table than the model's own
    pub fn is_inherited(&self, attribute: &Attribute) -> bool {
        attribute
            .table
            .as_deref()
            .is_some_and(|table| table != self.table)
    }
}

/// An ordered collection of models, as loaded from a descriptor file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelSet {
    #[serde(default)]
    pub models: Vec<Model>,
}

impl ModelSet {
    pub fn new(models: Vec<Model>) -> Self {
        Self { models }
    }

    /// Load a model set from a YAML or JSON file (chosen by extension)
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let set: ModelSet = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml_ng::from_str(&content)?
        };
        Ok(set.link_reverses())
    }

    /// Get a model by name
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Turn `back_populates` declarations into reverse links on both sides.
    ///
    /// If `A.r` back-populates `s` on its target `B`, then `A.r` records `B.s`
    /// as its reverse and `B.s` records `A.r`. Links already present are not
    /// duplicated, and declarations naming a missing relationship are ignored.
    pub fn link_reverses(mut self) -> Self {
        let mut links: Vec<(RelationshipRef, RelationshipRef)> = Vec::new();
        for model in &self.models {
            for rel in &model.relationships {
                let Some(other_key) = &rel.back_populates else {
                    continue;
                };
                let declared = self
                    .get(&rel.target)
                    .and_then(|target| target.relationship(other_key))
                    .is_some();
                if declared {
                    let this = RelationshipRef::new(&model.name, &rel.key);
                    let other = RelationshipRef::new(&rel.target, other_key);
                    links.push((this.clone(), other.clone()));
                    links.push((other, this));
                }
            }
        }

        for (from, to) in links {
            if let Some(rel) = self
                .models
                .iter_mut()
                .find(|m| m.name == from.model)
                .and_then(|m| m.relationships.iter_mut().find(|r| r.key == from.key))
            {
                if !rel.reverse.contains(&to) {
                    rel.reverse.push(to);
                }
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    pub fn into_models(self) -> Vec<Model> {
        self.models
    }
}
