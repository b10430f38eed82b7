//! Relationship resolution between models.
//!
//! Reciprocal relationships (each recorded as the other's single reverse) are
//! collapsed into one two-sided edge. Everything else becomes a one-sided edge.
//! Relationships to models outside the supplied set are dropped.

use crate::model::{Model, Relationship, RelationshipRef};
use ahash::{AHashMap, AHashSet};

/// A relationship together with the model declaring it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Side<'a> {
    pub owner: &'a Model,
    pub relationship: &'a Relationship,
}

impl<'a> Side<'a> {
    pub fn reference(&self) -> RelationshipRef {
        RelationshipRef::new(&self.owner.name, &self.relationship.key)
    }
}

/// An association edge between two models
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelationEdge<'a> {
    /// Reciprocal pair; `forward` is the side encountered first.
    ///
    /// Only formed when each side records the other as its single reverse.
    Pair { forward: Side<'a>, reverse: Side<'a> },
    /// Relationship without a usable reverse
    Single(Side<'a>),
}

impl<'a> RelationEdge<'a> {
    /// Names of the models at the tail and head of the edge
    pub fn endpoints(&self) -> (&'a str, &'a str) {
        match self {
            RelationEdge::Pair { forward, reverse } => {
                (forward.owner.name.as_str(), reverse.owner.name.as_str())
            }
            RelationEdge::Single(side) => (
                side.owner.name.as_str(),
                side.relationship.target.as_str(),
            ),
        }
    }

    /// Whether every side of the edge is view-only
    pub fn is_viewonly(&self) -> bool {
        match self {
            RelationEdge::Pair { forward, reverse } => {
                forward.relationship.viewonly && reverse.relationship.viewonly
            }
            RelationEdge::Single(side) => side.relationship.viewonly,
        }
    }
}

/// Order-independent identity of an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum RelationKey {
    Pair(RelationshipRef, RelationshipRef),
    Single(RelationshipRef),
}

impl RelationKey {
    fn pair(a: RelationshipRef, b: RelationshipRef) -> Self {
        if a <= b {
            RelationKey::Pair(a, b)
        } else {
            RelationKey::Pair(b, a)
        }
    }
}

/// Deduplicates relationships of a model set into edges
pub struct RelationshipResolver<'a> {
    models: AHashMap<&'a str, &'a Model>,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(models: &[&'a Model]) -> Self {
        Self {
            models: models.iter().map(|m| (m.name.as_str(), *m)).collect(),
        }
    }

    /// Look up a relationship of a model in the set
    pub fn side(&self, reference: &RelationshipRef) -> Option<Side<'a>> {
        let owner = *self.models.get(reference.model.as_str())?;
        let relationship = owner.relationship(&reference.key)?;
        Some(Side {
            owner,
            relationship,
        })
    }

    /// Resolve the relationships of `models` into edges, in first-encounter order
    pub fn resolve(&self, models: &[&'a Model]) -> Vec<RelationEdge<'a>> {
        let mut seen: AHashSet<RelationKey> = AHashSet::new();
        let mut edges = Vec::new();

        for &owner in models {
            for relationship in &owner.relationships {
                if !self.models.contains_key(relationship.target.as_str()) {
                    continue;
                }
                let forward = Side {
                    owner,
                    relationship,
                };

                let reverse = match relationship.reverse.as_slice() {
                    [only] => self.side(only).filter(|other| {
                        other.relationship.reverse.as_slice() == [forward.reference()]
                    }),
                    _ => None,
                };

                let (key, edge) = match reverse {
                    Some(reverse) => (
                        RelationKey::pair(forward.reference(), reverse.reference()),
                        RelationEdge::Pair { forward, reverse },
                    ),
                    None => (
                        RelationKey::Single(forward.reference()),
                        RelationEdge::Single(forward),
                    ),
                };
                if seen.insert(key) {
                    edges.push(edge);
                }
            }
        }

        edges
    }
}

/// Cardinality prefix for a relationship label: `+`, `0..1 `, `1 ` or nothing
pub fn format_multiplicity(
    owner: &Model,
    relationship: &Relationship,
    show_multiplicity_one: bool,
) -> &'static str {
    if relationship.uselist {
        return "+";
    }
    let nullable = relationship
        .local_columns
        .iter()
        .filter_map(|name| owner.attribute(name))
        .any(|a| a.nullable);
    if nullable {
        "0..1 "
    } else if show_multiplicity_one {
        "1 "
    } else {
        ""
    }
}
