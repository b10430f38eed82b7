//! Model graphs: one node per model, association and inheritance edges.

use super::skip_set;
use crate::config::GrapherOptions;
use crate::graph::Graph;
use crate::label::LabelRenderer;
use crate::model::{Model, Relationship};
use crate::relation::{format_multiplicity, RelationEdge, RelationshipResolver, Side};
use crate::style::{overlay, AttrValue, Attributes, Style};
use ahash::AHashSet;

/// Builds model graphs
#[derive(Debug, Clone)]
pub struct ModelGrapher {
    options: GrapherOptions,
    style: Style,
    renderer: LabelRenderer,
}

impl ModelGrapher {
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

    /// Build the graph of `models`.
    ///
    /// Relationships and inheritance links to models outside the slice (or
    /// skipped) are dropped.
    pub fn graph(&self, models: &[Model]) -> Graph {
        let skip = skip_set(&self.options.skip);
        let included: Vec<&Model> = models
            .iter()
            .filter(|m| !skip.contains(&m.name.to_lowercase()))
            .collect();
        let names: AHashSet<&str> = included.iter().map(|m| m.name.as_str()).collect();

        let mut attributes = Attributes::new();
        attributes.insert("mclimit".to_string(), AttrValue::Int(1000));
        let mut graph = Graph::new(overlay(&attributes, &self.options.graph_options));

        for model in &included {
            graph.add_node(
                model.name.as_str(),
                self.renderer.model_label(model),
                self.style.node.clone(),
            );
        }

        for model in &included {
            if let Some(parent) = model.parent.as_deref().filter(|p| names.contains(p)) {
                graph.add_edge(parent, model.name.as_str(), self.style.inheritance.clone());
            }
        }

        let resolver = RelationshipResolver::new(&included);
        for edge in resolver.resolve(&included) {
            let (source, target) = edge.endpoints();
            graph.add_edge(source, target, self.relation_attributes(&edge));
        }

        graph
    }

    fn relation_attributes(&self, edge: &RelationEdge<'_>) -> Attributes {
        let mut attributes = if edge.is_viewonly() {
            overlay(&self.style.relationship, &self.style.relationship_viewonly)
        } else {
            self.style.relationship.clone()
        };

        match edge {
            RelationEdge::Pair { forward, reverse } => {
                attributes.insert("headlabel".to_string(), self.side_label(forward).into());
                attributes.insert("taillabel".to_string(), self.side_label(reverse).into());
                attributes.insert("dir".to_string(), "both".into());
            }
            RelationEdge::Single(side) => {
                attributes.insert("headlabel".to_string(), self.side_label(side).into());
            }
        }
        attributes
    }

    fn side_label(&self, side: &Side<'_>) -> String {
        self.relationship_label(side.owner, side.relationship)
    }

    /// Edge-end label: multiplicity prefix and key, padded with two spaces
    pub fn relationship_label(&self, owner: &Model, relationship: &Relationship) -> String {
        format!(
            "  {}{}  ",
            format_multiplicity(owner, relationship, self.options.show_multiplicity_one),
            self.renderer.mangle(&relationship.key)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;
    use crate::style::{attrs, StyleOverrides, RELATIONSHIP_VIEWONLY};

    fn owner_and_pet() -> Vec<Model> {
        vec![
            Model::new("Owner", "owner")
                .with_attribute(Attribute::new("id", "Integer").not_null())
                .with_relationship(
                    Relationship::new("pets", "Pet")
                        .collection()
                        .reverse_of("Pet", "owner"),
                ),
            Model::new("Pet", "pet")
                .with_attribute(Attribute::new("id", "Integer").not_null())
                .with_attribute(Attribute::new("owner_id", "Integer"))
                .with_relationship(
                    Relationship::new("owner", "Owner")
                        .local_column("owner_id")
                        .reverse_of("Owner", "pets"),
                ),
        ]
    }

    #[test]
    fn test_pair_edge_labels() {
        let graph = ModelGrapher::new(GrapherOptions::default()).graph(&owner_and_pet());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let edge = &graph.edges()[0];
        assert_eq!((edge.source(), edge.target()), ("Owner", "Pet"));
        assert_eq!(edge.text("headlabel"), Some("  +pets  "));
        assert_eq!(edge.text("taillabel"), Some("  0..1 owner  "));
        assert_eq!(edge.text("dir"), Some("both"));
        assert_eq!(edge.text("arrowhead"), Some("vee"));
    }

    #[test]
    fn test_graph_attributes() {
        let mut options = GrapherOptions::default();
        options.graph_options = attrs([("rankdir", "LR".into())]);
        let graph = ModelGrapher::new(options).graph(&owner_and_pet());

        assert_eq!(graph.attributes().get("mclimit"), Some(&AttrValue::Int(1000)));
        assert_eq!(graph.attributes().get("rankdir"), Some(&AttrValue::from("LR")));
    }

    #[test]
    fn test_nodes_use_node_style() {
        let graph = ModelGrapher::new(GrapherOptions::default()).graph(&owner_and_pet());
        let node = graph.node("Pet").unwrap();
        assert_eq!(node.attributes().get("shape"), Some(&AttrValue::from("plaintext")));
        assert_eq!(node.label().title, "Pet");
    }

    #[test]
    fn test_viewonly_overlay_from_overrides() {
        let mut style = StyleOverrides::new();
        style.insert(
            RELATIONSHIP_VIEWONLY.to_string(),
            attrs([("color", "grey".into())]),
        );
        let options = GrapherOptions {
            style,
            ..Default::default()
        };
        let models = vec![
            Model::new("A", "a").with_relationship(Relationship::new("b", "B").viewonly()),
            Model::new("B", "b"),
        ];

        let graph = ModelGrapher::new(options).graph(&models);
        let edge = &graph.edges()[0];
        assert_eq!(edge.text("style"), Some("dashed"));
        assert_eq!(edge.text("color"), Some("grey"));
        assert!(edge.attr("taillabel").is_none());
    }

    #[test]
    fn test_skipped_models_drop_their_edges() {
        let options = GrapherOptions {
            skip: vec!["pet".to_string()],
            ..Default::default()
        };
        let graph = ModelGrapher::new(options).graph(&owner_and_pet());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_mangled_relationship_label() {
        let options = GrapherOptions {
            name_mangler: crate::label::NameMangler::new(|s| s.replace('_', " ")),
            ..Default::default()
        };
        let grapher = ModelGrapher::new(options);
        let owner = Model::new("Child", "child").with_attribute(Attribute::new("toy_id", "Integer"));
        let rel = Relationship::new("favourite_toy", "Toy").local_column("toy_id");
        assert_eq!(
            grapher.relationship_label(&owner, &rel),
            "  0..1 favourite toy  "
        );
    }
}
