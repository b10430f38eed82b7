//! Node labels for models and tables.
//!
//! A [`Label`] is the structural content of a node: a header with the entity
//! name and a list of blocks (attributes, operations, columns, indexes).
//! [`Label::to_html`] turns it into a Graphviz HTML-like table.

use crate::config::GrapherOptions;
use crate::model::{Model, Operation};
use crate::schema::TableSchema;
use crate::style::Attributes;
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Rewrites displayed names without touching the source data
#[derive(Clone)]
pub struct NameMangler(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl NameMangler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Leave every name as it is
    pub fn identity() -> Self {
        Self::new(|name| name.to_string())
    }

    pub fn apply(&self, name: &str) -> String {
        (self.0)(name)
    }
}

impl Default for NameMangler {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for NameMangler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameMangler(..)")
    }
}

/// How a block's rows are laid out in the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BlockLayout {
    /// All rows in one cell, separated by line breaks
    Lines,
    /// One cell per row, so rows can carry ports
    Cells,
}

/// One row of a label block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LabelRow {
    pub text: String,
    /// Anchor for edges attaching to this row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl LabelRow {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            port: None,
        }
    }

    pub fn with_port(text: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            port: Some(port.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LabelBlock {
    pub layout: BlockLayout,
    pub rows: Vec<LabelRow>,
}

/// Structural content of a node
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Label {
    /// Entity name, after mangling
    pub title: String,
    /// Header cell attributes (bgcolor, color, fontsize, top_margin)
    pub header: Attributes,
    pub blocks: Vec<LabelBlock>,
}

impl Label {
    /// Every row text, block by block
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .flat_map(|b| b.rows.iter().map(|r| r.text.as_str()))
    }

    /// Render as a Graphviz HTML-like label body (without the outer `<>`)
    pub fn to_html(&self) -> String {
        let header = |key: &str| {
            self.header
                .get(key)
                .map(|v| escape_html(&v.to_string()))
                .unwrap_or_default()
        };

        let mut html = String::new();
        html.push_str(
            "<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLPADDING=\"1\" CELLSPACING=\"0\">",
        );
        html.push_str(&format!(
            "<TR><TD BGCOLOR=\"{}\" VALIGN=\"BOTTOM\">\
             <FONT POINT-SIZE=\"{}\"><BR ALIGN=\"LEFT\" /></FONT>\
             <FONT COLOR=\"{}\" POINT-SIZE=\"{}\"><B>{}</B></FONT>\
             </TD></TR>",
            header("bgcolor"),
            header("top_margin"),
            header("color"),
            header("fontsize"),
            escape_html(&self.title)
        ));

        for block in &self.blocks {
            match block.layout {
                BlockLayout::Lines => {
                    html.push_str("<TR><TD ALIGN=\"LEFT\" BALIGN=\"LEFT\">");
                    for row in &block.rows {
                        html.push_str(&escape_html(&row.text));
                        html.push_str("<BR/>");
                    }
                    html.push_str("</TD></TR>");
                }
                BlockLayout::Cells => {
                    for row in &block.rows {
                        match &row.port {
                            Some(port) => html.push_str(&format!(
                                "<TR><TD ALIGN=\"LEFT\" PORT=\"{}\">{}</TD></TR>",
                                escape_html(port),
                                escape_html(&row.text)
                            )),
                            None => html.push_str(&format!(
                                "<TR><TD ALIGN=\"LEFT\">{}</TD></TR>",
                                escape_html(&row.text)
                            )),
                        }
                    }
                }
            }
        }

        html.push_str("</TABLE>");
        html
    }
}

/// Builds node labels according to the grapher options
#[derive(Debug, Clone)]
pub struct LabelRenderer {
    show_attributes: bool,
    show_datatypes: bool,
    show_inherited: bool,
    show_operations: bool,
    show_indexes: bool,
    mangler: NameMangler,
    header: Attributes,
}

impl LabelRenderer {
    pub fn new(options: &GrapherOptions, header: Attributes) -> Self {
        Self {
            show_attributes: options.show_attributes,
            show_datatypes: options.show_datatypes,
            show_inherited: options.show_inherited,
            show_operations: options.show_operations,
            show_indexes: options.show_indexes,
            mangler: options.name_mangler.clone(),
            header,
        }
    }

    pub fn mangle(&self, name: &str) -> String {
        self.mangler.apply(name)
    }

    /// `name: type`, or just the name when datatypes are hidden
    pub fn column_label(&self, name: &str, type_name: &str) -> String {
        if self.show_datatypes {
            format!("{}: {}", self.mangle(name), self.mangle(type_name))
        } else {
            self.mangle(name)
        }
    }

    /// `name(a, b=default)` with a leading `*` for non-instance-bound operations
    pub fn operation_label(&self, operation: &Operation) -> String {
        let params: Vec<String> = operation
            .params
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{}={}", self.mangle(&p.name), default),
                None => self.mangle(&p.name),
            })
            .collect();
        let marker = if operation.instance_bound { "" } else { "*" };
        format!(
            "{}{}({})",
            marker,
            self.mangle(&operation.name),
            params.join(", ")
        )
    }

    pub fn model_label(&self, model: &Model) -> Label {
        let mut blocks = Vec::new();

        if self.show_attributes {
            let rows = model
                .attributes
                .iter()
                .filter(|a| self.show_inherited || !model.is_inherited(a))
                .map(|a| LabelRow::text(self.column_label(&a.name, &a.type_name)))
                .collect();
            blocks.push(LabelBlock {
                layout: BlockLayout::Lines,
                rows,
            });
        }

        if self.show_operations {
            let mut operations: Vec<&Operation> = model
                .operations
                .iter()
                .filter(|op| op.declared_locally)
                .collect();
            if !operations.is_empty() {
                operations.sort_by(|a, b| a.name.cmp(&b.name));
                blocks.push(LabelBlock {
                    layout: BlockLayout::Lines,
                    rows: operations
                        .into_iter()
                        .map(|op| LabelRow::text(self.operation_label(op)))
                        .collect(),
                });
            }
        }

        Label {
            title: self.mangle(&model.name),
            header: self.header.clone(),
            blocks,
        }
    }

    pub fn table_label(&self, table: &TableSchema) -> Label {
        let columns = table
            .columns
            .iter()
            .map(|c| LabelRow::with_port(self.column_label(&c.name, &c.type_name), &c.name))
            .collect();
        let mut blocks = vec![LabelBlock {
            layout: BlockLayout::Cells,
            rows: columns,
        }];

        if self.show_indexes {
            let mut rows = Vec::new();
            let primary = table.primary_key_names();
            if !primary.is_empty() {
                rows.push(LabelRow::text(self.index_label("PRIMARY", &primary)));
            }
            for index in &table.indexes {
                let kind = if index.is_unique { "UNIQUE" } else { "INDEX" };
                let columns: Vec<&str> = index.columns.iter().map(String::as_str).collect();
                rows.push(LabelRow::text(self.index_label(kind, &columns)));
            }
            if !rows.is_empty() {
                blocks.push(LabelBlock {
                    layout: BlockLayout::Cells,
                    rows,
                });
            }
        }

        Label {
            title: self.mangle(&table.name),
            header: self.header.clone(),
            blocks,
        }
    }

    fn index_label(&self, kind: &str, columns: &[&str]) -> String {
        let columns: Vec<String> = columns.iter().map(|c| self.mangle(c)).collect();
        format!("{} ({})", kind, columns.join(", "))
    }
}

/// Escape a string for use in DOT HTML labels
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
