//! Tables command: diagram of the tables defined in SQL DDL.

use super::glob_util::expand_file_pattern;
use super::options::resolve_options;
use super::output::OutputPlan;
use super::{DisplayArgs, OutputArgs};
use crate::grapher::TableGrapher;
use crate::input::read_source;
use crate::schema::SchemaBuilder;
use anyhow::Result;
use std::path::PathBuf;

/// Run the tables command
pub fn run(file: PathBuf, display: DisplayArgs, output: OutputArgs) -> Result<()> {
    let plan = OutputPlan::from_args(&output, "table")?;
    let expanded = expand_file_pattern(&file)?;

    if plan.verbose() {
        if expanded.pattern_was_glob {
            eprintln!(
                "Generating table graph: {} ({} files)",
                file.display(),
                expanded.files.len()
            );
        } else {
            eprintln!("Generating table graph: {}", file.display());
        }
    }

    // Later files may alter or index tables created by earlier ones
    let mut builder = SchemaBuilder::new();
    for path in &expanded.files {
        let sql = read_source(path)?;
        builder.parse_script(&sql);
    }
    let tables = builder.build().into_tables();

    if tables.is_empty() {
        if plan.verbose() {
            eprintln!("No tables found in the input.");
        }
        return Ok(());
    }

    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    let options = resolve_options(&display, &names)?;
    let graph = TableGrapher::new(options).graph(&tables);

    plan.emit(&graph)?;

    if plan.verbose() {
        let total_columns: usize = tables.iter().map(|t| t.columns.len()).sum();
        eprintln!(
            "\nGraph: {} nodes, {} edges ({} columns)",
            graph.node_count(),
            graph.edge_count(),
            total_columns
        );
    }

    Ok(())
}
