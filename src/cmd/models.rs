//! Models command: diagram of ORM model descriptors.

use super::options::resolve_options;
use super::output::OutputPlan;
use super::{DisplayArgs, OutputArgs};
use crate::grapher::ModelGrapher;
use crate::model::ModelSet;
use anyhow::{bail, Result};
use std::path::PathBuf;

/// Run the models command
pub fn run(file: PathBuf, display: DisplayArgs, output: OutputArgs) -> Result<()> {
    let plan = OutputPlan::from_args(&output, "model")?;

    if !file.exists() {
        bail!("input file does not exist: {}", file.display());
    }

    if plan.verbose() {
        eprintln!("Generating model graph: {}", file.display());
    }

    let set = ModelSet::load(&file)
        .map_err(|e| anyhow::anyhow!("failed to load models from {}: {}", file.display(), e))?;

    if set.is_empty() {
        if plan.verbose() {
            eprintln!("No models found in the file.");
        }
        return Ok(());
    }

    let names: Vec<&str> = set.iter().map(|m| m.name.as_str()).collect();
    let options = resolve_options(&display, &names)?;
    let graph = ModelGrapher::new(options).graph(&set.models);

    plan.emit(&graph)?;

    if plan.verbose() {
        eprintln!(
            "\nGraph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
    }

    Ok(())
}
