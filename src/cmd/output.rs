//! Writing graphs to files, stdout or Graphviz.

use super::OutputArgs;
use crate::graph::{to_dot, to_json, Graph, OutputFormat};
use anyhow::{bail, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Extensions rendered through Graphviz instead of written as text
const RENDERED_EXTENSIONS: [&str; 3] = ["png", "svg", "pdf"];

/// Resolved output settings of a graph command
#[derive(Debug, Clone)]
pub struct OutputPlan {
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
    pub render: bool,
    pub quiet: bool,
}

impl OutputPlan {
    /// Resolve format and destination; `kind` names the default render file
    pub fn from_args(args: &OutputArgs, kind: &str) -> Result<Self> {
        let format = if args.json {
            OutputFormat::Json
        } else if let Some(ref f) = args.format {
            f.parse().map_err(|e| anyhow::anyhow!("{}", e))?
        } else if let Some(ref out) = args.output {
            out.extension()
                .and_then(|e| e.to_str())
                .and_then(OutputFormat::from_extension)
                .unwrap_or(OutputFormat::Dot)
        } else {
            OutputFormat::Dot
        };

        let renders_by_extension = args.output.as_deref().is_some_and(is_rendered_path);
        let render = args.render || renders_by_extension;
        if render && format == OutputFormat::Json {
            bail!("JSON output cannot be rendered with Graphviz");
        }

        let path = match (&args.output, render) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(default_render_path(kind)),
            (None, false) => None,
        };

        Ok(Self {
            format,
            path,
            render,
            quiet: args.quiet,
        })
    }

    /// Whether status lines go to stderr
    pub fn verbose(&self) -> bool {
        !self.quiet && !(self.format == OutputFormat::Json && self.path.is_none())
    }

    /// Write, print or render the graph
    pub fn emit(&self, graph: &Graph) -> Result<()> {
        if self.render {
            if let Some(ref path) = self.path {
                render_with_graphviz(&to_dot(graph), path)?;
                if self.verbose() {
                    eprintln!("Rendered to: {}", path.display());
                }
                return Ok(());
            }
        }

        let content = match self.format {
            OutputFormat::Dot => to_dot(graph),
            OutputFormat::Json => to_json(graph),
        };

        match self.path {
            Some(ref path) => {
                let mut file = File::create(path)?;
                file.write_all(content.as_bytes())?;
                if self.verbose() {
                    eprintln!("Graph written to: {}", path.display());
                }
            }
            None => print!("{}", content),
        }
        Ok(())
    }
}

fn is_rendered_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| RENDERED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// `<kind>_graph_YYYY-MM-DD HH:MM.png` in the current directory
pub fn default_render_path(kind: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M");
    PathBuf::from(format!("{}_graph_{}.png", kind, stamp))
}

/// Render DOT to PNG/SVG/PDF using Graphviz
pub fn render_with_graphviz(dot_source: &str, output_path: &Path) -> Result<()> {
    let ext = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png");

    let format_arg = format!("-T{}", ext);

    let mut child = Command::new("dot")
        .arg(&format_arg)
        .arg("-o")
        .arg(output_path)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "Graphviz 'dot' command not found. Install Graphviz or write a .dot file instead."
                )
            } else {
                anyhow::anyhow!("Failed to run dot: {}", e)
            }
        })?;

    if let Some(ref mut stdin) = child.stdin {
        stdin.write_all(dot_source.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        bail!("Graphviz dot command failed with status: {}", status);
    }

    Ok(())
}
