mod glob_util;
mod models;
mod options;
mod output;
mod schema;
mod tables;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-graphs")]
#[command(author = "Helge Sverre <helge.sverre@gmail.com>")]
#[command(version)]
#[command(about = "Draw ORM models and SQL schemas as Graphviz diagrams", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Display options shared by the graph commands
#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// YAML config file (display flags, style overrides, renames)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Layout direction: lr or tb
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Hide attribute and column types
    #[arg(long)]
    pub no_datatypes: bool,

    /// Hide attributes of models (names only)
    #[arg(long)]
    pub no_attributes: bool,

    /// Hide attributes declared on a parent model's table
    #[arg(long)]
    pub no_inherited: bool,

    /// Hide the index block of tables
    #[arg(long)]
    pub no_indexes: bool,

    /// List locally declared operations of models
    #[arg(long)]
    pub operations: bool,

    /// Label required to-one relationships with `1`
    #[arg(long)]
    pub multiplicity_one: bool,

    /// Entities to leave out (comma-separated, supports globs like 'tmp_*')
    #[arg(long)]
    pub skip: Option<String>,
}

/// Output options shared by the graph commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output file (.dot, .json, .png, .svg, .pdf); stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: dot or json (detected from the output extension)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Render with Graphviz; without -o the file is named after the current time
    #[arg(long)]
    pub render: bool,

    /// Output results as JSON (same as --format json)
    #[arg(long, conflicts_with = "format")]
    pub json: bool,

    /// Suppress status messages
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw a diagram of ORM models described in a YAML or JSON file
    Models {
        /// Model descriptor file (.yaml, .yml or .json)
        file: PathBuf,

        #[command(flatten)]
        display: DisplayArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Draw a diagram of the tables defined in SQL DDL
    Tables {
        /// Input SQL file or glob pattern (e.g., schema/*.sql)
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        #[command(flatten)]
        display: DisplayArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print JSON schemas of the graph output, model files and config files
    Schema {
        /// Schema to print (graph, models, config); all when omitted
        name: Option<String>,

        /// Write each schema to <dir>/<name>.schema.json instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// List available schema names
        #[arg(long)]
        list: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Models {
            file,
            display,
            output,
        } => models::run(file, display, output),
        Commands::Tables {
            file,
            display,
            output,
        } => tables::run(file, display, output),
        Commands::Schema {
            name,
            output_dir,
            list,
        } => schema::run(name, output_dir, list),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "sql-graphs", &mut io::stdout());
            Ok(())
        }
    }
}
