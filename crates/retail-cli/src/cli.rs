//! CLI argument definitions for the retail pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use retail_model::Entity;

#[derive(Parser)]
#[command(
    name = "retail-etl",
    version,
    about = "Retail data centralisation pipeline",
    long_about = "Extract retail datasets from their operational sources, clean them \n\
                  per entity, and load the results into the local analytical database \n\
                  as a star schema."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the pipeline: extract, clean, and load every entity.
    Run(RunArgs),

    /// List the entities the pipeline handles.
    Entities,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Pipeline configuration YAML (endpoints, object URLs, API key).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Credentials YAML for the operational source database.
    #[arg(
        long = "source-creds",
        value_name = "PATH",
        default_value = "db_creds.yaml"
    )]
    pub source_creds: PathBuf,

    /// Credentials YAML for the local analytical database.
    #[arg(
        long = "target-creds",
        value_name = "PATH",
        default_value = "db_creds_local.yaml"
    )]
    pub target_creds: PathBuf,

    /// Restrict the run to the named entities (repeatable).
    #[arg(long = "only", value_enum, value_name = "ENTITY")]
    pub only: Vec<EntityArg>,

    /// Clean without loading into the destination database.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EntityArg {
    Users,
    Cards,
    Stores,
    Products,
    Orders,
    Dates,
}

impl From<EntityArg> for Entity {
    fn from(value: EntityArg) -> Self {
        match value {
            EntityArg::Users => Entity::Users,
            EntityArg::Cards => Entity::Cards,
            EntityArg::Stores => Entity::Stores,
            EntityArg::Products => Entity::Products,
            EntityArg::Orders => Entity::Orders,
            EntityArg::Dates => Entity::Dates,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
