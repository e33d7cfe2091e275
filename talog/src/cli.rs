// talog/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "talog")]
#[command(about = "Declarative data catalog: recipes, hierarchical parameters, validators", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory (holds talog.yaml)
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Log level; falls back to TALOG_LOG, then warn
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📋 Lists dataset names
    List,

    /// 🔍 Shows each dataset's callable and validators
    Inspect,

    /// 📖 Reads a dataset (validators run first)
    Read {
        name: String,

        /// Fetch even if validators would fail
        #[arg(long)]
        skip_validation: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// ✅ Runs a dataset's validators without fetching it
    Validate { name: String },

    /// ⚙️  Prints the merged parameter set as YAML
    Params {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
