use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Canonical JSON, one report per source
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "cxmetrics")]
#[command(about = "Structural complexity metrics for C and C++", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to the nearest .cxmetrics.toml)
    #[arg(short, long, global = true, env = "CXMETRICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute metrics for source files or directories
    Analyze {
        /// Files or directories to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Override the long-method threshold
        #[arg(long)]
        long_method_threshold: Option<usize>,

        /// Count `&&`/`||` in conditions as decision points
        #[arg(long)]
        count_logical_operators: bool,
    },

    /// Golden-file regression checks
    Golden {
        #[command(subcommand)]
        action: GoldenCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoldenCommand {
    /// Compare every fixture in a directory against its golden artifact
    Check {
        /// Directory holding `<id>.c|cpp` and `<id>.golden.json`
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Regenerate golden artifacts from the current engine
    Bless {
        /// Directory holding fixture sources
        dir: PathBuf,
    },
}
