//! Timing Tree CLI
//!
//! Merges timing snapshots recorded by a driver and its workers and
//! prints the hierarchical timings and distributed operations tables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use timing_tree::commands::{
    display_schema, display_version, execute_merge, execute_report, validate_args, validate_snapshot_file,
    MergeArgs, ReportArgs,
};

/// Timing Tree - hierarchical timing reports for driver/worker computations
#[derive(Parser, Debug)]
#[command(name = "timing-tree")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge snapshots and print the timing report
    Report {
        /// Snapshot JSON file (repeat for each contributor)
        #[arg(short, long = "snapshot", required = true)]
        snapshots: Vec<PathBuf>,

        /// Stage metadata JSON file
        #[arg(long)]
        stages: Option<PathBuf>,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report configuration TOML
        #[arg(short, long, env = "TIMING_TREE_CONFIG")]
        config: Option<PathBuf>,

        /// Session name shown in the report
        #[arg(long, default_value = "timing-tree")]
        session: String,

        /// Do not print tables to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Merge snapshots into a single snapshot file
    Merge {
        /// Snapshot JSON file (repeat for each contributor)
        #[arg(short, long = "snapshot", required = true)]
        snapshots: Vec<PathBuf>,

        /// Output path for the merged snapshot
        #[arg(short, long, default_value = "merged.json")]
        output: PathBuf,

        /// Contributor name written into the merged snapshot
        #[arg(long, default_value = "merged")]
        contributor: String,
    },

    /// Validate a snapshot JSON file
    Validate {
        /// Path to snapshot JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            snapshots,
            stages,
            output,
            config,
            session,
            quiet,
        } => {
            let args = ReportArgs {
                snapshots,
                stages,
                output_json: output,
                config,
                session,
                quiet,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(args)?;
        }

        Commands::Merge {
            snapshots,
            output,
            contributor,
        } => {
            execute_merge(MergeArgs {
                snapshots,
                output,
                contributor,
            })?;
        }

        Commands::Validate { file } => {
            validate_snapshot_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
