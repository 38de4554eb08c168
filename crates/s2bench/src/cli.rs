//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "s2bench")]
#[command(about = "Benchmark scaffolding generator - emits a Makefile and a pgfplots graph")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (sets RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default tracing directive for the selected verbosity.
    pub const fn log_directive(&self) -> &'static str {
        if self.verbose {
            "s2bench=debug"
        } else if self.silent {
            "s2bench=error"
        } else {
            "s2bench=info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write graph.tex and Makefile for a benchmark definition
    Generate {
        /// Benchmark definition (TOML)
        #[arg(value_name = "DEF")]
        definition: PathBuf,

        /// Output directory (overrides `dir` in the definition)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the runs of a benchmark definition and their recipes
    Show {
        /// Benchmark definition (TOML)
        #[arg(value_name = "DEF")]
        definition: PathBuf,
    },

    /// Print one generated file to stdout without writing anything
    #[command(group(ArgGroup::new("file").required(true).args(["makefile", "graph"])))]
    Render {
        /// Benchmark definition (TOML)
        #[arg(value_name = "DEF")]
        definition: PathBuf,

        /// Print the Makefile
        #[arg(long)]
        makefile: bool,

        /// Print graph.tex
        #[arg(long)]
        graph: bool,
    },
}
