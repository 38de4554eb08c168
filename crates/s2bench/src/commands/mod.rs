//! Command implementations.
//!
//! Each submodule handles a single CLI command.

mod generate;
mod render;
mod show;

use std::path::Path;

use s2bench::Definition;
use tracing::error;

use crate::cli::{Cli, Commands, EXIT_FAILURE};
use crate::terminal;

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Generate { definition, output } => {
            generate::cmd_generate(definition, output.as_deref(), cli.silent)
        }
        Commands::Show { definition } => show::cmd_show(definition),
        Commands::Render {
            definition,
            makefile,
            graph,
        } => render::cmd_render(definition, *makefile, *graph),
    }
}

/// Load a definition, reporting failures.
fn load_definition(path: &Path) -> Result<Definition, i32> {
    Definition::load(path).map_err(|e| fail("failed to load benchmark definition", &e))
}

/// Report `err` and return the failure exit code.
fn fail(context: &str, err: &s2bench::Error) -> i32 {
    error!(error = %err, "{context}");
    terminal::error(&format!("{context}: {err}"));
    EXIT_FAILURE
}
