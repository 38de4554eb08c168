//! Generate command.

use std::path::Path;

use tracing::info;

use super::{fail, load_definition};
use crate::cli::EXIT_SUCCESS;
use crate::terminal;

/// Handle the `generate` command.
pub fn cmd_generate(definition: &Path, output: Option<&Path>, silent: bool) -> i32 {
    info!(definition = %definition.display(), "generating");

    let mut def = match load_definition(definition) {
        Ok(def) => def,
        Err(code) => return code,
    };
    if let Some(dir) = output {
        def = def.with_dir(dir);
    }

    let project = def.project();
    match project.write_all() {
        Ok(files) => {
            if !silent {
                terminal::success(&format!(
                    "Generated {} runs into {}",
                    def.benchmark.runs.len(),
                    project.output_dir().display()
                ));
                terminal::path_output(&files.graph);
                terminal::path_output(&files.makefile);
            }
            EXIT_SUCCESS
        }
        Err(e) => fail("generation failed", &e.into()),
    }
}
