//! Render command: print a generated file without writing it.

use std::io::{self, Write};
use std::path::Path;

use super::{fail, load_definition};
use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};

/// Handle the `render` command.
pub fn cmd_render(definition: &Path, makefile: bool, graph: bool) -> i32 {
    let def = match load_definition(definition) {
        Ok(def) => def,
        Err(code) => return code,
    };

    let project = def.project();
    let rendered = if makefile {
        project.render_makefile()
    } else {
        debug_assert!(graph);
        project.render_graph()
    };

    match rendered {
        Ok(text) => {
            let mut stdout = io::stdout().lock();
            if stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()).is_err() {
                return EXIT_FAILURE;
            }
            EXIT_SUCCESS
        }
        Err(e) => fail("rendering failed", &e.into()),
    }
}
