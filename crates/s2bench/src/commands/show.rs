//! Show command: summarize runs, plots and recipes.

use std::path::Path;

use s2bench::{BuildPlan, PlotTarget, StepRenderer};
use tracing::debug;

use super::{fail, load_definition};
use crate::cli::EXIT_SUCCESS;
use crate::terminal::{self, Alignment, Table};

/// Handle the `show` command.
pub fn cmd_show(definition: &Path) -> i32 {
    let def = match load_definition(definition) {
        Ok(def) => def,
        Err(code) => return code,
    };
    let benchmark = &def.benchmark;

    for name in benchmark.duplicate_run_names() {
        terminal::warning(&format!("duplicate run name: {name}"));
    }

    let plan = match BuildPlan::new(benchmark) {
        Ok(plan) => plan,
        Err(e) => return fail("invalid benchmark definition", &e.into()),
    };
    debug!(runs = plan.runs.len(), plots = plan.plots.len(), "showing plan");

    terminal::info(&format!(
        "{} -> {}",
        benchmark.build.main,
        benchmark.dir.display()
    ));

    let renderer = StepRenderer::new(
        &def.toolchain,
        benchmark.build.instrument,
        &benchmark.build.run_params,
    );

    let mut runs = Table::new(&["#", "run", "stem", "instrument", "steps", "binaries"])
        .with_alignments(vec![
            Alignment::Right,
            Alignment::Left,
            Alignment::Left,
            Alignment::Left,
            Alignment::Right,
            Alignment::Left,
        ]);
    for target in &plan.runs {
        runs.add_row(vec![
            target.index.to_string(),
            target.run.name.clone(),
            target.stem.clone(),
            target
                .run
                .effective_instrument(benchmark.build.instrument)
                .to_string(),
            target.run.effective_steps().len().to_string(),
            target.binaries().join(" "),
        ]);
    }
    runs.print();

    if plan.uses_plots() {
        println!();
        let mut plots = Table::new(&["#", "plot", "side", "file"]).with_alignments(vec![
            Alignment::Right,
            Alignment::Left,
            Alignment::Left,
            Alignment::Left,
        ]);
        for (j, target) in plan.plots.iter().enumerate() {
            let name = match target {
                PlotTarget::Series { plot, .. } => plot.name.clone(),
                PlotTarget::Stub { .. } => "(placeholder)".to_string(),
            };
            plots.add_row(vec![
                j.to_string(),
                name,
                target.side().to_string(),
                target.tex_file().unwrap_or_default(),
            ]);
        }
        plots.print();
    }

    for target in &plan.runs {
        println!("\n{}:", target.tex_file());
        println!("{}", renderer.render_recipe(target));
    }

    EXIT_SUCCESS
}
