//! Makefile generation.
//!
//! Per run: a compile rule for `<stem>.out` (plus one per step with its own
//! compile parameters) and a rule running the steps into `<stem>.tex`.
//! Per plot series: a rule aggregating captured run output into
//! `plot<j>_<name>.tex`. Everything feeds `bench.pdf`.

use s2bench_model::Aggregate;

use crate::config::Toolchain;
use crate::plan::{BuildPlan, PlotSource, PlotTarget, RunTarget};
use crate::steps::StepRenderer;

fn gen_header(plan: &BuildPlan<'_>, toolchain: &Toolchain) -> String {
    let build = &plan.benchmark.build;
    let mut s = format!(
        "CC = {cc}\nCFLAGS = {cflags}\nCINCLUDES = {includes}\nCPARAMS = -DFRAME_COUNT={frames} {params}\n",
        cc = toolchain.compiler,
        cflags = toolchain.cflags,
        includes = toolchain.includes,
        frames = build.frames,
        params = build.compile_params,
    );
    if !build.deps.is_empty() {
        s.push_str(&format!("DEPS = {}\n", build.deps.join(" ")));
    }
    s.push_str("\ndefault: bench.pdf\n\n");
    s
}

fn gen_compile_rule(target: &str, main: &str, compile_params: &str) -> String {
    format!(
        "{target}: {main} $(DEPS)\n\t$(CC) -MMD -o $@ $< $(CFLAGS) $(CINCLUDES) $(CPARAMS) {compile_params}\n\n"
    )
}

fn gen_run_rules(target: &RunTarget<'_>, plan: &BuildPlan<'_>, renderer: &StepRenderer<'_>) -> String {
    let build = &plan.benchmark.build;
    let run = target.run;

    let mut s = String::new();
    if target.base_binary {
        s.push_str(&gen_compile_rule(&target.binary(), &build.main, &run.compile_params));
    }
    for step in &target.step_binaries {
        s.push_str(&gen_compile_rule(&step.binary(), &build.main, step.compile_params));
    }
    let prerequisites = target.binaries();

    let tex_params = if run.tex_params.is_empty() {
        &build.tex_params
    } else {
        &run.tex_params
    };
    let capture = if target.captured {
        format!(" | tee {}", target.data_file())
    } else {
        String::new()
    };

    s.push_str(&format!(
        "{tex}: {prerequisites}\n{steps}{capture} | {bench2tex} {tex_params} > {tex}\n\n",
        tex = target.tex_file(),
        prerequisites = prerequisites.join(" "),
        steps = renderer.render_recipe(target),
        bench2tex = renderer.filters().bench2tex,
    ));
    s
}

fn render_source(source: PlotSource, plan: &BuildPlan<'_>, toolchain: &Toolchain) -> String {
    let data = plan.runs[source.run].data_file();
    match source.aggregate.flag() {
        Some(flag) => format!("{} {flag} {data}", toolchain.filters.bench2agg),
        None => {
            debug_assert_eq!(source.aggregate, Aggregate::Raw);
            format!("cat {data}")
        }
    }
}

fn gen_plot_rule(target: &PlotTarget<'_>, plan: &BuildPlan<'_>, toolchain: &Toolchain) -> String {
    let PlotTarget::Series {
        plot,
        stem,
        sources,
    } = target
    else {
        return String::new();
    };

    // Data files are byproducts of the run .tex rules.
    let mut prerequisites: Vec<String> = Vec::new();
    for source in sources {
        let tex = plan.runs[source.run].tex_file();
        if !prerequisites.contains(&tex) {
            prerequisites.push(tex);
        }
    }

    let commands = if sources.is_empty() {
        "true".to_string()
    } else {
        sources
            .iter()
            .map(|source| render_source(*source, plan, toolchain))
            .collect::<Vec<_>>()
            .join("; ")
    };

    format!(
        "{stem}.tex: {prerequisites}\n\t({commands}) | {bench2tex} {tex_params} > {stem}.tex\n\n",
        prerequisites = prerequisites.join(" "),
        bench2tex = toolchain.filters.bench2tex,
        tex_params = plot.tex_params,
    )
}

fn gen_footer(plan: &BuildPlan<'_>, toolchain: &Toolchain) -> String {
    let texs = plan.tex_files().join(" ");
    let dats = if plan.runs.iter().any(|r| r.captured) {
        "*.dat "
    } else {
        ""
    };

    format!(
        "-include *.d

bench.pdf: graph.tex {texs}
\t{latex} --jobname=bench graph.tex

clean:
\trm -rf bench.pdf *.out *.d *.log *.aux {dats}{texs}

.PHONY: default run clean
",
        latex = toolchain.latex,
    )
}

/// Render the complete Makefile.
pub fn gen_makefile(plan: &BuildPlan<'_>, toolchain: &Toolchain) -> String {
    let build = &plan.benchmark.build;
    let renderer = StepRenderer::new(toolchain, build.instrument, &build.run_params);

    let mut content = gen_header(plan, toolchain);
    for target in &plan.runs {
        content.push_str(&gen_run_rules(target, plan, &renderer));
    }
    for target in &plan.plots {
        content.push_str(&gen_plot_rule(target, plan, toolchain));
    }
    content.push_str(&gen_footer(plan, toolchain));
    content
}
