//! Build plan: every generated filename and cross-reference, resolved once.
//!
//! Both the graph and the Makefile are rendered from the same plan so the
//! `\input` directives and the Makefile targets cannot drift apart.

use s2bench_model::{Aggregate, Benchmark, Plot, PlotEntry, Run, Side};
use tracing::debug;

use crate::error::{EmitError, Result};

/// Binary built for a step with its own compile parameters.
///
/// The step's parameters replace the run's for this binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepBinary<'a> {
    pub step: usize,
    pub stem: String,
    pub compile_params: &'a str,
}

impl StepBinary<'_> {
    pub fn binary(&self) -> String {
        format!("{}.out", self.stem)
    }
}

/// Targets produced for one run.
#[derive(Clone, Debug)]
pub struct RunTarget<'a> {
    pub index: usize,
    pub run: &'a Run,
    pub stem: String,
    pub step_binaries: Vec<StepBinary<'a>>,
    /// Some step executes `<stem>.out`, so it gets a compile rule.
    pub base_binary: bool,
    /// Raw output is kept in `<stem>.dat` for plot series.
    pub captured: bool,
}

impl RunTarget<'_> {
    pub fn binary(&self) -> String {
        format!("{}.out", self.stem)
    }

    pub fn tex_file(&self) -> String {
        format!("{}.tex", self.stem)
    }

    pub fn data_file(&self) -> String {
        format!("{}.dat", self.stem)
    }

    /// Every binary the steps execute, base binary first.
    pub fn binaries(&self) -> Vec<String> {
        let mut binaries = Vec::with_capacity(self.step_binaries.len() + 1);
        if self.base_binary {
            binaries.push(self.binary());
        }
        binaries.extend(self.step_binaries.iter().map(StepBinary::binary));
        binaries
    }

    /// Binary executed by step `step`.
    pub fn binary_for_step(&self, step: usize) -> String {
        self.step_binaries
            .iter()
            .find(|b| b.step == step)
            .map_or_else(|| self.binary(), StepBinary::binary)
    }
}

/// One run contribution to a plot series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotSource {
    pub run: usize,
    pub aggregate: Aggregate,
}

/// Resolved plot list entry.
#[derive(Clone, Debug)]
pub enum PlotTarget<'a> {
    Series {
        plot: &'a Plot,
        stem: String,
        sources: Vec<PlotSource>,
    },
    Stub {
        side: Side,
    },
}

impl PlotTarget<'_> {
    pub fn tex_file(&self) -> Option<String> {
        match self {
            Self::Series { stem, .. } => Some(format!("{stem}.tex")),
            Self::Stub { .. } => None,
        }
    }

    pub const fn side(&self) -> Side {
        match self {
            Self::Series { plot, .. } => plot.side,
            Self::Stub { side } => *side,
        }
    }
}

/// Resolved benchmark.
#[derive(Clone, Debug)]
pub struct BuildPlan<'a> {
    pub benchmark: &'a Benchmark,
    pub runs: Vec<RunTarget<'a>>,
    pub plots: Vec<PlotTarget<'a>>,
}

impl<'a> BuildPlan<'a> {
    /// Resolve run targets and plot references.
    ///
    /// # Errors
    ///
    /// Returns an error if a plot names a run that doesn't exist or that
    /// several runs share.
    pub fn new(benchmark: &'a Benchmark) -> Result<Self> {
        let mut runs: Vec<RunTarget<'a>> = benchmark
            .runs
            .iter()
            .enumerate()
            .map(|(index, run)| RunTarget {
                index,
                run,
                stem: run.stem(index),
                step_binaries: run
                    .steps
                    .iter()
                    .enumerate()
                    .filter_map(|(step, s)| {
                        s.compile_params.as_deref().map(|compile_params| StepBinary {
                            step,
                            stem: run.step_stem(index, step),
                            compile_params,
                        })
                    })
                    .collect(),
                base_binary: run.steps.is_empty()
                    || run.steps.iter().any(|step| step.compile_params.is_none()),
                captured: false,
            })
            .collect();

        let mut plots = Vec::with_capacity(benchmark.plots.len());
        for (index, entry) in benchmark.plots.iter().enumerate() {
            let target = match entry {
                PlotEntry::Stub(stub) => PlotTarget::Stub { side: stub.side },
                PlotEntry::Series(plot) => {
                    let mut sources = Vec::new();
                    for plot_run in &plot.runs {
                        let run = find_run(benchmark, plot, &plot_run.run)?;
                        runs[run].captured = true;
                        sources.extend(
                            plot_run
                                .aggregates()
                                .into_iter()
                                .map(|aggregate| PlotSource { run, aggregate }),
                        );
                    }
                    debug!(plot = %plot.name, sources = sources.len(), "resolved plot");
                    PlotTarget::Series {
                        plot,
                        stem: plot.stem(index),
                        sources,
                    }
                }
            };
            plots.push(target);
        }

        Ok(Self {
            benchmark,
            runs,
            plots,
        })
    }

    /// Whether series come from plot directives rather than runs.
    pub const fn uses_plots(&self) -> bool {
        !self.plots.is_empty()
    }

    /// Every `.tex` data file `bench.pdf` depends on: runs first, then plots.
    pub fn tex_files(&self) -> Vec<String> {
        self.runs
            .iter()
            .map(RunTarget::tex_file)
            .chain(self.plots.iter().filter_map(PlotTarget::tex_file))
            .collect()
    }
}

fn find_run(benchmark: &Benchmark, plot: &Plot, name: &str) -> Result<usize> {
    let mut matches = benchmark
        .runs
        .iter()
        .enumerate()
        .filter(|(_, run)| run.name == name)
        .map(|(index, _)| index);

    match (matches.next(), matches.next()) {
        (Some(index), None) => Ok(index),
        (None, _) => Err(EmitError::UnknownRun {
            plot: plot.name.clone(),
            run: name.to_string(),
        }),
        (Some(_), Some(_)) => Err(EmitError::AmbiguousRun {
            plot: plot.name.clone(),
            run: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s2bench_model::{BuildSpec, GraphSpec, PlotRun, Step};

    fn bench(runs: Vec<Run>, plots: Vec<PlotEntry>) -> Benchmark {
        Benchmark::new(GraphSpec::default(), BuildSpec::new("main.cpp", 10), runs).with_plots(plots)
    }

    #[test]
    fn test_step_binaries_only_for_overrides() {
        let b = bench(
            vec![
                Run::new("cm")
                    .with_step(Step::new().with_compile_params("-DA"))
                    .with_step(Step::new())
                    .with_step(Step::new().with_compile_params("-DB")),
            ],
            Vec::new(),
        );
        let plan = BuildPlan::new(&b).unwrap();
        let run = &plan.runs[0];

        assert_eq!(run.step_binaries.len(), 2);
        assert!(run.base_binary);
        assert_eq!(run.binary_for_step(0), "0_cm_step0.out");
        assert_eq!(run.binary_for_step(1), "0_cm.out");
        assert_eq!(run.binary_for_step(2), "0_cm_step2.out");
        assert_eq!(
            run.binaries(),
            vec!["0_cm.out", "0_cm_step0.out", "0_cm_step2.out"]
        );
    }

    #[test]
    fn test_base_binary_unused_when_every_step_overrides() {
        let b = bench(
            vec![
                Run::new("cm")
                    .with_compile_params("-DSTORAGE_A")
                    .with_step(Step::new().with_compile_params("-DSTORAGE_B"))
                    .with_step(Step::new().with_compile_params("-DSTORAGE_C")),
                Run::new("plain"),
            ],
            Vec::new(),
        );
        let plan = BuildPlan::new(&b).unwrap();

        assert!(!plan.runs[0].base_binary);
        assert_eq!(plan.runs[0].binaries(), vec!["0_cm_step0.out", "0_cm_step1.out"]);
        assert_eq!(plan.runs[0].step_binaries[0].compile_params, "-DSTORAGE_B");
        assert!(plan.runs[1].base_binary);
        assert_eq!(plan.runs[1].binaries(), vec!["1_plain.out"]);
    }

    #[test]
    fn test_plot_resolution_marks_captured_runs() {
        let b = bench(
            vec![Run::new("a"), Run::new("b")],
            vec![
                Plot::new("min").with_runs(vec![PlotRun::min("b")]).into(),
                PlotEntry::stub(Side::Right),
            ],
        );
        let plan = BuildPlan::new(&b).unwrap();

        assert!(!plan.runs[0].captured);
        assert!(plan.runs[1].captured);
        assert_eq!(plan.tex_files(), vec!["0_a.tex", "1_b.tex", "plot0_min.tex"]);
        let PlotTarget::Series { sources, .. } = &plan.plots[0] else {
            panic!("expected series");
        };
        assert_eq!(
            sources,
            &vec![PlotSource {
                run: 1,
                aggregate: Aggregate::Min
            }]
        );
        assert_eq!(plan.plots[1].side(), Side::Right);
    }

    #[test]
    fn test_unknown_run() {
        let b = bench(
            vec![Run::new("a")],
            vec![Plot::new("p").with_runs(vec![PlotRun::raw("missing")]).into()],
        );
        let err = BuildPlan::new(&b).unwrap_err();
        assert!(matches!(err, EmitError::UnknownRun { ref run, .. } if run == "missing"));
    }

    #[test]
    fn test_ambiguous_run() {
        let b = bench(
            vec![Run::new("a"), Run::new("a")],
            vec![Plot::new("p").with_runs(vec![PlotRun::raw("a")]).into()],
        );
        assert!(matches!(
            BuildPlan::new(&b).unwrap_err(),
            EmitError::AmbiguousRun { .. }
        ));
    }
}
