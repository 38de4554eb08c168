//! Shell recipes executing a run's steps.

use s2bench_model::{Instrument, ResolvedStep};
use tracing::trace;

use crate::config::{Filters, Toolchain};
use crate::plan::RunTarget;

/// Renders the command line of each step of a run.
pub struct StepRenderer<'a> {
    toolchain: &'a Toolchain,
    /// Instrument for runs without their own.
    instrument: Instrument,
    /// Arguments placed before every step's own.
    run_params: &'a str,
}

impl<'a> StepRenderer<'a> {
    pub const fn new(toolchain: &'a Toolchain, instrument: Instrument, run_params: &'a str) -> Self {
        Self {
            toolchain,
            instrument,
            run_params,
        }
    }

    pub const fn filters(&self) -> &Filters {
        &self.toolchain.filters
    }

    /// Command for a single step, without the enclosing group.
    ///
    /// `./<binary> <args>`, wrapped in `perf stat` when instrumented and
    /// followed by the averaging filter when the step averages.
    pub fn render_step(&self, binary: &str, step: &ResolvedStep<'_>, instrument: Instrument) -> String {
        let args = join_params(&[self.run_params, step.params]);
        let mut command = format!("./{binary} {args}");

        if instrument == Instrument::Perf {
            command = format!(
                "(perf stat -e {events} -x , -r {repetitions} {command} 2>&1) | {perf2bench}",
                events = self.toolchain.perf_events,
                repetitions = step.repetitions,
                perf2bench = self.toolchain.filters.perf2bench,
            );
        }

        if step.average {
            command.push_str(" | ");
            command.push_str(&self.toolchain.filters.bench2avg);
        }

        command
    }

    /// Recipe line running every step of `target`, starting with a tab.
    ///
    /// Each step is parenthesised; several steps are joined with `; ` inside
    /// one more group so they run in sequence and feed a single pipe.
    pub fn render_recipe(&self, target: &RunTarget<'_>) -> String {
        let instrument = target.run.effective_instrument(self.instrument);
        let steps = target.run.effective_steps();

        let commands: Vec<String> = steps
            .iter()
            .map(|step| {
                let binary = target.binary_for_step(step.index);
                format!("({})", self.render_step(&binary, step, instrument))
            })
            .collect();
        let joined = commands.join("; ");

        let recipe = if steps.len() > 1 {
            format!("\t({joined})")
        } else {
            format!("\t{joined}")
        };
        trace!(run = %target.run.name, %instrument, recipe = %recipe.trim_start(), "rendered steps");
        recipe
    }
}

/// Join parameter strings with a space, skipping empty ones.
pub fn join_params(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::BuildPlan;
    use s2bench_model::{Benchmark, BuildSpec, GraphSpec, Run, Step};

    fn recipe_for(run: Run, instrument: Instrument, run_params: &str) -> String {
        let bench = Benchmark::new(GraphSpec::default(), BuildSpec::new("m.cpp", 1), vec![run]);
        let plan = BuildPlan::new(&bench).unwrap();
        let toolchain = Toolchain::default();
        StepRenderer::new(&toolchain, instrument, run_params).render_recipe(&plan.runs[0])
    }

    #[test]
    fn test_native_single_step() {
        let recipe = recipe_for(Run::new("a b").with_run_params("100000"), Instrument::Native, "");
        assert_eq!(recipe, "\t(./0_a_b.out 100000)");
    }

    #[test]
    fn test_empty_params_keep_separator() {
        let recipe = recipe_for(Run::new(""), Instrument::Native, "");
        assert_eq!(recipe, "\t(./0_.out )");
    }

    #[test]
    fn test_perf_wraps_with_repetitions() {
        let run = Run::new("cm").with_run_params("10").with_repetitions(5);
        let recipe = recipe_for(run, Instrument::Perf, "");
        assert_eq!(
            recipe,
            "\t((perf stat -e L1-dcache-loads,L1-dcache-load-misses -x , -r 5 ./0_cm.out 10 2>&1) \
             | ../perf2bench.py)"
        );
    }

    #[test]
    fn test_run_instrument_overrides_default() {
        let run = Run::new("cm").with_instrument(Instrument::Native);
        let recipe = recipe_for(run, Instrument::Perf, "");
        assert!(!recipe.contains("perf stat"));
    }

    #[test]
    fn test_average_appends_filter() {
        let run = Run::new("a").with_run_params("1").with_averages(true);
        let recipe = recipe_for(run, Instrument::Native, "");
        assert_eq!(recipe, "\t(./0_a.out 1 | ../bench2avg.py)");

        let run = Run::new("a")
            .with_averages(true)
            .with_step(Step::new().with_params("1").with_average(false));
        let recipe = recipe_for(run, Instrument::Native, "");
        assert_eq!(recipe, "\t(./0_a.out 1)");
    }

    #[test]
    fn test_multiple_steps_grouped() {
        let run = Run::new("cm")
            .with_run_params("1000000")
            .with_instrument(Instrument::Perf)
            .with_step(Step::new().with_compile_params("-DSTORAGE_SCATTERED -DSTORAGE_SMART"))
            .with_step(Step::new().with_params("5").with_repetitions(3).with_average(true));
        let recipe = recipe_for(run, Instrument::Native, "");

        assert_eq!(
            recipe,
            "\t(((perf stat -e L1-dcache-loads,L1-dcache-load-misses -x , -r 1 ./0_cm_step0.out 1000000 2>&1) \
             | ../perf2bench.py); \
             ((perf stat -e L1-dcache-loads,L1-dcache-load-misses -x , -r 3 ./0_cm.out 5 2>&1) \
             | ../perf2bench.py | ../bench2avg.py))"
        );
    }

    #[test]
    fn test_benchmark_run_params_come_first() {
        let recipe = recipe_for(Run::new("a").with_run_params("7"), Instrument::Native, "--quiet");
        assert_eq!(recipe, "\t(./0_a.out --quiet 7)");
    }

    #[test]
    fn test_implicit_step_matches_explicit() {
        let implicit = Run::new("a").with_run_params("9").with_repetitions(4).with_averages(true);
        let explicit = implicit.clone().with_step(
            Step::new()
                .with_params("9")
                .with_repetitions(4)
                .with_average(true),
        );
        assert_eq!(
            recipe_for(implicit, Instrument::Perf, ""),
            recipe_for(explicit, Instrument::Perf, "")
        );
    }

    #[test]
    fn test_join_params() {
        assert_eq!(join_params(&["", "a", "", "b c"]), "a b c");
        assert_eq!(join_params(&["", ""]), "");
    }
}
