//! Runs and steps.

use std::fmt;

use serde::Deserialize;

/// Execution wrapper applied to every step of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// Execute the binary directly.
    #[default]
    Native,
    /// Sample hardware counters with `perf stat`, repeated per step.
    Perf,
}

impl Instrument {
    /// Name used in definition files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Perf => "perf",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Y axis a series is drawn against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// Name used in definition files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution of a run's binary.
///
/// Every field is an override; `None` falls back to the owning [`Run`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
    /// Runtime arguments for the binary.
    pub params: Option<String>,
    /// `perf stat` repetition count.
    pub repetitions: Option<u32>,
    /// Pipe this step's output through the averaging filter.
    pub average: Option<bool>,
    /// Compile parameters replacing the run's. The step gets its own binary.
    pub compile_params: Option<String>,
}

impl Step {
    /// Create a step that inherits everything from its run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the runtime arguments.
    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Set the `perf stat` repetition count.
    pub const fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = Some(repetitions);
        self
    }

    /// Set whether output is averaged.
    pub const fn with_average(mut self, average: bool) -> Self {
        self.average = Some(average);
        self
    }

    /// Build this step with its own compile parameters instead of the run's.
    pub fn with_compile_params(mut self, params: impl Into<String>) -> Self {
        self.compile_params = Some(params.into());
        self
    }
}

/// A step with every fallback applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedStep<'a> {
    /// Position in the run's step list.
    pub index: usize,
    pub params: &'a str,
    pub repetitions: u32,
    pub average: bool,
    /// Compile override, if this step builds its own binary.
    pub compile_params: Option<&'a str>,
}

/// One labelled benchmark configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Run {
    /// Legend label, also the base of every generated filename.
    pub name: String,
    #[serde(default)]
    pub compile_params: String,
    #[serde(default)]
    pub run_params: String,
    /// Arguments for the bench-to-TeX filter. Empty uses the benchmark default.
    #[serde(default)]
    pub tex_params: String,
    /// `None` uses the benchmark-wide instrument.
    #[serde(default)]
    pub instrument: Option<Instrument>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Default averaging for steps that don't say.
    #[serde(default)]
    pub averages: bool,
    /// Default `perf` repetitions for steps that don't say (1 when unset).
    #[serde(default)]
    pub repetitions: Option<u32>,
    /// Axis the run is plotted against when the graph is built from runs.
    #[serde(default)]
    pub side: Side,
}

impl Run {
    /// Create a run with the given name and default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the compile parameters.
    pub fn with_compile_params(mut self, params: impl Into<String>) -> Self {
        self.compile_params = params.into();
        self
    }

    /// Set the runtime arguments.
    pub fn with_run_params(mut self, params: impl Into<String>) -> Self {
        self.run_params = params.into();
        self
    }

    /// Set the bench-to-TeX filter arguments.
    pub fn with_tex_params(mut self, params: impl Into<String>) -> Self {
        self.tex_params = params.into();
        self
    }

    /// Override the benchmark-wide instrument.
    pub const fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instrument = Some(instrument);
        self
    }

    /// Replace the step list.
    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Append a step.
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the default averaging for steps.
    pub const fn with_averages(mut self, averages: bool) -> Self {
        self.averages = averages;
        self
    }

    /// Set the default repetition count for steps.
    pub const fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = Some(repetitions);
        self
    }

    /// Set the axis side.
    pub const fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Filename stem for the run at `index`: `<index>_<sanitized name>`.
    #[must_use]
    pub fn stem(&self, index: usize) -> String {
        format!("{index}_{}", sanitize_name(&self.name))
    }

    /// Stem of the binary built for a step with its own compile parameters.
    #[must_use]
    pub fn step_stem(&self, index: usize, step: usize) -> String {
        format!("{}_step{step}", self.stem(index))
    }

    #[must_use]
    pub fn effective_instrument(&self, default: Instrument) -> Instrument {
        self.instrument.unwrap_or(default)
    }

    /// Steps with run-level fallbacks applied.
    ///
    /// A run without explicit steps yields a single step mirroring its own
    /// `run_params`, `repetitions` and `averages`.
    #[must_use]
    pub fn effective_steps(&self) -> Vec<ResolvedStep<'_>> {
        if self.steps.is_empty() {
            return vec![ResolvedStep {
                index: 0,
                params: &self.run_params,
                repetitions: self.repetitions.unwrap_or(1),
                average: self.averages,
                compile_params: None,
            }];
        }

        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| ResolvedStep {
                index,
                params: step.params.as_deref().unwrap_or(&self.run_params),
                repetitions: step.repetitions.or(self.repetitions).unwrap_or(1),
                average: step.average.unwrap_or(self.averages),
                compile_params: step.compile_params.as_deref(),
            })
            .collect()
    }
}

/// Turn a display name into a filename fragment: spaces become underscores.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_replaces_spaces_only() {
        let run = Run::new("scattered - raw pointers");
        assert_eq!(run.stem(1), "1_scattered_-_raw_pointers");
        assert_eq!(run.step_stem(1, 2), "1_scattered_-_raw_pointers_step2");
        assert_eq!(sanitize_name("a-b.c/d"), "a-b.c/d");
    }

    #[test]
    fn test_implicit_step_mirrors_run() {
        let run = Run::new("cm")
            .with_run_params("1000000")
            .with_repetitions(5)
            .with_averages(true);

        let steps = run.effective_steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0],
            ResolvedStep {
                index: 0,
                params: "1000000",
                repetitions: 5,
                average: true,
                compile_params: None,
            }
        );
    }

    #[test]
    fn test_step_overrides_and_fallbacks() {
        let run = Run::new("cm")
            .with_run_params("100")
            .with_repetitions(3)
            .with_step(Step::new().with_compile_params("-DSTORAGE_SCATTERED"))
            .with_step(Step::new().with_params("200").with_repetitions(7).with_average(true));

        let steps = run.effective_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].params, "100");
        assert_eq!(steps[0].repetitions, 3);
        assert!(!steps[0].average);
        assert_eq!(steps[0].compile_params, Some("-DSTORAGE_SCATTERED"));
        assert_eq!(steps[1].params, "200");
        assert_eq!(steps[1].repetitions, 7);
        assert!(steps[1].average);
        assert_eq!(steps[1].index, 1);
    }

    #[test]
    fn test_repetitions_default_to_one() {
        let run = Run::new("x").with_step(Step::new());
        assert_eq!(run.effective_steps()[0].repetitions, 1);
    }

    #[test]
    fn test_effective_instrument() {
        let run = Run::new("x");
        assert_eq!(run.effective_instrument(Instrument::Perf), Instrument::Perf);
        let run = run.with_instrument(Instrument::Native);
        assert_eq!(run.effective_instrument(Instrument::Perf), Instrument::Native);
    }

    #[test]
    fn test_deserialize_run() {
        let run: Run = toml::from_str(
            r#"
name = "cm"
run_params = "1000000"
instrument = "perf"
side = "right"

[[steps]]
compile_params = "-DSTORAGE_SCATTERED -DSTORAGE_SMART"

[[steps]]
params = "10"
average = true
"#,
        )
        .unwrap();

        assert_eq!(run.instrument, Some(Instrument::Perf));
        assert_eq!(run.side, Side::Right);
        assert_eq!(run.steps.len(), 2);
        assert_eq!(run.steps[1].average, Some(true));
    }

    #[test]
    fn test_deserialize_requires_name() {
        let result: Result<Run, _> = toml::from_str("run_params = \"10\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_unknown_instrument() {
        let result: Result<Run, _> = toml::from_str("name = \"x\"\ninstrument = \"valgrind\"\n");
        assert!(result.is_err());
    }
}
