//! Benchmark description: chart metadata, build metadata, runs and plots.

use std::path::{Path, PathBuf};

use crate::{Instrument, PlotEntry, Run, Side};

/// Default chart width in centimetres.
pub const DEFAULT_WIDTH_CM: f64 = 12.0;
/// Default chart height in centimetres.
pub const DEFAULT_HEIGHT_CM: f64 = 8.0;

/// Chart metadata for `graph.tex`.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphSpec {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    /// Left axis ceiling; `None` lets pgfplots scale.
    pub ymax: Option<f64>,
    /// Right axis label. Empty means no right axis.
    pub ylabel_right: String,
    pub ymax_right: Option<f64>,
    pub width: f64,
    pub height: f64,
    /// Extra pgfplots options for the left axis.
    pub axis_params: String,
    /// Extra pgfplots options for the right axis.
    pub axis_params_right: String,
    /// Draw arrow tips on the axis lines.
    pub arrowheads: bool,
}

impl Default for GraphSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            xlabel: String::new(),
            ylabel: String::new(),
            ymax: None,
            ylabel_right: String::new(),
            ymax_right: None,
            width: DEFAULT_WIDTH_CM,
            height: DEFAULT_HEIGHT_CM,
            axis_params: String::new(),
            axis_params_right: String::new(),
            arrowheads: true,
        }
    }
}

impl GraphSpec {
    /// Create a chart with the given title and axis labels.
    pub fn new(
        title: impl Into<String>,
        xlabel: impl Into<String>,
        ylabel: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            xlabel: xlabel.into(),
            ylabel: ylabel.into(),
            ..Self::default()
        }
    }

    /// Set the left axis ceiling.
    pub const fn with_ymax(mut self, ymax: f64) -> Self {
        self.ymax = Some(ymax);
        self
    }

    /// Add a right axis with the given label and ceiling.
    pub fn with_right_axis(mut self, ylabel: impl Into<String>, ymax: Option<f64>) -> Self {
        self.ylabel_right = ylabel.into();
        self.ymax_right = ymax;
        self
    }

    /// Set the chart size in centimetres.
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set extra options for the left axis.
    pub fn with_axis_params(mut self, params: impl Into<String>) -> Self {
        self.axis_params = params.into();
        self
    }

    /// Set extra options for the right axis.
    pub fn with_axis_params_right(mut self, params: impl Into<String>) -> Self {
        self.axis_params_right = params.into();
        self
    }

    /// Set whether axis lines end in arrowheads.
    pub const fn with_arrowheads(mut self, arrowheads: bool) -> Self {
        self.arrowheads = arrowheads;
        self
    }

    /// Whether a right-hand axis is drawn.
    #[must_use]
    pub fn has_right_axis(&self) -> bool {
        !self.ylabel_right.is_empty()
    }

    /// Axis label for `side`.
    #[must_use]
    pub fn ylabel_for(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.ylabel,
            Side::Right => &self.ylabel_right,
        }
    }
}

/// Build metadata shared by every run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildSpec {
    /// Benchmark source, as referenced from the output directory.
    pub main: String,
    /// Value of `-DFRAME_COUNT`.
    pub frames: u64,
    /// Instrument for runs that don't choose one.
    pub instrument: Instrument,
    /// Compile parameters appended to `CPARAMS`.
    pub compile_params: String,
    /// Runtime arguments placed before every step's own arguments.
    pub run_params: String,
    /// Bench-to-TeX arguments for runs without their own.
    pub tex_params: String,
    /// Extra prerequisites of every compile rule (`$(DEPS)`).
    pub deps: Vec<String>,
}

impl BuildSpec {
    /// Create build settings for `main` running `frames` frames.
    pub fn new(main: impl Into<String>, frames: u64) -> Self {
        Self {
            main: main.into(),
            frames,
            ..Self::default()
        }
    }

    /// Set the default instrument for runs.
    pub const fn with_instrument(mut self, instrument: Instrument) -> Self {
        self.instrument = instrument;
        self
    }

    /// Set compile parameters shared by every run.
    pub fn with_compile_params(mut self, params: impl Into<String>) -> Self {
        self.compile_params = params.into();
        self
    }

    /// Set runtime arguments placed before every step's own.
    pub fn with_run_params(mut self, params: impl Into<String>) -> Self {
        self.run_params = params.into();
        self
    }

    /// Set the default bench-to-TeX filter arguments.
    pub fn with_tex_params(mut self, params: impl Into<String>) -> Self {
        self.tex_params = params.into();
        self
    }

    /// Set the extra prerequisites of every binary.
    pub fn with_deps(mut self, deps: Vec<String>) -> Self {
        self.deps = deps;
        self
    }
}

/// Default output directory.
pub const DEFAULT_DIR: &str = "build/";

/// A complete chart and build description.
#[derive(Clone, Debug, PartialEq)]
pub struct Benchmark {
    /// Directory receiving `graph.tex` and `Makefile`.
    pub dir: PathBuf,
    pub graph: GraphSpec,
    pub build: BuildSpec,
    pub runs: Vec<Run>,
    /// Series directives. Empty draws one series per run.
    pub plots: Vec<PlotEntry>,
}

impl Benchmark {
    /// Create a benchmark writing into the default directory.
    pub fn new(graph: GraphSpec, build: BuildSpec, runs: Vec<Run>) -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            graph,
            build,
            runs,
            plots: Vec::new(),
        }
    }

    /// Set the output directory.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the plot directives.
    pub fn with_plots(mut self, plots: Vec<PlotEntry>) -> Self {
        self.plots = plots;
        self
    }

    /// Filename stems of every run, in order.
    #[must_use]
    pub fn run_stems(&self) -> Vec<String> {
        self.runs
            .iter()
            .enumerate()
            .map(|(index, run)| run.stem(index))
            .collect()
    }

    /// Run names that appear more than once.
    #[must_use]
    pub fn duplicate_run_names(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (index, run) in self.runs.iter().enumerate() {
            let seen_before = self.runs[..index].iter().any(|r| r.name == run.name);
            if seen_before && !duplicates.contains(&run.name.as_str()) {
                duplicates.push(&run.name);
            }
        }
        duplicates
    }
}
