//! Plot directives: chart series assembled from run results.

use serde::Deserialize;

use crate::{Side, sanitize_name};

/// Aggregate a plot series takes from one run's raw values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregate {
    Min,
    Avg,
    Max,
    /// Values as produced, no aggregation.
    Raw,
}

impl Aggregate {
    /// Flag passed to the aggregation filter, `None` for raw values.
    pub const fn flag(self) -> Option<&'static str> {
        match self {
            Self::Min => Some("--min"),
            Self::Avg => Some("--avg"),
            Self::Max => Some("--max"),
            Self::Raw => None,
        }
    }
}

/// Reference from a plot series to a run, by run name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotRun {
    pub run: String,
    #[serde(default)]
    pub min: bool,
    #[serde(default)]
    pub avg: bool,
    #[serde(default)]
    pub max: bool,
}

impl PlotRun {
    /// Reference `run` without aggregation.
    pub fn raw(run: impl Into<String>) -> Self {
        Self {
            run: run.into(),
            ..Self::default()
        }
    }

    /// Reference the minimum of `run`.
    pub fn min(run: impl Into<String>) -> Self {
        Self {
            min: true,
            ..Self::raw(run)
        }
    }

    /// Reference the average of `run`.
    pub fn avg(run: impl Into<String>) -> Self {
        Self {
            avg: true,
            ..Self::raw(run)
        }
    }

    /// Reference the maximum of `run`.
    pub fn max(run: impl Into<String>) -> Self {
        Self {
            max: true,
            ..Self::raw(run)
        }
    }

    /// Aggregates requested, in min/avg/max order. Empty selection is raw.
    #[must_use]
    pub fn aggregates(&self) -> Vec<Aggregate> {
        let selected: Vec<Aggregate> = [
            (self.min, Aggregate::Min),
            (self.avg, Aggregate::Avg),
            (self.max, Aggregate::Max),
        ]
        .into_iter()
        .filter_map(|(on, agg)| on.then_some(agg))
        .collect();

        if selected.is_empty() {
            vec![Aggregate::Raw]
        } else {
            selected
        }
    }
}

/// A named chart series built from one or more runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plot {
    pub name: String,
    /// Arguments for the bench-to-TeX filter (typically pgfplots style options).
    #[serde(default)]
    pub tex_params: String,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub runs: Vec<PlotRun>,
}

impl Plot {
    /// Create a series with the given legend name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the bench-to-TeX filter arguments.
    pub fn with_tex_params(mut self, params: impl Into<String>) -> Self {
        self.tex_params = params.into();
        self
    }

    /// Set the axis side.
    pub const fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Replace the referenced runs.
    pub fn with_runs(mut self, runs: Vec<PlotRun>) -> Self {
        self.runs = runs;
        self
    }

    /// Filename stem for the series at `index` in the plot list.
    #[must_use]
    pub fn stem(&self, index: usize) -> String {
        format!("plot{index}_{}", sanitize_name(&self.name))
    }
}

/// Invisible placeholder occupying one bar slot on an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotStub {
    #[serde(default)]
    pub side: Side,
}

/// Entry in a benchmark's plot list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PlotEntry {
    Series(Plot),
    Stub(PlotStub),
}

impl PlotEntry {
    /// Create a placeholder on `side`.
    pub const fn stub(side: Side) -> Self {
        Self::Stub(PlotStub { side })
    }

    /// Axis the entry is drawn against.
    pub const fn side(&self) -> Side {
        match self {
            Self::Series(plot) => plot.side,
            Self::Stub(stub) => stub.side,
        }
    }
}

impl From<Plot> for PlotEntry {
    fn from(plot: Plot) -> Self {
        Self::Series(plot)
    }
}
