//! s2bench - benchmark scaffolding generator
//!
//! Turns a list of benchmark runs into a `Makefile` that compiles and runs
//! each variant and a `graph.tex` that plots the results with pgfplots.
//!
//! # Example
//!
//! ```ignore
//! use s2bench::{Benchmark, BuildSpec, GraphSpec, Run};
//!
//! let benchmark = Benchmark::new(
//!     GraphSpec::new("", "", "frame time"),
//!     BuildSpec::new("../saxpy.cpp", 1000),
//!     vec![Run::new("scattered").with_run_params("100000")],
//! )
//! .with_dir("saxpy/");
//! s2bench::generate(&benchmark)?;
//! ```

pub use s2bench_emit::{
    BenchProject, BuildPlan, Compiler, EmitError, Filters, GRAPH_FILE, GeneratedFiles, MAKEFILE,
    PlotTarget, Rendered, RunTarget, StepRenderer, Toolchain, write_atomic,
};
pub use s2bench_model::{
    Aggregate, Benchmark, BuildSpec, GraphSpec, Instrument, Plot, PlotEntry, PlotRun, PlotStub,
    ResolvedStep, Run, Side, Step, sanitize_name,
};

pub mod config;
mod error;

pub use config::Definition;
pub use error::{Error, Result};

/// Write `graph.tex` and `Makefile` for `benchmark` with the default toolchain.
///
/// # Errors
///
/// Returns an error if a plot references a missing or ambiguous run, or if
/// the output directory or files can't be written.
pub fn generate(benchmark: &Benchmark) -> Result<GeneratedFiles> {
    generate_with_toolchain(benchmark, Toolchain::default())
}

/// Write `graph.tex` and `Makefile` for `benchmark` with a custom toolchain.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_with_toolchain(
    benchmark: &Benchmark,
    toolchain: Toolchain,
) -> Result<GeneratedFiles> {
    let files = BenchProject::new(benchmark)
        .with_toolchain(toolchain)
        .write_all()?;
    Ok(files)
}
