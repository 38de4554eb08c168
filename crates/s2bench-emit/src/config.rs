//! Toolchain configuration baked into the generated Makefile.
//!
//! Defaults match the layout benchmarks are built in: the output directory
//! sits two levels below the repository root, with helper scripts one level up.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// C++ compiler command (e.g. "g++", "clang++-18").
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Compiler {
    command: String,
}

impl Compiler {
    /// Create a compiler with the given command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// GNU C++ compiler.
    pub fn gcc() -> Self {
        Self::new("g++")
    }

    /// Clang C++ compiler.
    pub fn clang() -> Self {
        Self::new("clang++")
    }

    /// Command to invoke.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::gcc()
    }
}

impl FromStr for Compiler {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err("compiler command cannot be empty".to_string());
        }
        Ok(Self::new(s))
    }
}

impl TryFrom<String> for Compiler {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// Post-processing scripts the generated recipes pipe through.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Filters {
    /// Benchmark values to pgfplots data.
    pub bench2tex: String,
    /// `perf stat -x ,` output to benchmark values.
    pub perf2bench: String,
    /// Benchmark values to their average.
    pub bench2avg: String,
    /// Min/avg/max selection over a raw data file.
    pub bench2agg: String,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            bench2tex: "../bench2tex.py".to_string(),
            perf2bench: "../perf2bench.py".to_string(),
            bench2avg: "../bench2avg.py".to_string(),
            bench2agg: "../bench2agg.py".to_string(),
        }
    }
}

/// Default hardware events sampled by `perf` instrumented runs.
pub const DEFAULT_PERF_EVENTS: &str = "L1-dcache-loads,L1-dcache-load-misses";

/// Everything outside the benchmark definition that ends up in the Makefile.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Toolchain {
    pub compiler: Compiler,
    pub cflags: String,
    pub includes: String,
    /// LaTeX engine producing `bench.pdf`.
    pub latex: String,
    /// Comma-separated `perf stat -e` event list.
    pub perf_events: String,
    pub filters: Filters,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            compiler: Compiler::default(),
            cflags: "-Wall -std=c++2a -O3 -fopenmp".to_string(),
            includes: "-I../.. -I../../../lib -I../../../lib/taskflow -I../../../lib/entt/src"
                .to_string(),
            latex: "pdflatex".to_string(),
            perf_events: DEFAULT_PERF_EVENTS.to_string(),
            filters: Filters::default(),
        }
    }
}

impl Toolchain {
    /// Set the compiler.
    pub fn with_compiler(mut self, compiler: Compiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Set the compiler flags.
    pub fn with_cflags(mut self, cflags: impl Into<String>) -> Self {
        self.cflags = cflags.into();
        self
    }

    /// Set the include flags.
    pub fn with_includes(mut self, includes: impl Into<String>) -> Self {
        self.includes = includes.into();
        self
    }

    /// Set the LaTeX engine.
    pub fn with_latex(mut self, latex: impl Into<String>) -> Self {
        self.latex = latex.into();
        self
    }

    /// Set the `perf stat` event list.
    pub fn with_perf_events(mut self, events: impl Into<String>) -> Self {
        self.perf_events = events.into();
        self
    }

    /// Set the filter scripts.
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }
}
