//! Benchmark definition files.
//!
//! A definition is a TOML document with the graph and build settings at the
//! top level, `[[runs]]` (with optional `[[runs.steps]]`), `[[plots]]`, and an
//! optional `[toolchain]` table:
//!
//! ```toml
//! dir = "saxpy_smart/"
//! ylabel = "frame time"
//! main = "../saxpy.cpp"
//! frames = 1000
//! compile_params = "-DSCHEDULER_SEQUENTIAL -DWIDTH=64"
//!
//! [[runs]]
//! name = "scattered - raw pointers"
//! compile_params = "-DBENCHMARK_FRAMETIME -DSTORAGE_SCATTERED"
//! run_params = "100000"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use s2bench_emit::{BenchProject, Toolchain};
use s2bench_model::{
    Benchmark, BuildSpec, DEFAULT_DIR, DEFAULT_HEIGHT_CM, DEFAULT_WIDTH_CM, GraphSpec, Instrument,
    PlotEntry, Run,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

fn default_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DIR)
}

/// On-disk layout of a benchmark definition.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
    #[serde(default = "default_dir")]
    dir: PathBuf,

    #[serde(default)]
    title: String,
    #[serde(default)]
    xlabel: String,
    #[serde(default)]
    ylabel: String,
    ymax: Option<f64>,
    #[serde(default)]
    ylabel_right: String,
    ymax_right: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    #[serde(default)]
    axis_params: String,
    #[serde(default)]
    axis_params_right: String,
    arrowheads: Option<bool>,

    main: String,
    frames: u64,
    #[serde(default)]
    instrument: Instrument,
    #[serde(default)]
    compile_params: String,
    #[serde(default)]
    run_params: String,
    #[serde(default)]
    tex_params: String,
    #[serde(default)]
    deps: Vec<String>,

    #[serde(default)]
    runs: Vec<Run>,
    #[serde(default)]
    plots: Vec<PlotEntry>,
    #[serde(default)]
    toolchain: Toolchain,
}

impl From<DefinitionFile> for Definition {
    fn from(file: DefinitionFile) -> Self {
        let graph = GraphSpec {
            title: file.title,
            xlabel: file.xlabel,
            ylabel: file.ylabel,
            ymax: file.ymax,
            ylabel_right: file.ylabel_right,
            ymax_right: file.ymax_right,
            width: file.width.unwrap_or(DEFAULT_WIDTH_CM),
            height: file.height.unwrap_or(DEFAULT_HEIGHT_CM),
            axis_params: file.axis_params,
            axis_params_right: file.axis_params_right,
            arrowheads: file.arrowheads.unwrap_or(true),
        };

        let build = BuildSpec {
            main: file.main,
            frames: file.frames,
            instrument: file.instrument,
            compile_params: file.compile_params,
            run_params: file.run_params,
            tex_params: file.tex_params,
            deps: file.deps,
        };

        Self {
            benchmark: Benchmark::new(graph, build, file.runs)
                .with_dir(file.dir)
                .with_plots(file.plots),
            toolchain: file.toolchain,
        }
    }
}

/// A loaded benchmark definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    pub benchmark: Benchmark,
    pub toolchain: Toolchain,
}

impl Definition {
    /// Parse a definition from TOML text. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is malformed or misses a
    /// required key.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let file: DefinitionFile = toml::from_str(text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(file.into())
    }

    /// Load a definition file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let definition = Self::parse(&text, path)?;
        debug!(
            path = %path.display(),
            runs = definition.benchmark.runs.len(),
            plots = definition.benchmark.plots.len(),
            "loaded benchmark definition"
        );
        Ok(definition)
    }

    /// Replace the output directory.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.benchmark = self.benchmark.with_dir(dir);
        self
    }

    /// Generation project for this definition.
    pub fn project(&self) -> BenchProject<'_> {
        BenchProject::new(&self.benchmark).with_toolchain(self.toolchain.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use s2bench_emit::Compiler;
    use s2bench_model::Side;

    const MINIMAL: &str = r#"
main = "../saxpy.cpp"
frames = 1000

[[runs]]
name = "a"
"#;

    #[test]
    fn test_minimal_defaults() {
        let def = Definition::parse(MINIMAL, Path::new("min.toml")).unwrap();
        let b = &def.benchmark;

        assert_eq!(b.dir, PathBuf::from("build/"));
        assert_eq!(b.build.main, "../saxpy.cpp");
        assert_eq!(b.build.frames, 1000);
        assert_eq!(b.build.instrument, Instrument::Native);
        assert_eq!(b.runs, vec![Run::new("a")]);
        assert!(b.plots.is_empty());
        assert!(b.graph.arrowheads);
        assert_eq!(b.graph, GraphSpec::default());
        assert_eq!(def.toolchain, Toolchain::default());
    }

    #[test]
    fn test_full_definition() {
        let def = Definition::parse(
            r#"
dir = "saxpy_smart/"
title = "Saxpy"
ylabel = "frame time"
ymax = 0.02
ylabel_right = "cache misses"
width = 10
height = 8
arrowheads = false
main = "../saxpy.cpp"
frames = 1000
instrument = "perf"
deps = ["../util/benchmark.hpp"]

[toolchain]
compiler = "clang++"

[[runs]]
name = "cm"
side = "right"

[[plots]]
name = "cache misses"
side = "right"
runs = [{ run = "cm" }]

[[plots]]
side = "left"
"#,
            Path::new("full.toml"),
        )
        .unwrap();
        let b = &def.benchmark;

        assert_eq!(b.dir, PathBuf::from("saxpy_smart/"));
        assert_eq!(b.graph.ymax, Some(0.02));
        assert!(b.graph.has_right_axis());
        assert!((b.graph.width - 10.0).abs() < f64::EPSILON);
        assert!(!b.graph.arrowheads);
        assert_eq!(b.build.instrument, Instrument::Perf);
        assert_eq!(b.build.deps, vec!["../util/benchmark.hpp"]);
        assert_eq!(b.runs[0].side, Side::Right);
        assert_eq!(b.plots.len(), 2);
        assert_eq!(b.plots[1], PlotEntry::stub(Side::Left));
        assert_eq!(def.toolchain.compiler, Compiler::clang());
    }

    #[test]
    fn test_missing_required_key() {
        let err = Definition::parse("frames = 10\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let text = format!("{MINIMAL}\nfarmes = 3\n");
        // Appended after [[runs]], so it lands in the run table.
        assert!(Definition::parse(&text, Path::new("x.toml")).is_err());
        assert!(Definition::parse(&format!("titel = \"x\"\n{MINIMAL}"), Path::new("x.toml")).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Definition::load(Path::new("/nonexistent/bench.toml")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_with_dir_overrides() {
        let def = Definition::parse(MINIMAL, Path::new("min.toml"))
            .unwrap()
            .with_dir("elsewhere");
        assert_eq!(def.project().graph_path(), PathBuf::from("elsewhere/graph.tex"));
    }
}
