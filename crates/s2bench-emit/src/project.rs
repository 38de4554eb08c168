//! BenchProject - writes `graph.tex` and `Makefile` for a benchmark.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use s2bench_model::Benchmark;
use tempfile::Builder;
use tracing::{debug, info, trace, warn};

use crate::config::Toolchain;
use crate::error::{EmitError, Result};
use crate::graph::gen_graph;
use crate::makefile::gen_makefile;
use crate::plan::BuildPlan;

/// Name of the generated chart document.
pub const GRAPH_FILE: &str = "graph.tex";
/// Name of the generated Makefile.
pub const MAKEFILE: &str = "Makefile";

/// Rendered contents of both generated files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    pub graph: String,
    pub makefile: String,
}

/// Paths written by [`BenchProject::write_all`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub graph: PathBuf,
    pub makefile: PathBuf,
}

/// Generation project for one benchmark.
pub struct BenchProject<'a> {
    /// Benchmark being generated.
    pub benchmark: &'a Benchmark,
    /// Compiler, flags and filter scripts.
    pub toolchain: Toolchain,
}

impl<'a> BenchProject<'a> {
    /// Create a project with the default toolchain.
    pub fn new(benchmark: &'a Benchmark) -> Self {
        Self {
            benchmark,
            toolchain: Toolchain::default(),
        }
    }

    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    // ============= Path helpers =============

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.benchmark.dir
    }

    /// Path to the chart document.
    pub fn graph_path(&self) -> PathBuf {
        self.output_dir().join(GRAPH_FILE)
    }

    /// Path to the Makefile.
    pub fn makefile_path(&self) -> PathBuf {
        self.output_dir().join(MAKEFILE)
    }

    // ============= Rendering =============

    /// Render both files without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if a plot references a missing or ambiguous run.
    pub fn render(&self) -> Result<Rendered> {
        let plan = BuildPlan::new(self.benchmark)?;
        Ok(Rendered {
            graph: gen_graph(&plan),
            makefile: gen_makefile(&plan, &self.toolchain),
        })
    }

    /// Render `graph.tex`.
    ///
    /// # Errors
    ///
    /// See [`BenchProject::render`].
    pub fn render_graph(&self) -> Result<String> {
        Ok(gen_graph(&BuildPlan::new(self.benchmark)?))
    }

    /// Render the Makefile.
    ///
    /// # Errors
    ///
    /// See [`BenchProject::render`].
    pub fn render_makefile(&self) -> Result<String> {
        Ok(gen_makefile(&BuildPlan::new(self.benchmark)?, &self.toolchain))
    }

    // ============= File generation =============

    /// Write `graph.tex`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_graph(&self) -> Result<PathBuf> {
        let path = self.graph_path();
        write_atomic(&path, &self.render_graph()?)?;
        Ok(path)
    }

    /// Write the Makefile.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_makefile(&self) -> Result<PathBuf> {
        let path = self.makefile_path();
        write_atomic(&path, &self.render_makefile()?)?;
        Ok(path)
    }

    /// Write both files, creating the output directory if needed.
    ///
    /// Both files are rendered before either is written, so a definition
    /// error leaves the directory untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a plot reference is invalid or any IO fails.
    pub fn write_all(&self) -> Result<GeneratedFiles> {
        let benchmark = self.benchmark;
        debug!(
            output_dir = %self.output_dir().display(),
            runs = benchmark.runs.len(),
            plots = benchmark.plots.len(),
            "generating benchmark project"
        );

        for name in benchmark.duplicate_run_names() {
            warn!(run = %name, "duplicate run name; legend entries will be ambiguous");
        }

        let rendered = self.render()?;

        fs::create_dir_all(self.output_dir())?;

        let graph = self.graph_path();
        write_atomic(&graph, &rendered.graph)?;
        info!(path = %graph.display(), "graph");

        let makefile = self.makefile_path();
        write_atomic(&makefile, &rendered.makefile)?;
        info!(path = %makefile.display(), main = %benchmark.build.main, "makefile");

        info!(
            output_dir = %self.output_dir().display(),
            runs = benchmark.runs.len(),
            "benchmark project generated"
        );

        Ok(GeneratedFiles { graph, makefile })
    }
}

/// Replace `path` with `content` via a temporary file in the same directory.
///
/// An existing file keeps its permissions; a new one gets the umask default.
///
/// # Errors
///
/// Returns an error if the temporary file can't be created or written, or
/// if renaming it over `path` fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    trace!(path = %path.display(), bytes = content.len(), "writing");
    let mut file = temp_builder().tempfile_in(dir)?;
    file.write_all(content.as_bytes())?;
    if let Some(permissions) = existing {
        file.as_file().set_permissions(permissions)?;
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| EmitError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Temp file builder using the mode of a plain create instead of 0600.
fn temp_builder() -> Builder<'static, 'static> {
    #[allow(unused_mut)]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Masked by the process umask, like a plain create.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use s2bench_model::{BuildSpec, GraphSpec, Plot, PlotRun, Run};

    fn bench(dir: &Path) -> Benchmark {
        Benchmark::new(
            GraphSpec::new("t", "x", "y"),
            BuildSpec::new("../main.cpp", 10),
            vec![Run::new("a"), Run::new("b")],
        )
        .with_dir(dir)
    }

    #[test]
    fn test_project_paths() {
        let b = bench(Path::new("/tmp/saxpy"));
        let project = BenchProject::new(&b);
        assert_eq!(project.graph_path(), PathBuf::from("/tmp/saxpy/graph.tex"));
        assert_eq!(project.makefile_path(), PathBuf::from("/tmp/saxpy/Makefile"));
    }

    #[test]
    fn test_write_all_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("nested/saxpy");
        let b = bench(&dir);

        let files = BenchProject::new(&b).write_all().unwrap();

        assert_eq!(files.graph, dir.join("graph.tex"));
        let makefile = fs::read_to_string(&files.makefile).unwrap();
        assert!(makefile.contains("0_a.out: ../main.cpp $(DEPS)"));
        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_write_all_overwrites_in_place() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("Makefile"), "x".repeat(10_000)).unwrap();
        let b = bench(temp.path());

        BenchProject::new(&b).write_all().unwrap();

        let makefile = fs::read_to_string(temp.path().join("Makefile")).unwrap();
        assert!(makefile.starts_with("CC = g++\n"));
        assert!(!makefile.contains("xxx"));
    }

    #[test]
    fn test_invalid_plot_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("out");
        let b = bench(&dir).with_plots(vec![
            Plot::new("p").with_runs(vec![PlotRun::raw("nope")]).into(),
        ]);

        let err = BenchProject::new(&b).write_all().unwrap_err();

        assert!(matches!(err, EmitError::UnknownRun { .. }));
        assert!(!dir.exists());
    }

    #[cfg(unix)]
    fn mode(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_write_all_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let makefile = temp.path().join("Makefile");
        fs::write(&makefile, "old").unwrap();
        fs::set_permissions(&makefile, fs::Permissions::from_mode(0o644)).unwrap();
        let b = bench(temp.path());

        BenchProject::new(&b).write_all().unwrap();

        assert_eq!(mode(&makefile), 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_all_new_files_use_default_mode() {
        let temp = tempfile::tempdir().unwrap();
        let reference = temp.path().join("reference");
        fs::write(&reference, "").unwrap();
        let dir = temp.path().join("out");
        let b = bench(&dir);

        let files = BenchProject::new(&b).write_all().unwrap();

        assert_eq!(mode(&files.graph), mode(&reference));
        assert_eq!(mode(&files.makefile), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_keeps_unusual_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("graph.tex");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&path, "new").unwrap();

        assert_eq!(mode(&path), 0o640);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("file.txt");
        write_atomic(&path, "one").unwrap();
        write_atomic(&path, "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }
}
