//! `graph.tex`: a pgfplots chart overlaying a left and an optional right axis.
//!
//! The picture is wrapped in `\beginpgfgraphicnamed{bench}` so it can be
//! externalized under that name.

use s2bench_model::{GraphSpec, Side};
use tracing::debug;

use crate::plan::{BuildPlan, PlotTarget};

/// Placeholder series: takes a bar slot, draws nothing.
pub const STUB_PLOT: &str = r"\addplot[draw=none, fill=none] coordinates {(0,0)};";

/// One series drawn on an axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEntry {
    Input { file: String, legend: String },
    Stub,
}

impl GraphEntry {
    fn render(&self) -> String {
        match self {
            Self::Input { file, legend } => {
                format!("      \\input{{{file}}}\n      \\addlegendentry{{{legend}}}\n")
            }
            Self::Stub => format!("      {STUB_PLOT}\n"),
        }
    }
}

/// Series drawn on `side`, in definition order.
///
/// Without plot directives every run is its own series; otherwise the plot
/// list decides.
pub fn graph_entries(plan: &BuildPlan<'_>, side: Side) -> Vec<GraphEntry> {
    if !plan.uses_plots() {
        return plan
            .runs
            .iter()
            .filter(|target| target.run.side == side)
            .map(|target| {
                debug!(run = %target.run.name, %side, "plot entry");
                GraphEntry::Input {
                    file: target.tex_file(),
                    legend: target.run.name.clone(),
                }
            })
            .collect();
    }

    plan.plots
        .iter()
        .filter(|target| target.side() == side)
        .map(|target| match target {
            PlotTarget::Series { plot, stem, .. } => {
                debug!(plot = %plot.name, %side, "plot entry");
                GraphEntry::Input {
                    file: format!("{stem}.tex"),
                    legend: plot.name.clone(),
                }
            }
            PlotTarget::Stub { .. } => GraphEntry::Stub,
        })
        .collect()
}

fn ymax_option(ymax: Option<f64>) -> String {
    ymax.map_or_else(String::new, |v| format!(" ymax={v},"))
}

/// Optional option lines shared by both axes.
fn extra_options(graph: &GraphSpec, axis_params: &str) -> String {
    let mut s = String::new();
    if !graph.arrowheads {
        s.push_str("      axis line style={-},\n");
    }
    if !axis_params.is_empty() {
        s.push_str("      ");
        s.push_str(axis_params);
        s.push_str(",\n");
    }
    s
}

fn render_entries(entries: &[GraphEntry]) -> String {
    entries.iter().map(GraphEntry::render).collect()
}

fn gen_left_axis(graph: &GraphSpec, entries: &[GraphEntry]) -> String {
    format!(
        r"    \begin{{axis}}[
      title={{\textbf{{{title}}}}},
      width={width}cm, height={height}cm,
      axis lines=left,
      grid=major,
      xlabel={{{xlabel}}}, ylabel={{{ylabel}}},{ymax}
{extra}      legend style={{at={{(0,-0.1)}},anchor=north west}}
    ]
{entries}    \end{{axis}}
",
        title = graph.title,
        width = graph.width,
        height = graph.height,
        xlabel = graph.xlabel,
        ylabel = graph.ylabel,
        ymax = ymax_option(graph.ymax),
        extra = extra_options(graph, &graph.axis_params),
        entries = render_entries(entries),
    )
}

fn gen_right_axis(graph: &GraphSpec, entries: &[GraphEntry]) -> String {
    format!(
        r"    \begin{{axis}}[
      width={width}cm, height={height}cm,
      axis lines=right,
      axis x line=none,
      grid=major,
      ylabel={{{ylabel}}},{ymax}
{extra}      legend style={{at={{(1,-0.1)}},anchor=north east}}
    ]
{entries}    \end{{axis}}
",
        width = graph.width,
        height = graph.height,
        ylabel = graph.ylabel_right,
        ymax = ymax_option(graph.ymax_right),
        extra = extra_options(graph, &graph.axis_params_right),
        entries = render_entries(entries),
    )
}

/// Render the complete `graph.tex` document.
pub fn gen_graph(plan: &BuildPlan<'_>) -> String {
    let graph = &plan.benchmark.graph;

    let left = gen_left_axis(graph, &graph_entries(plan, Side::Left));
    let right = if graph.has_right_axis() {
        gen_right_axis(graph, &graph_entries(plan, Side::Right))
    } else {
        String::new()
    };

    format!(
        r"\documentclass{{article}}
\usepackage{{graphics}}
\usepackage{{tikz}}
\usepackage{{pgfplots}}

\begin{{document}}

\beginpgfgraphicnamed{{bench}}
  \begin{{tikzpicture}}
    \pgfplotsset{{set layers}}
{left}{right}  \end{{tikzpicture}}
\endpgfgraphicnamed

\end{{document}}
"
    )
}
