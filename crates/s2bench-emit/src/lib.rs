//! Makefile and chart generation for s2bench.
//!
//! A [`BuildPlan`] resolves every filename of a benchmark once; the graph and
//! Makefile generators render from it, and [`BenchProject`] writes the result.

mod config;
mod error;
mod graph;
mod makefile;
mod plan;
mod project;
mod steps;

pub use config::*;
pub use error::*;
pub use graph::*;
pub use makefile::*;
pub use plan::*;
pub use project::*;
pub use steps::*;
