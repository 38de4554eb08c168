//! Benchmark description model for s2bench.
//!
//! Pure data: runs, steps, plot directives and the graph/build metadata a
//! benchmark definition carries. Nothing here touches the filesystem; the
//! generator lives in `s2bench-emit`.

mod benchmark;
mod plot;
mod run;

pub use benchmark::*;
pub use plot::*;
pub use run::*;
