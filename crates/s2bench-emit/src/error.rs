use std::path::PathBuf;

use thiserror::Error;

/// Generation errors.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("plot '{plot}' references unknown run '{run}'")]
    UnknownRun { plot: String, run: String },
    #[error("plot '{plot}' references run '{run}', which names more than one run")]
    AmbiguousRun { plot: String, run: String },
}

pub type Result<T> = std::result::Result<T, EmitError>;
