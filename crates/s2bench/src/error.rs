use std::path::PathBuf;

use thiserror::Error;

/// s2bench errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Emit(#[from] s2bench_emit::EmitError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid benchmark definition {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
