//! Error types for loading, configuration and result writing

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Malformed rows are never reported here; they are skipped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed writing results to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Label used for reader-based loads that have no file path
pub(crate) const READER_PATH: &str = "<reader>";

pub(crate) fn read_error(source: io::Error) -> Error {
    Error::Read {
        path: PathBuf::from(READER_PATH),
        source,
    }
}
