use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up a run: loading dictionaries, compiling
/// matchers and preparing output files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: expected `<misspelling> <correction>`", path.display())]
    Format { path: PathBuf, line: usize },

    #[error("{}:{line}: expected `<misspelling>-><correction>[, <correction>...]`", path.display())]
    ListFormat { path: PathBuf, line: usize },

    #[error("Invalid JSON dictionary {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: no correction listed for `{word}`", path.display())]
    EmptyCorrections { path: PathBuf, word: String },

    #[error("The sed script file \"{}\" must not exist", .0.display())]
    OutputExists(PathBuf),

    #[error("Invalid ignore marker: {0}")]
    IgnoreMarkers(#[from] aho_corasick::BuildError),

    #[error("Invalid exclude pattern: {0}")]
    Exclude(#[from] regex::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that stop a single file from being scanned. They are collected
/// alongside the findings and never abort the rest of the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not valid UTF-8 text: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
}
