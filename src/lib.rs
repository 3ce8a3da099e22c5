pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod files;
pub mod script;

pub use checker::dictionary::{Dictionary, DictionarySource};
pub use checker::Misspellings;
pub use config::Config;
pub use error::{Error, Result, ScanError};

use std::path::PathBuf;

/// One occurrence of a misspelled word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub path: PathBuf,
    pub line: usize,
    pub word: String,
}

/// Result of checking a single file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
    pub error: Option<ScanError>,
}
