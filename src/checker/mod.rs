pub mod dictionary;
pub mod suggestions;
pub mod tokenizer;

use crate::error::{Result, ScanError};
use crate::{FileReport, Finding};
use aho_corasick::AhoCorasick;
use dictionary::{Dictionary, DictionarySource};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lines containing this text are not checked
pub const DEFAULT_IGNORE_MARKER: &str = "# ignore-misspelling";

/// Finds dictionary misspellings in text and suggests their corrections.
///
/// The engine owns an immutable [`Dictionary`] and holds no other state, so
/// one instance can be shared by every worker scanning files.
pub struct Misspellings {
    dictionary: Dictionary,
    ignore_markers: Option<AhoCorasick>,
}

impl Misspellings {
    /// Engine using the default ignore marker
    pub fn new(dictionary: Dictionary) -> Result<Self> {
        Self::with_ignore_markers(dictionary, &[DEFAULT_IGNORE_MARKER])
    }

    /// Load the dictionary from `source` and use the default ignore marker
    pub fn from_source(source: &DictionarySource) -> Result<Self> {
        Self::new(Dictionary::load(source)?)
    }

    /// Engine skipping every line that contains one of `markers` literally.
    /// Empty markers are ignored.
    pub fn with_ignore_markers<S: AsRef<str>>(dictionary: Dictionary, markers: &[S]) -> Result<Self> {
        let markers: Vec<&str> = markers
            .iter()
            .map(AsRef::as_ref)
            .filter(|marker| !marker.is_empty())
            .collect();

        let ignore_markers = if markers.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(markers)?)
        };

        Ok(Self {
            dictionary,
            ignore_markers,
        })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// A word is misspelled when it, or its lowercase form, is a dictionary key
    pub fn is_misspelled(&self, word: &str) -> bool {
        self.dictionary.contains(word) || self.dictionary.contains(&word.to_lowercase())
    }

    pub fn suggestions(&self, word: &str) -> Vec<String> {
        suggestions::generate(word, &self.dictionary)
    }

    /// Every (misspelling, correction) pair of the dictionary, sorted
    pub fn dump(&self) -> Vec<(String, String)> {
        self.dictionary.dump()
    }

    fn is_ignored(&self, line: &str) -> bool {
        self.ignore_markers
            .as_ref()
            .map_or(false, |markers| markers.is_match(line))
    }

    /// Check already-decoded text. Lines are numbered from 1, and skipped
    /// lines still count.
    pub fn check_str(&self, path: &Path, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            if self.is_ignored(line) {
                continue;
            }

            for word in tokenizer::split_words(line) {
                if self.is_misspelled(&word) {
                    findings.push(Finding {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        word,
                    });
                }
            }
        }

        findings
    }

    /// Check one file. Read and decode failures end up in the report instead
    /// of being returned.
    pub fn check_file(&self, path: &Path) -> FileReport {
        match read_text(path) {
            Ok(content) => FileReport {
                path: path.to_path_buf(),
                findings: self.check_str(path, &content),
                error: None,
            },
            Err(error) => {
                debug!(path = %path.display(), %error, "skipping unreadable file");
                FileReport {
                    path: path.to_path_buf(),
                    findings: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }

    /// Check files in parallel. Reports come back in the order of `paths`.
    pub fn check_files(&self, paths: &[PathBuf]) -> Vec<FileReport> {
        self.check_files_with(paths, |_| {})
    }

    /// Like [`check_files`](Self::check_files), calling `on_report` as each
    /// file completes (in completion order).
    pub fn check_files_with<F>(&self, paths: &[PathBuf], on_report: F) -> Vec<FileReport>
    where
        F: Fn(&FileReport) + Sync,
    {
        let reports: Vec<FileReport> = paths
            .par_iter()
            .map(|path| {
                let report = self.check_file(path);
                on_report(&report);
                report
            })
            .collect();

        debug!(
            files = reports.len(),
            findings = reports.iter().map(|r| r.findings.len()).sum::<usize>(),
            "scan complete"
        );

        reports
    }
}

fn read_text(path: &Path) -> std::result::Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|e| ScanError::Decode {
        path: path.to_path_buf(),
        source: e.utf8_error(),
    })
}
