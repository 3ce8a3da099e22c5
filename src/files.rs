use crate::error::{Error, Result};
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directory names never descended into
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    r"^\.(git|github|mypy_cache|pytest_cache|idea|vscode)$",
    r"local$",
    r"\.egg(-info)?$",
    r"^(CVS|bin|node_modules|__pycache__|json_sources|test_assets|build|dist|target)$",
];

/// File names skipped while walking a directory
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[
    r"\.(pyc|so|o|a|sh|txt|coverage|gitignore|python-version)$",
    r"^LICENSE$",
];

/// Name patterns pruned when expanding directories
#[derive(Debug, Clone)]
pub struct ExcludeRules {
    dirs: Vec<Regex>,
    files: Vec<Regex>,
}

impl ExcludeRules {
    /// Default rules extended with `extra_dirs` and `extra_files`
    pub fn new<S: AsRef<str>>(extra_dirs: &[S], extra_files: &[S]) -> Result<Self> {
        Ok(Self {
            dirs: compile(DEFAULT_EXCLUDED_DIRS.iter().copied(), extra_dirs)?,
            files: compile(DEFAULT_EXCLUDED_FILES.iter().copied(), extra_files)?,
        })
    }

    /// Rules that exclude nothing
    pub fn none() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    fn excludes_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|re| re.is_match(name))
    }

    fn excludes_file(&self, name: &str) -> bool {
        self.files.iter().any(|re| re.is_match(name))
    }

    fn keep(&self, entry: &DirEntry) -> bool {
        // The walk root was named explicitly
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_dir() {
            !self.excludes_dir(&name)
        } else {
            !self.excludes_file(&name)
        }
    }
}

fn compile<'a, S: AsRef<str>>(
    defaults: impl Iterator<Item = &'a str>,
    extra: &'a [S],
) -> Result<Vec<Regex>> {
    defaults
        .chain(extra.iter().map(AsRef::as_ref))
        .map(|pattern| Regex::new(pattern).map_err(Error::from))
        .collect()
}

/// Replace directories by the files they contain, recursively and in
/// file-name order. Other paths are kept as given, even when they do not
/// exist, so the scan can report them.
pub fn expand_paths(paths: &[PathBuf], rules: &ExcludeRules) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| rules.keep(entry));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => debug!(error = %e, "skipping unreadable directory entry"),
            }
        }
    }

    debug!(files = files.len(), "expanded input paths");
    files
}

/// Read a list of paths, one per line. `-` reads standard input.
pub fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        return parse_file_list(stdin.lock()).map_err(|e| Error::io(path, e));
    }

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    parse_file_list(BufReader::new(file)).map_err(|e| Error::io(path, e))
}

fn parse_file_list<R: BufRead>(reader: R) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            paths.push(PathBuf::from(line));
        }
    }
    Ok(paths)
}
