use crate::checker::dictionary::DictionarySource;
use crate::checker::DEFAULT_IGNORE_MARKER;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = ".misspellings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lines containing any of these strings are not checked
    pub ignore_markers: Vec<String>,

    /// Extra regexes for directory names to skip
    pub exclude_dirs: Vec<String>,

    /// Extra regexes for file names to skip
    pub exclude_files: Vec<String>,

    pub misspelling_file: Option<PathBuf>,
    pub json_file: Option<PathBuf>,
    pub dictionary_dir: Option<PathBuf>,

    /// Worker threads for scanning; defaults to one per CPU
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_markers: vec![DEFAULT_IGNORE_MARKER.to_string()],
            exclude_dirs: Vec::new(),
            exclude_files: Vec::new(),
            misspelling_file: None,
            json_file: None,
            dictionary_dir: None,
            jobs: None,
        }
    }
}

/// Values given on the command line; they win over every config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dictionary: Option<DictionarySource>,
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG);
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        if let Some(source) = overrides.dictionary {
            config.set_dictionary(source);
        }
        if overrides.jobs.is_some() {
            config.jobs = overrides.jobs;
        }

        // Reject conflicting files early, before any input is read
        config.dictionary_source()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Merge logic: other's values override self's if they differ from defaults
        let defaults = Self::default();
        if other.ignore_markers != defaults.ignore_markers {
            self.ignore_markers = other.ignore_markers;
        }
        if !other.exclude_dirs.is_empty() {
            self.exclude_dirs = other.exclude_dirs;
        }
        if !other.exclude_files.is_empty() {
            self.exclude_files = other.exclude_files;
        }
        if other.misspelling_file.is_some()
            || other.json_file.is_some()
            || other.dictionary_dir.is_some()
        {
            self.misspelling_file = other.misspelling_file;
            self.json_file = other.json_file;
            self.dictionary_dir = other.dictionary_dir;
        }
        if other.jobs.is_some() {
            self.jobs = other.jobs;
        }
        self
    }

    fn set_dictionary(&mut self, source: DictionarySource) {
        self.misspelling_file = None;
        self.json_file = None;
        self.dictionary_dir = None;
        match source {
            DictionarySource::Bundled => {}
            DictionarySource::AssetDir(dir) => self.dictionary_dir = Some(dir),
            DictionarySource::Text(path) => self.misspelling_file = Some(path),
            DictionarySource::Json(path) => self.json_file = Some(path),
        }
    }

    /// The one dictionary source selected by this configuration
    pub fn dictionary_source(&self) -> Result<DictionarySource> {
        match (&self.misspelling_file, &self.json_file, &self.dictionary_dir) {
            (None, None, None) => Ok(DictionarySource::Bundled),
            (Some(path), None, None) => Ok(DictionarySource::Text(path.clone())),
            (None, Some(path), None) => Ok(DictionarySource::Json(path.clone())),
            (None, None, Some(dir)) => Ok(DictionarySource::AssetDir(dir.clone())),
            _ => anyhow::bail!(
                "Only one of misspelling_file, json_file and dictionary_dir may be set"
            ),
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "misspellings").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
