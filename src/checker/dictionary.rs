use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON dictionaries compiled into the binary, merged in this order.
const BUNDLED: &[(&str, &str)] = &[
    ("wikipedia.json", include_str!("../../assets/wikipedia.json")),
    ("custom.json", include_str!("../../assets/custom.json")),
];

/// Where the misspelling dictionary comes from. Every variant fills the same
/// immutable map; they differ only in file format and merge rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DictionarySource {
    /// The JSON assets shipped with the binary
    #[default]
    Bundled,
    /// Every file in a directory, each a JSON object of word → corrections
    AssetDir(PathBuf),
    /// Flat text file with one `misspelling correction` pair per line
    Text(PathBuf),
    /// JSON object of word → corrections, keeping only the first correction
    Json(PathBuf),
}

/// Immutable mapping from a misspelled word to its known corrections.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, Vec<String>>,
}

impl Dictionary {
    /// Build the dictionary for the selected source
    pub fn load(source: &DictionarySource) -> Result<Self> {
        let dictionary = match source {
            DictionarySource::Bundled => Self::bundled()?,
            DictionarySource::AssetDir(dir) => Self::from_asset_dir(dir)?,
            DictionarySource::Text(path) => Self::from_text_file(path)?,
            DictionarySource::Json(path) => Self::from_json_file(path)?,
        };

        debug!(entries = dictionary.len(), ?source, "loaded misspelling dictionary");
        Ok(dictionary)
    }

    /// Merge the bundled assets; later assets override earlier ones per word.
    pub fn bundled() -> Result<Self> {
        let mut dictionary = Self::default();
        for (name, content) in BUNDLED {
            dictionary.merge_json(Path::new(name), content)?;
        }
        Ok(dictionary)
    }

    /// Merge every regular file of `dir` in file-name order, last file wins.
    pub fn from_asset_dir(dir: &Path) -> Result<Self> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let path = entry.map_err(|e| Error::io(dir, e))?.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut dictionary = Self::default();
        for path in files {
            let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            dictionary.merge_json(&path, &content)?;
        }
        Ok(dictionary)
    }

    /// Load a flat `misspelling correction` file. Only the first space
    /// separates the two halves, and repeated misspellings accumulate.
    pub fn from_text_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse_text(path, &content)
    }

    fn parse_text(path: &Path, content: &str) -> Result<Self> {
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (bad_word, correction) = line.split_once(' ').ok_or_else(|| Error::Format {
                path: path.to_path_buf(),
                line: idx + 1,
            })?;

            entries
                .entry(bad_word.to_string())
                .or_default()
                .push(correction.to_string());
        }

        Ok(Self { entries })
    }

    /// Load a JSON correction file, keeping only the first correction listed
    /// for each word.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let raw = parse_json(path, &content)?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (bad_word, corrections) in raw {
            let first = corrections.into_iter().next().ok_or_else(|| Error::EmptyCorrections {
                path: path.to_path_buf(),
                word: bad_word.clone(),
            })?;
            entries.insert(bad_word, vec![first]);
        }

        Ok(Self { entries })
    }

    /// Build a dictionary directly from word → corrections pairs
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(word, corrections)| {
                (
                    word.into(),
                    corrections.into_iter().map(Into::into).collect::<Vec<String>>(),
                )
            })
            .filter(|(_, corrections)| !corrections.is_empty())
            .collect();

        Self { entries }
    }

    fn merge_json(&mut self, origin: &Path, content: &str) -> Result<()> {
        for (bad_word, corrections) in parse_json(origin, content)? {
            if corrections.is_empty() {
                warn!(word = %bad_word, file = %origin.display(), "skipping misspelling without corrections");
                continue;
            }
            self.entries.insert(bad_word, corrections);
        }
        Ok(())
    }

    /// Corrections stored for exactly this key
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every (misspelling, correction) pair, sorted by misspelling. A word
    /// with several corrections appears once per correction.
    pub fn dump(&self) -> Vec<(String, String)> {
        let mut words: Vec<&String> = self.entries.keys().collect();
        words.sort();

        words
            .into_iter()
            .flat_map(|word| {
                self.entries[word]
                    .iter()
                    .map(move |correction| (word.clone(), correction.clone()))
            })
            .collect()
    }
}

fn parse_json(path: &Path, content: &str) -> Result<HashMap<String, Vec<String>>> {
    serde_json::from_str(content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::tempdir;

    #[test]
    fn test_text_dictionary_appends_corrections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("msl.txt");
        fs::write(&path, "foo bar\nfoo baz\n\nteh the\n").unwrap();

        let dict = Dictionary::from_text_file(&path).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("foo").unwrap(), ["bar", "baz"]);
        assert_eq!(dict.get("teh").unwrap(), ["the"]);
    }

    #[test]
    fn test_text_dictionary_splits_on_first_space() {
        let dict = Dictionary::parse_text(Path::new("inline"), "alot a lot\n").unwrap();
        assert_eq!(dict.get("alot").unwrap(), ["a lot"]);
    }

    #[test]
    fn test_text_dictionary_rejects_line_without_space() {
        let err = Dictionary::parse_text(Path::new("broken.txt"), "foo bar\nbroken\n").unwrap_err();
        match err {
            Error::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_text_dictionary() {
        let dir = tempdir().unwrap();
        let err = Dictionary::from_text_file(&dir.path().join("missing.txt")).unwrap_err();
        match err {
            Error::Io { source, .. } => assert_eq!(source.kind(), ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_json_dictionary_keeps_first_correction() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"recieve": ["receive", "relieve"], "teh": ["the"]}"#).unwrap();

        let dict = Dictionary::from_json_file(&path).unwrap();
        assert_eq!(dict.get("recieve").unwrap(), ["receive"]);
        assert_eq!(dict.get("teh").unwrap(), ["the"]);
    }

    #[test]
    fn test_json_dictionary_rejects_empty_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"teh": []}"#).unwrap();

        let err = Dictionary::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::EmptyCorrections { ref word, .. } if word == "teh"));
    }

    #[test]
    fn test_malformed_json_dictionary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Dictionary::from_json_file(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_asset_dir_last_file_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"teh": ["the"], "wich": ["which"]}"#).unwrap();
        fs::write(dir.path().join("b.json"), r#"{"teh": ["ten", "the"], "empty": []}"#).unwrap();

        let dict = Dictionary::from_asset_dir(dir.path()).unwrap();
        assert_eq!(dict.get("teh").unwrap(), ["ten", "the"]);
        assert_eq!(dict.get("wich").unwrap(), ["which"]);
        assert!(!dict.contains("empty"));
    }

    #[test]
    fn test_bundled_dictionary_loads() {
        let dict = Dictionary::load(&DictionarySource::Bundled).unwrap();
        assert!(dict.len() > 3000);
        assert!(dict.contains("accomodate"));
        assert_eq!(dict.get("withdrawl").unwrap(), ["withdrawal", "withdraw"]);
        assert_eq!(dict.get("unsucessful").unwrap(), ["unsuccessful"]);
    }

    #[test]
    fn test_dump_is_sorted_with_one_pair_per_correction() {
        let dict = Dictionary::from_entries([
            ("wich", vec!["which", "witch"]),
            ("abotu", vec!["about"]),
        ]);

        assert_eq!(
            dict.dump(),
            vec![
                ("abotu".to_string(), "about".to_string()),
                ("wich".to_string(), "which".to_string()),
                ("wich".to_string(), "witch".to_string()),
            ]
        );
    }
}
