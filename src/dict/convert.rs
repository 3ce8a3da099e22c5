//! Conversion of Wikipedia's "Lists of common misspellings" format
//! (`wrong->right` or `wrong->right1, right2`) into a JSON dictionary.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parse a misspelling list into word → corrections. A word listed twice
/// keeps its last line.
pub fn parse_wikipedia_list(origin: &Path, text: &str) -> Result<BTreeMap<String, Vec<String>>> {
    let mut entries = BTreeMap::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let format_error = || Error::ListFormat {
            path: origin.to_path_buf(),
            line: idx + 1,
        };

        let (wrong, right) = line.split_once("->").ok_or_else(format_error)?;
        let wrong = wrong.trim();
        let corrections: Vec<String> = right
            .split(',')
            .map(clean_correction)
            .filter(|correction| !correction.is_empty())
            .collect();

        if wrong.is_empty() || corrections.is_empty() {
            return Err(format_error());
        }

        entries.insert(wrong.to_string(), corrections);
    }

    Ok(entries)
}

fn clean_correction(raw: &str) -> String {
    raw.replace(['"', '\\'], "").trim().to_string()
}

/// Read a misspelling list and render it as pretty-printed JSON, sorted by word
pub fn convert_file(input: &Path) -> Result<String> {
    let text = fs::read_to_string(input).map_err(|e| Error::io(input, e))?;
    let entries = parse_wikipedia_list(input, &text)?;

    serde_json::to_string_pretty(&entries).map_err(|source| Error::Json {
        path: input.to_path_buf(),
        source,
    })
}
