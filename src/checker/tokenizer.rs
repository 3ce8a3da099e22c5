use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A lowercase letter directly followed by an uppercase one marks a camelCase boundary
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();
    // Whitespace, underscores, digits and anything that is not a word character
    static ref SEPARATORS: Regex = Regex::new(r"[\s_0-9\W]+").unwrap();
}

/// Split a line of source text into candidate words.
///
/// camelCase identifiers are broken at every lowercase→uppercase transition,
/// then the line is split on runs of separators and each piece has its
/// surrounding punctuation removed. Order and duplicates are preserved, and a
/// separator at either end of the line produces an empty word there
/// (`"a sentence."` gives `["a", "sentence", ""]`).
pub fn split_words(line: &str) -> Vec<String> {
    let expanded = CAMEL_BOUNDARY.replace_all(line, "${1} ${2}");

    SEPARATORS
        .split(&expanded)
        .map(|word| normalize(word).to_string())
        .collect()
}

/// Strip ASCII punctuation from both ends of a word.
pub fn normalize(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_ascii_punctuation())
}
