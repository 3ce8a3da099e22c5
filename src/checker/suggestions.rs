use crate::checker::dictionary::Dictionary;
use std::collections::BTreeSet;

/// Corrections for `word`, looked up under the word itself and under its
/// lowercase form. The union is deduplicated, sorted byte-wise and then
/// re-cased to follow `word` (see [`same_case`]).
pub fn generate(word: &str, dictionary: &Dictionary) -> Vec<String> {
    let lower = word.to_lowercase();

    let candidates: BTreeSet<&str> = [dictionary.get(word), dictionary.get(&lower)]
        .into_iter()
        .flatten()
        .flatten()
        .map(String::as_str)
        .collect();

    candidates
        .into_iter()
        .map(|candidate| same_case(word, candidate))
        .collect()
}

/// Return `destination` capitalized when `source` starts with an uppercase
/// letter, otherwise unchanged.
///
/// A lowercase source never lowers the destination: `"Apple"` may well be
/// the first word of a sentence.
pub fn same_case(source: &str, destination: &str) -> String {
    match source.chars().next() {
        Some(first) if first.is_uppercase() => capitalize(destination),
        _ => destination.to_string(),
    }
}

/// First character in titlecase, the rest lowercased
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut capitalized = titlecase(first);
            capitalized.push_str(&chars.as_str().to_lowercase());
            capitalized
        }
        None => String::new(),
    }
}

/// Titlecase mapping of a single character.
///
/// This is the uppercase mapping except for digraphs, ligatures, Georgian
/// and Greek letters with iota subscript, where only the leading part is
/// uppercased (`ß` → `Ss`, `ǆ` → `ǅ`).
fn titlecase(c: char) -> String {
    let special = match c {
        '\u{1C4}'..='\u{1C6}' => "\u{1C5}",
        '\u{1C7}'..='\u{1C9}' => "\u{1C8}",
        '\u{1CA}'..='\u{1CC}' => "\u{1CB}",
        '\u{1F1}'..='\u{1F3}' => "\u{1F2}",
        '\u{149}' => "\u{2BC}N",
        '\u{1FB3}' | '\u{1FBC}' => "\u{1FBC}",
        '\u{1FC3}' | '\u{1FCC}' => "\u{1FCC}",
        '\u{1FF3}' | '\u{1FFC}' => "\u{1FFC}",
        '\u{1FB2}' => "\u{1FBA}\u{345}",
        '\u{1FB4}' => "\u{386}\u{345}",
        '\u{1FB7}' => "\u{391}\u{342}\u{345}",
        '\u{1FC2}' => "\u{1FCA}\u{345}",
        '\u{1FC4}' => "\u{389}\u{345}",
        '\u{1FC7}' => "\u{397}\u{342}\u{345}",
        '\u{1FF2}' => "\u{1FFA}\u{345}",
        '\u{1FF4}' => "\u{38F}\u{345}",
        '\u{1FF7}' => "\u{3A9}\u{342}\u{345}",
        // Mkhedruli letters are their own titlecase
        '\u{10D0}'..='\u{10FA}' | '\u{10FD}'..='\u{10FF}' => return c.to_string(),
        // ᾀ..ᾯ: the titlecase letter sits 8 code points up
        '\u{1F80}'..='\u{1FAF}' => {
            return char::from_u32(u32::from(c) | 0x8).unwrap_or(c).to_string();
        }
        _ => "",
    };
    if !special.is_empty() {
        return special.to_string();
    }

    let mut upper = c.to_uppercase();
    let mut titled = String::new();
    if let Some(first) = upper.next() {
        titled.push(first);
    }
    titled.extend(upper.flat_map(char::to_lowercase));
    titled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> Dictionary {
        Dictionary::from_entries([
            ("foo", vec!["baz", "bar"]),
            ("Foo", vec!["bar", "qux"]),
            ("teh", vec!["the"]),
            ("alot", vec!["a lot", "allot"]),
        ])
    }

    #[test]
    fn test_same_case() {
        assert_eq!(same_case("Apple", "apple"), "Apple");
        assert_eq!(same_case("apple", "Apple"), "Apple");
        assert_eq!(same_case("Teh", "tHE"), "The");
    }

    #[test]
    fn test_same_case_with_empty_destination() {
        assert_eq!(same_case("apple", ""), "");
        assert_eq!(same_case("Apple", ""), "");
    }

    #[test]
    fn test_same_case_with_empty_source() {
        assert_eq!(same_case("", "apple"), "apple");
        assert_eq!(same_case("", "Apple"), "Apple");
    }

    #[test]
    fn test_same_case_uses_titlecase() {
        assert_eq!(same_case("A", "ßx"), "Ssx");
        assert_eq!(same_case("Z", "ǆx"), "ǅx");
        assert_eq!(same_case("F", "ﬁne"), "Fine");
        assert_eq!(same_case("W", "ᾳx"), "ᾼx");
        assert_eq!(same_case("G", "ბx"), "ბx");
        assert_eq!(same_case("É", "éCOLE"), "École");
    }

    #[test]
    fn test_same_case_non_letter_source() {
        assert_eq!(same_case("1st", "first"), "first");
    }

    #[test]
    fn test_suggestions_union_of_exact_and_lowercase() {
        let dict = dictionary();
        assert_eq!(generate("foo", &dict), vec!["bar", "baz"]);
        assert_eq!(generate("Foo", &dict), vec!["Bar", "Baz", "Qux"]);
    }

    #[test]
    fn test_suggestions_follow_source_case() {
        let dict = dictionary();
        assert_eq!(generate("Teh", &dict), vec!["The"]);
        assert_eq!(generate("TEH", &dict), vec!["The"]);
        assert_eq!(generate("Alot", &dict), vec!["A lot", "Allot"]);
    }

    #[test]
    fn test_unknown_word_has_no_suggestions() {
        assert!(generate("fine", &dictionary()).is_empty());
        assert!(generate("", &dictionary()).is_empty());
    }

    #[test]
    fn test_suggestions_are_stable() {
        let dict = dictionary();
        assert_eq!(generate("Foo", &dict), generate("Foo", &dict));
    }
}
