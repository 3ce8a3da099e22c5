//! Correction scripts: portable `cp`/`sed`/`mv` commands that apply chosen
//! corrections to the scanned files.

use crate::checker::Misspellings;
use crate::error::{Error, Result};
use crate::Finding;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

/// A misspelling with more than one possible correction
#[derive(Debug, Clone, Copy)]
pub struct ChoiceRequest<'a> {
    pub path: &'a Path,
    pub line: usize,
    pub word: &'a str,
    pub suggestions: &'a [String],
}

/// Picks the replacement for an ambiguous misspelling.
///
/// Returning an empty string accepts the session default for the word.
/// Returning the misspelled word itself leaves it untouched.
pub trait SuggestionChooser {
    fn choose(&mut self, request: &ChoiceRequest<'_>, session: &ChoiceSession) -> io::Result<String>;
}

impl<F> SuggestionChooser for F
where
    F: FnMut(&ChoiceRequest<'_>, &ChoiceSession) -> io::Result<String>,
{
    fn choose(&mut self, request: &ChoiceRequest<'_>, session: &ChoiceSession) -> io::Result<String> {
        self(request, session)
    }
}

/// Choices made so far in one run, remembered per misspelled word
#[derive(Debug, Default)]
pub struct ChoiceSession {
    last_choices: HashMap<String, String>,
}

impl ChoiceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last choice made for `word`, or its first suggestion
    pub fn default_choice<'a>(&'a self, word: &str, suggestions: &'a [String]) -> Option<&'a str> {
        self.last_choices
            .get(word)
            .or_else(|| suggestions.first())
            .map(String::as_str)
    }

    pub fn last_choice(&self, word: &str) -> Option<&str> {
        self.last_choices.get(word).map(String::as_str)
    }

    /// Decide the replacement for a finding. A single suggestion is taken as
    /// is; several go through `chooser`. `None` means leave the word alone.
    pub fn resolve<C>(&mut self, chooser: &mut C, request: &ChoiceRequest<'_>) -> io::Result<Option<String>>
    where
        C: SuggestionChooser + ?Sized,
    {
        let choice = match request.suggestions {
            [] => return Ok(None),
            [only] => only.clone(),
            _ => {
                let answer = chooser.choose(request, self)?;
                let answer = answer.trim();
                let choice = if answer.is_empty() {
                    self.default_choice(request.word, request.suggestions)
                        .unwrap_or(request.word)
                        .to_string()
                } else {
                    answer.to_string()
                };
                self.last_choices
                    .insert(request.word.to_string(), choice.clone());
                choice
            }
        };

        if choice == request.word {
            Ok(None)
        } else {
            Ok(Some(choice))
        }
    }
}

/// Writes a shell script replacing misspellings line by line with `sed`
pub struct ScriptWriter<W: Write> {
    out: W,
    session: ChoiceSession,
}

impl ScriptWriter<BufWriter<File>> {
    /// Create the script file. It must not exist yet so a forgotten script
    /// argument never clobbers a source file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => Error::OutputExists(path.to_path_buf()),
                _ => Error::io(path, e),
            })?;

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ScriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            session: ChoiceSession::new(),
        }
    }

    /// Resolve each finding and write commands for those that get a
    /// replacement. Returns the number of replacements written.
    pub fn write_findings<C>(
        &mut self,
        engine: &Misspellings,
        findings: &[Finding],
        chooser: &mut C,
    ) -> io::Result<usize>
    where
        C: SuggestionChooser + ?Sized,
    {
        let mut written = 0;

        for finding in findings {
            let suggestions = engine.suggestions(&finding.word);
            let request = ChoiceRequest {
                path: &finding.path,
                line: finding.line,
                word: &finding.word,
                suggestions: &suggestions,
            };

            if let Some(replacement) = self.session.resolve(chooser, &request)? {
                self.write_replacement(finding, &replacement)?;
                written += 1;
            }
        }

        Ok(written)
    }

    pub fn write_replacement(&mut self, finding: &Finding, replacement: &str) -> io::Result<()> {
        let file = esc_file(&finding.path);
        writeln!(self.out, "cp \"{file}\" \"{file},\"")?;
        writeln!(
            self.out,
            "sed \"{}s/{}/{}/\" \"{file}\" > \"{file},\"",
            finding.line,
            esc_sed(&finding.word),
            esc_sed(replacement)
        )?;
        writeln!(self.out, "mv \"{file},\" \"{file}\"")
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Escape text for a double-quoted `sed` substitution
pub fn esc_sed(raw: &str) -> String {
    raw.replace('"', "\\\"").replace('/', "\\/")
}

/// Escape a path for the shell script
pub fn esc_file(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\"'\"'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dictionary;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn finding(line: usize, word: &str) -> Finding {
        Finding {
            path: PathBuf::from("src/main.c"),
            line,
            word: word.to_string(),
        }
    }

    #[test]
    fn test_escaping() {
        assert_eq!(esc_sed(r#"a/b "c""#), r#"a\/b \"c\""#);
        assert_eq!(esc_file(Path::new("it's.c")), r#"it'"'"'s.c"#);
    }

    #[test]
    fn test_single_suggestion_is_not_prompted() {
        let mut session = ChoiceSession::new();
        let suggestions = strings(&["the"]);
        let request = ChoiceRequest {
            path: Path::new("a.c"),
            line: 1,
            word: "teh",
            suggestions: &suggestions,
        };

        let mut chooser = |_: &ChoiceRequest<'_>, _: &ChoiceSession| -> io::Result<String> {
            panic!("chooser should not be called")
        };
        let choice = session.resolve(&mut chooser, &request).unwrap();
        assert_eq!(choice.as_deref(), Some("the"));
    }

    #[test]
    fn test_no_suggestion_means_no_replacement() {
        let mut session = ChoiceSession::new();
        let request = ChoiceRequest {
            path: Path::new("a.c"),
            line: 1,
            word: "teh",
            suggestions: &[],
        };
        let mut chooser =
            |_: &ChoiceRequest<'_>, _: &ChoiceSession| -> io::Result<String> { Ok(String::from("x")) };
        assert_eq!(session.resolve(&mut chooser, &request).unwrap(), None);
    }

    #[test]
    fn test_session_remembers_last_choice() {
        let mut session = ChoiceSession::new();
        let suggestions = strings(&["which", "witch"]);
        let request = ChoiceRequest {
            path: Path::new("a.c"),
            line: 1,
            word: "wich",
            suggestions: &suggestions,
        };

        let mut answers = vec![String::new(), "witch".to_string(), String::new()].into_iter();
        let mut defaults = Vec::new();
        let mut chooser = |req: &ChoiceRequest<'_>, session: &ChoiceSession| -> io::Result<String> {
            defaults.push(session.default_choice(req.word, req.suggestions).map(str::to_string));
            Ok(answers.next().unwrap())
        };

        let picks: Vec<Option<String>> = (0..3)
            .map(|_| session.resolve(&mut chooser, &request).unwrap())
            .collect();

        assert_eq!(
            picks,
            vec![
                Some("which".to_string()),
                Some("witch".to_string()),
                Some("witch".to_string())
            ]
        );
        assert_eq!(
            defaults,
            vec![
                Some("which".to_string()),
                Some("which".to_string()),
                Some("witch".to_string())
            ]
        );
        assert_eq!(session.last_choice("wich"), Some("witch"));
    }

    #[test]
    fn test_keeping_the_word_skips_it() {
        let mut session = ChoiceSession::new();
        let suggestions = strings(&["which", "witch"]);
        let request = ChoiceRequest {
            path: Path::new("a.c"),
            line: 1,
            word: "wich",
            suggestions: &suggestions,
        };
        let mut chooser =
            |req: &ChoiceRequest<'_>, _: &ChoiceSession| -> io::Result<String> { Ok(req.word.to_string()) };
        assert_eq!(session.resolve(&mut chooser, &request).unwrap(), None);
    }

    #[test]
    fn test_script_commands() {
        let engine = Misspellings::new(Dictionary::from_entries([
            ("teh", vec!["the"]),
            ("wich", vec!["which", "witch"]),
            ("andor", vec!["and/or"]),
        ]))
        .unwrap();

        let findings = vec![finding(3, "Teh"), finding(7, "wich"), finding(9, "andor")];
        let mut writer = ScriptWriter::new(Vec::new());
        let mut chooser =
            |_: &ChoiceRequest<'_>, _: &ChoiceSession| -> io::Result<String> { Ok(String::new()) };

        let written = writer.write_findings(&engine, &findings, &mut chooser).unwrap();
        assert_eq!(written, 3);

        let script = String::from_utf8(writer.finish().unwrap()).unwrap();
        let expected = concat!(
            "cp \"src/main.c\" \"src/main.c,\"\n",
            "sed \"3s/Teh/The/\" \"src/main.c\" > \"src/main.c,\"\n",
            "mv \"src/main.c,\" \"src/main.c\"\n",
            "cp \"src/main.c\" \"src/main.c,\"\n",
            "sed \"7s/wich/which/\" \"src/main.c\" > \"src/main.c,\"\n",
            "mv \"src/main.c,\" \"src/main.c\"\n",
            "cp \"src/main.c\" \"src/main.c,\"\n",
            "sed \"9s/andor/and\\/or/\" \"src/main.c\" > \"src/main.c,\"\n",
            "mv \"src/main.c,\" \"src/main.c\"\n",
        );
        assert_eq!(script, expected);
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fix.sh");
        std::fs::write(&path, "keep me").unwrap();

        let err = ScriptWriter::create(&path).err().unwrap();
        assert!(matches!(err, Error::OutputExists(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }
}
