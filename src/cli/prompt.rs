use crate::script::{ChoiceRequest, ChoiceSession, SuggestionChooser};
use console::Term;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::Input;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Asks on the terminal which correction to use. Falls back to plain
/// stdin/stdout when not attached to a terminal, so answers can be piped in.
pub struct TerminalChooser {
    colored: bool,
}

impl TerminalChooser {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }
}

impl SuggestionChooser for TerminalChooser {
    fn choose(&mut self, request: &ChoiceRequest<'_>, session: &ChoiceSession) -> io::Result<String> {
        let default = session
            .default_choice(request.word, request.suggestions)
            .unwrap_or(request.word)
            .to_string();
        let context = read_line_at(request.path, request.line).unwrap_or_default();
        let listed = request.suggestions.join(",");

        if Term::stderr().is_term() {
            let colorful = ColorfulTheme::default();
            let theme: &dyn Theme = if self.colored { &colorful } else { &SimpleTheme };

            eprintln!("> {}", context);
            return Input::<String>::with_theme(theme)
                .with_prompt(format!("Replace \"{}\" with one of {}", request.word, listed))
                .default(default)
                .interact_text()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        write!(
            out,
            "> {}\nReplace \"{}\" with one of {}\nChoose [{}]:",
            context, request.word, listed, default
        )?;
        out.flush()?;

        // EOF counts as accepting the default
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

/// Line `line` (1-based) of `path` without its line ending
fn read_line_at(path: &Path, line: usize) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    content
        .lines()
        .nth(line.checked_sub(1)?)
        .map(|text| text.to_string())
}
