use crate::checker::Misspellings;
use crate::{FileReport, Finding};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonFinding {
    file: String,
    line: usize,
    word: String,
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonError {
    file: String,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonOutput {
    files_checked: usize,
    total_misspellings: usize,
    misspellings: Vec<JsonFinding>,
    errors: Vec<JsonError>,
}

/// `file:line: word -> "s1","s2"`
pub fn format_finding(finding: &Finding, suggestions: &[String]) -> String {
    format!(
        "{}:{}: {} -> {}",
        finding.path.display(),
        finding.line,
        finding.word,
        quote_suggestions(suggestions)
    )
}

fn quote_suggestions(suggestions: &[String]) -> String {
    suggestions
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(",")
}

/// Print every finding to stdout and every file error to stderr.
/// Returns the number of misspellings printed.
pub fn print_reports(
    engine: &Misspellings,
    reports: &[FileReport],
    format: &OutputFormat,
    colored_output: bool,
) -> io::Result<usize> {
    match format {
        OutputFormat::Text => print_text_reports(engine, reports, colored_output),
        OutputFormat::Json => print_json_reports(engine, reports, colored_output),
    }
}

fn print_text_reports(
    engine: &Misspellings,
    reports: &[FileReport],
    colored_output: bool,
) -> io::Result<usize> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut total = 0;

    for report in reports {
        for finding in &report.findings {
            let suggestions = engine.suggestions(&finding.word);

            if colored_output {
                writeln!(
                    out,
                    "{}:{}: {} {} {}",
                    finding.path.display().to_string().bold(),
                    finding.line.to_string().blue(),
                    finding.word.red().bold(),
                    "->".dimmed(),
                    quote_suggestions(&suggestions).green()
                )?;
            } else {
                writeln!(out, "{}", format_finding(finding, &suggestions))?;
            }
            total += 1;
        }

        if let Some(error) = &report.error {
            print_error(error, colored_output);
        }
        out.flush()?;
    }

    Ok(total)
}

fn print_json_reports(
    engine: &Misspellings,
    reports: &[FileReport],
    colored_output: bool,
) -> io::Result<usize> {
    let misspellings: Vec<JsonFinding> = reports
        .iter()
        .flat_map(|report| &report.findings)
        .map(|f| JsonFinding {
            file: f.path.display().to_string(),
            line: f.line,
            word: f.word.clone(),
            suggestions: engine.suggestions(&f.word),
        })
        .collect();

    let errors: Vec<JsonError> = reports
        .iter()
        .filter_map(|report| {
            report.error.as_ref().map(|e| JsonError {
                file: report.path.display().to_string(),
                message: e.to_string(),
            })
        })
        .collect();

    // Per-file errors are reported on stderr as well
    for report in reports {
        if let Some(error) = &report.error {
            print_error(error, colored_output);
        }
    }

    let output = JsonOutput {
        files_checked: reports.len(),
        total_misspellings: misspellings.len(),
        misspellings,
        errors,
    };

    let json = serde_json::to_string_pretty(&output).map_err(io::Error::from)?;
    println!("{}", json);

    Ok(output.total_misspellings)
}

/// Write findings in the plain text format, e.g. for `--export-file`
pub fn export_reports<W: Write>(
    engine: &Misspellings,
    reports: &[FileReport],
    out: &mut W,
) -> io::Result<()> {
    for finding in reports.iter().flat_map(|report| &report.findings) {
        writeln!(out, "{}", format_finding(finding, &engine.suggestions(&finding.word)))?;
    }
    out.flush()
}

/// `misspelling correction`, one pair per line
pub fn print_dump(pairs: &[(String, String)]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (word, correction) in pairs {
        writeln!(out, "{} {}", word, correction)?;
    }
    out.flush()
}

pub fn print_error(error: &dyn fmt::Display, colored: bool) {
    if colored {
        eprintln!("{} {}", "ERROR:".red().bold(), error);
    } else {
        eprintln!("ERROR: {}", error);
    }
}

pub fn print_check_summary(total: usize, files: usize, colored: bool) {
    println!();
    if total == 0 {
        if colored {
            println!("{}", "✓ No misspellings found!".green().bold());
        } else {
            println!("✓ No misspellings found!");
        }
    } else {
        let noun = if total == 1 { "misspelling" } else { "misspellings" };
        let file_word = if files == 1 { "file" } else { "files" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total.to_string().red().bold(),
                noun,
                files,
                file_word
            );
        } else {
            println!("✗ {} {} found in {} {}", total, noun, files, file_word);
        }
    }
}
