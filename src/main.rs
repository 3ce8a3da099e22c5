use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use misspellings::cli::output::{self, OutputFormat};
use misspellings::cli::prompt::TerminalChooser;
use misspellings::config::Overrides;
use misspellings::files::{self, ExcludeRules};
use misspellings::script::ScriptWriter;
use misspellings::{dict, Config, Dictionary, DictionarySource, Error, Misspellings};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "misspellings")]
#[command(version, about = "Find commonly misspelled words in source code", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// File containing a list of files to check ("-" for stdin)
    #[arg(short = 'f', long, value_name = "PATH")]
    file_list: Option<PathBuf>,

    /// Text file of misspelled words and corrections ("word correction" per line)
    #[arg(short = 'm', long, value_name = "PATH", conflicts_with_all = ["json_file", "dictionary_dir"])]
    misspelling_file: Option<PathBuf>,

    /// JSON file of misspelled words and corrections
    #[arg(short = 'j', long, value_name = "PATH", conflicts_with = "dictionary_dir")]
    json_file: Option<PathBuf>,

    /// Directory of JSON dictionaries to use instead of the bundled ones
    #[arg(long, value_name = "DIR")]
    dictionary_dir: Option<PathBuf>,

    /// Write a shell script that corrects the files (the file must not exist)
    #[arg(short = 's', long, value_name = "PATH")]
    script_output: Option<PathBuf>,

    /// Also write the list of misspellings to this file
    #[arg(short = 'e', long, value_name = "PATH")]
    export_file: Option<PathBuf>,

    /// Print the list of misspelled words and their corrections
    #[arg(short = 'd', long)]
    dump_misspelling: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if misspellings are found
    #[arg(long)]
    no_fail: bool,

    /// Number of worker threads
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Show a progress bar while scanning
    #[arg(long)]
    progress: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DictCommands {
    /// Convert a "wrong->right1, right2" list into a JSON dictionary
    Convert {
        /// Misspelling list to convert
        input: PathBuf,

        /// Where to write the JSON (stdout when omitted)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },
    /// Show the selected dictionary
    Info,
}

impl Cli {
    fn dictionary_override(&self) -> Option<DictionarySource> {
        if let Some(path) = &self.misspelling_file {
            Some(DictionarySource::Text(path.clone()))
        } else if let Some(path) = &self.json_file {
            Some(DictionarySource::Json(path.clone()))
        } else {
            self.dictionary_dir.clone().map(DictionarySource::AssetDir)
        }
    }

    fn load_config(&self) -> Result<Config> {
        Config::load(Overrides {
            dictionary: self.dictionary_override(),
            jobs: self.jobs,
        })
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "misspellings", &mut io::stdout());
        return Ok(());
    }

    let colored_output = !cli.no_color && Term::stdout().is_term();
    if !colored_output {
        colored::control::set_override(false);
    }

    // Handle subcommands
    if let Some(command) = &cli.command {
        return handle_command(command, &cli);
    }

    // Refuse to clobber an existing script before anything else is read
    if let Some(script_path) = &cli.script_output {
        if script_path.exists() {
            return Err(Error::OutputExists(script_path.clone()).into());
        }
    }

    let config = cli.load_config()?;

    if let Some(jobs) = config.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to start worker threads")?;
    }

    let source = config.dictionary_source()?;
    let dictionary = Dictionary::load(&source).context("Failed to load misspelling dictionary")?;
    let engine = Misspellings::with_ignore_markers(dictionary, &config.ignore_markers)?;

    if cli.dump_misspelling {
        output::print_dump(&engine.dump())?;
    }

    let mut inputs = cli.files.clone();
    if let Some(list) = &cli.file_list {
        inputs.extend(files::read_file_list(list)?);
    }

    if inputs.is_empty() {
        if cli.dump_misspelling {
            return Ok(());
        }
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let rules = ExcludeRules::new(&config.exclude_dirs, &config.exclude_files)?;
    let paths = files::expand_paths(&inputs, &rules);

    let progress = if cli.progress && Term::stderr().is_term() {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files")
                .context("Invalid progress bar template")?,
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let reports = engine.check_files_with(&paths, |_| progress.inc(1));
    progress.finish_and_clear();

    if let Some(export_path) = &cli.export_file {
        let file = File::create(export_path)
            .with_context(|| format!("Failed to create export file: {}", export_path.display()))?;
        output::export_reports(&engine, &reports, &mut BufWriter::new(file))?;
    }

    if let Some(script_path) = &cli.script_output {
        let mut writer = ScriptWriter::create(script_path)?;
        let mut chooser = TerminalChooser::new(colored_output);

        for report in &reports {
            writer.write_findings(&engine, &report.findings, &mut chooser)?;
            if let Some(error) = &report.error {
                output::print_error(error, colored_output);
            }
        }
        writer.finish()?;
        return Ok(());
    }

    let total = output::print_reports(&engine, &reports, &cli.format, colored_output)?;

    if colored_output && cli.format == OutputFormat::Text {
        output::print_check_summary(total, paths.len(), colored_output);
    }

    // Exit with appropriate code
    if total > 0 && !cli.no_fail {
        std::process::exit(2);
    }

    Ok(())
}

fn handle_command(command: &Commands, cli: &Cli) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::Convert { input, output } => {
                let json = dict::convert::convert_file(input)?;
                match output {
                    Some(path) => fs::write(path, json + "\n")
                        .with_context(|| format!("Failed to write {}", path.display()))?,
                    None => println!("{}", json),
                }
            }
            DictCommands::Info => {
                let config = cli.load_config()?;
                let source = config.dictionary_source()?;
                let dictionary = Dictionary::load(&source)?;
                let source_name = match &source {
                    DictionarySource::Bundled => "bundled".to_string(),
                    DictionarySource::AssetDir(dir) => format!("directory {}", dir.display()),
                    DictionarySource::Text(path) => format!("text file {}", path.display()),
                    DictionarySource::Json(path) => format!("JSON file {}", path.display()),
                };

                println!("Dictionary: {}", source_name);
                println!("  Misspellings: {}", dictionary.len());
                println!("  Corrections: {}", dictionary.dump().len());
            }
        },
    }
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("MISSPELLINGS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
