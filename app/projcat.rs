//! Command-line interface for projcat.
//!
//! Resolves the project (local directory or repository URL), walks it and
//! writes the resulting document to the output file.

use clap::{Parser, ValueEnum};
use projcat::{
    BinaryDetection, DEFAULT_IGNORE_FILE, GitCli, InputSource, MatchMode, ProjcatBuilder,
    ProjcatError, ProjcatOptions, TraversalOrder, output, snapshot_source,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::exit;

/// projcat — convert a project into a single Markdown document
#[derive(Parser, Debug)]
#[command(name = "projcat", version, about, long_about = None)]
struct Cli {
    /// Project directory or repository URL (prompted for when omitted)
    source: Option<String>,

    /// Output document path
    #[arg(short, long, default_value = "project_structure.md")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Ignore-file name looked up at the project root
    #[arg(long, default_value = DEFAULT_IGNORE_FILE)]
    ignore_file: String,

    /// Extra exclusion patterns (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Do not add the built-in exclusion patterns
    #[arg(long)]
    no_builtin_ignores: bool,

    /// How patterns are matched against relative paths
    #[arg(long, default_value = "whole-path", value_parser = parse_match_mode)]
    match_mode: MatchMode,

    /// Match patterns case-insensitively
    #[arg(long)]
    case_insensitive: bool,

    /// Keep filesystem enumeration order instead of sorting by name
    #[arg(long)]
    unsorted: bool,

    /// Binary detection strategy
    #[arg(long, default_value = "none", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// File size limit in bytes (larger files get a placeholder)
    #[arg(long)]
    file_size_limit: Option<u64>,

    /// Follow symlinks
    #[arg(long)]
    follow_links: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl From<Format> for output::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => output::OutputFormat::Markdown,
            Format::Json => output::OutputFormat::Json,
        }
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

/// Parse string into MatchMode enum.
fn parse_match_mode(s: &str) -> Result<MatchMode, String> {
    match s {
        "whole-path" => Ok(MatchMode::WholePath),
        "segment" => Ok(MatchMode::Segment),
        _ => Err(format!("invalid match mode: {}", s)),
    }
}

impl Cli {
    fn to_options(&self) -> ProjcatOptions {
        let order = if self.unsorted {
            TraversalOrder::Filesystem
        } else {
            TraversalOrder::Sorted
        };
        ProjcatBuilder::new(".")
            .ignore_file(self.ignore_file.as_str())
            .builtin_ignores(!self.no_builtin_ignores)
            .ignore_patterns(self.ignore_patterns.clone())
            .match_mode(self.match_mode)
            .case_insensitive(self.case_insensitive)
            .order(order)
            .follow_links(self.follow_links)
            .binary_detection(self.binary_detection)
            .file_size_limit(self.file_size_limit)
            .skip_path(&self.output)
            .build()
    }
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), ProjcatError> {
    let raw = match &cli.source {
        Some(value) => Some(value.clone()),
        None if io::stdin().is_terminal() => Some(prompt_for_source()?),
        None => None,
    };
    let source = InputSource::resolve(raw.as_deref())?;

    #[cfg(feature = "logging")]
    tracing::info!("Output will be saved to: {}", cli.output.display());

    let snapshot = snapshot_source(&source, cli.to_options(), &GitCli::default())?;
    output::write_snapshot_to_file(&snapshot, cli.format.into(), &cli.output)?;

    println!(
        "'{}' has been created ({} files).",
        cli.output.display(),
        snapshot.files.len()
    );
    Ok(())
}

fn prompt_for_source() -> Result<String, ProjcatError> {
    let stdin_error = |source: io::Error| ProjcatError::Io {
        path: PathBuf::from("<stdin>"),
        source,
    };
    print!("Enter the path to your project directory or repository URL: ");
    io::stdout().flush().map_err(stdin_error)?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).map_err(stdin_error)?;
    Ok(line.trim().to_string())
}

#[cfg(feature = "logging")]
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
