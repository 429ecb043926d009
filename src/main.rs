//! XMLCMP command-line interface.
//!
//! Compares two XML files, or every pair listed in a batch manifest, and
//! exits with 0 when everything matched, 1 when something fell below its
//! threshold or failed, and 2 on errors.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use xmlcmp_rs::{
    format_batch, format_error, format_result, load_manifest, load_settings, Comparator,
    DiffConfig, OutputFormat, OutputOptions, ParserOptions, Settings, Source,
};

/// XMLCMP - Structural XML comparison
///
/// Compares XML documents element by element, reports every difference by
/// path, and scores how similar the documents are.
#[derive(Parser)]
#[command(name = "xmlcmp-rs")]
#[command(version)]
#[command(about = "Structural XML comparison with ignore rules and a match ratio", long_about = None)]
struct Cli {
    /// First file to compare
    #[arg(value_name = "FILE1", required_unless_present = "batch")]
    file1: Option<PathBuf>,

    /// Second file to compare
    #[arg(value_name = "FILE2", required_unless_present = "batch")]
    file2: Option<PathBuf>,

    /// Batch manifest listing pairs to compare (JSON, YAML or TOML)
    #[arg(short, long, value_name = "MANIFEST", conflicts_with_all = ["file1", "file2"])]
    batch: Option<PathBuf>,

    /// Element name or dotted path to ignore (repeatable)
    #[arg(short, long, value_name = "NAME_OR_PATH")]
    ignore: Vec<String>,

    /// Minimum match ratio (0-100) for documents to match
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Settings file with default ignores and threshold
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    format: OutputFormatArg,

    /// Do not list ignored differences
    #[arg(long)]
    hide_ignored: bool,

    /// Maximum length for displayed values
    #[arg(long, default_value = "80")]
    max_value_length: usize,

    /// Keep leading and trailing whitespace of text content
    #[arg(long)]
    no_trim: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode (only print the final verdict line)
    #[arg(short, long)]
    quiet: bool,
}

/// Output format argument for clap
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatArg {
    /// Colored terminal output
    Terminal,
    /// JSON envelope
    Json,
    /// Plain text (no colors)
    Plain,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Plain => OutputFormat::Plain,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format: OutputFormat = cli.format.into();
    match run(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            let message = format!("{:#}", err);
            match format_error(&message, &format) {
                Ok(output) if format == OutputFormat::Json => println!("{}", output),
                Ok(output) => eprintln!("{}", output),
                Err(_) => eprintln!("Error: {}", message),
            }
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    let settings = match &cli.config {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to load settings: {}", path.display()))?,
        None => Settings::default(),
    };

    let mut parser_options: ParserOptions = settings.parser_options();
    if cli.no_trim {
        parser_options.trim_text = false;
    }
    let diff_config = DiffConfig {
        max_depth: parser_options.max_depth,
        ..DiffConfig::default()
    };
    let comparator = Comparator::new(parser_options, diff_config);

    let output_options = OutputOptions {
        show_ignored: !cli.hide_ignored,
        max_value_length: cli.max_value_length,
    };
    let format: OutputFormat = cli.format.into();

    let mut options = settings.comparison_options();
    options.ignored_properties.extend(cli.ignore.iter().cloned());

    if let Some(manifest_path) = &cli.batch {
        let (manifest, items) = load_manifest(manifest_path)
            .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

        let base = options.merged_with(
            &manifest.ignored_properties,
            cli.threshold.or(manifest.threshold),
        );
        base.validate().context("Invalid comparison options")?;

        let batch = comparator.compare_batch(&items, &base);
        let output = format_batch(&batch, &items, &format, &output_options)
            .context("Failed to format batch output")?;
        print_output(&output, cli.quiet, &format);

        return Ok(if batch.all_matched() { 0 } else { 1 });
    }

    let (Some(file1), Some(file2)) = (cli.file1, cli.file2) else {
        anyhow::bail!("Two files are required unless --batch is given");
    };
    if let Some(threshold) = cli.threshold {
        options.threshold = threshold;
    }

    let left = Source::File(file1);
    let right = Source::File(file2);
    tracing::debug!("comparing {} with {}", left.describe(), right.describe());

    let result = comparator
        .compare_sources(&left, &right, &options)
        .context("Comparison failed")?;

    let output = format_result(&result, options.threshold, &format, &output_options)
        .context("Failed to format comparison output")?;
    print_output(&output, cli.quiet, &format);

    Ok(if result.is_match { 0 } else { 1 })
}

fn print_output(output: &str, quiet: bool, format: &OutputFormat) {
    if quiet && *format != OutputFormat::Json {
        if let Some(line) = output.lines().last() {
            println!("{}", line);
        }
    } else {
        println!("{}", output);
    }
}
