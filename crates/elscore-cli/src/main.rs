mod config;
mod report;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use elscore_core::{rank_systems, Metric, ParseOptions, RankingRow};
use elscore_files::{read_linking, SystemDir};

use config::OutputFormat;
use report::Layout;

#[derive(Parser)]
#[command(
    name = "elscore",
    version,
    about = "Entity linking evaluation - rank system outputs by B^3 precision and recall"
)]
struct Cli {
    /// Ground truth for the test data
    gold_standard: PathBuf,

    /// Directory with one or more system outputs for the test data, in KBP format
    system_output_dir: PathBuf,

    /// Metric columns to report, in order (repeatable; default: b3)
    #[arg(short, long = "metric", value_enum)]
    metrics: Vec<CliMetric>,

    /// Add an F1 column after each metric's recall
    #[arg(long)]
    f1: bool,

    /// Add the KBP2010 micro-average (NIL-normalised accuracy) column
    #[arg(long)]
    accuracy: bool,

    /// Report every column (accuracy, B^2 and B^3 with F1) at three decimals
    #[arg(long)]
    full: bool,

    /// Decimal places for scores
    #[arg(short, long)]
    decimals: Option<usize>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<CliFormat>,

    /// Linking whose mentions restrict the B^2 / B^3 averages (default: the gold standard)
    #[arg(short, long, value_name = "FILE")]
    focus: Option<PathBuf>,

    /// Ignore tokens after the second column of each record
    #[arg(long)]
    allow_extra_columns: bool,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliMetric {
    B2,
    B3,
}

impl From<CliMetric> for Metric {
    fn from(c: CliMetric) -> Self {
        match c {
            CliMetric::B2 => Metric::B2,
            CliMetric::B3 => Metric::B3,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliFormat {
    Tsv,
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(c: CliFormat) -> Self {
        match c {
            CliFormat::Tsv => OutputFormat::Tsv,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Resolved settings for one ranking run.
struct RunSettings {
    layout: Layout,
    format: OutputFormat,
    parse: ParseOptions,
    focus: Option<PathBuf>,
}

/// What the command line asks for.
enum Invocation {
    Rank(Box<Cli>),
    /// Wrong number of arguments: print the banner and exit successfully.
    Usage,
}

fn main() -> Result<()> {
    let cli = match parse_invocation(std::env::args_os()) {
        Ok(Invocation::Rank(cli)) => cli,
        Ok(Invocation::Usage) => {
            print!("{}", usage_text());
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    let default_level = if cli.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    let cfg = config::load_config(cli.config.as_deref())?;
    let settings = resolve_settings(&cli, &cfg);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cmd_rank(&cli.gold_standard, &cli.system_output_dir, &settings, &mut out)
}

fn parse_invocation<I, T>(args: I) -> Result<Invocation, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Invocation::Rank(Box::new(cli))),
        Err(e) if is_argument_count_error(e.kind()) => Ok(Invocation::Usage),
        Err(e) => Err(e),
    }
}

fn is_argument_count_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

fn usage_text() -> String {
    [
        "----------------------------------------",
        "KBP Entity Linking evaluation",
        "----------------------------------------",
        "USAGE: elscore [OPTIONS] <gold_standard_file> <system_output_dir>",
        " - gold_standard_file Ground truth for the test data.",
        " - system_output_dir  Directory with one or more system outputs for the",
        "                      test data following the KBP format.",
        " Please note that 'NIL' element identifiers must follow the format NILXXX, where XXX is a three digit number.",
        " Run `elscore --help` for the list of options.",
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

/// Flags override the config file; `--full` overrides both, except `--decimals`.
fn resolve_settings(cli: &Cli, cfg: &config::Config) -> RunSettings {
    let mut layout = if cli.full {
        Layout::full()
    } else {
        let metrics: Vec<Metric> = if cli.metrics.is_empty() {
            cfg.report.metrics.clone()
        } else {
            cli.metrics.iter().map(|m| (*m).into()).collect()
        };
        Layout {
            accuracy: cli.accuracy || cfg.report.accuracy,
            metrics: if metrics.is_empty() {
                vec![Metric::default()]
            } else {
                metrics
            },
            f1: cli.f1 || cfg.report.f1,
            decimals: cfg.report.decimals,
        }
    };
    if let Some(decimals) = cli.decimals {
        layout.decimals = decimals;
    }

    let mut parse = cfg.parse.options();
    parse.allow_extra_columns |= cli.allow_extra_columns;

    RunSettings {
        layout,
        format: cli.format.map(Into::into).unwrap_or(cfg.report.format),
        parse,
        focus: cli.focus.clone().or_else(|| cfg.scoring.focus.clone()),
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

fn cmd_rank(
    gold_path: &Path,
    systems_dir: &Path,
    settings: &RunSettings,
    out: &mut impl Write,
) -> Result<()> {
    let gold = read_linking(gold_path, settings.parse)
        .with_context(|| format!("failed to load gold standard {}", gold_path.display()))?;
    let focus = settings
        .focus
        .as_deref()
        .map(|path| {
            read_linking(path, settings.parse)
                .with_context(|| format!("failed to load focus set {}", path.display()))
        })
        .transpose()?;
    let source = SystemDir::open(systems_dir, settings.parse)
        .with_context(|| format!("failed to open system output directory {}", systems_dir.display()))?;

    if settings.format == OutputFormat::Tsv {
        writeln!(out, "{}", settings.layout.header())?;
    }

    let summary = rank_systems(&gold, focus.as_ref(), &source, |row: RankingRow| -> Result<()> {
        match settings.format {
            OutputFormat::Tsv => {
                let path = source.path_of(row.system());
                for line in report::tsv_lines(&settings.layout, &row, &path) {
                    writeln!(out, "{line}")?;
                }
            }
            OutputFormat::Json => writeln!(out, "{}", report::json_line(&row)?)?,
        }
        Ok(())
    })?;

    tracing::debug!(
        scored = summary.scored,
        skipped = summary.skipped,
        "ranking complete"
    );
    Ok(())
}
