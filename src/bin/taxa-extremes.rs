//! taxa-extremes - top associated taxa from differential abundance results
//!
//! Command-line interface: reads a DESeq2-style results table and writes the
//! most negatively and positively associated feature ids to two CSV files.

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use taxa_extremes::error::Result;
use taxa_extremes::interval::{IntervalWidth, SePolicy};
use taxa_extremes::pipeline::{run_extraction, ExtractConfig};
use taxa_extremes::select::{Direction, SelectionStrategy};

/// CLI-friendly standard-error policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSePolicy {
    /// Keep features with negative or missing lfcSE (bounds may be inverted or NaN)
    PassThrough,
    /// Leave such features out of both selections
    Skip,
    /// Fail on the first such feature
    Reject,
}

impl From<CliSePolicy> for SePolicy {
    fn from(policy: CliSePolicy) -> Self {
        match policy {
            CliSePolicy::PassThrough => SePolicy::PassThrough,
            CliSePolicy::Skip => SePolicy::Skip,
            CliSePolicy::Reject => SePolicy::Reject,
        }
    }
}

/// CLI-friendly selection strategy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliStrategy {
    /// Stable sort of the whole table
    Sort,
    /// Bounded heap of the top N candidates
    Heap,
}

impl From<CliStrategy> for SelectionStrategy {
    fn from(strategy: CliStrategy) -> Self {
        match strategy {
            CliStrategy::Sort => SelectionStrategy::Sort,
            CliStrategy::Heap => SelectionStrategy::Heap,
        }
    }
}

/// Select the most negatively and positively associated taxa
#[derive(Parser)]
#[command(name = "taxa-extremes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tab-delimited results table (log2FoldChange, lfcSE, unnamed id column)
    input: PathBuf,

    /// Output CSV for the lowest CI_95 features
    negative_output: PathBuf,

    /// Output CSV for the highest CI_5 features
    positive_output: PathBuf,

    /// YAML file with extraction parameters (flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Features per selection [default: 100]
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Standard errors on each side of the estimate [default: 1.96]
    #[arg(long, conflicts_with = "level")]
    z: Option<f64>,

    /// Two-sided confidence level, e.g. 0.95
    #[arg(long)]
    level: Option<f64>,

    /// Handling of negative or missing lfcSE [default: pass-through]
    #[arg(long, value_enum)]
    se_policy: Option<CliSePolicy>,

    /// Selection algorithm [default: sort]
    #[arg(long, value_enum)]
    strategy: Option<CliStrategy>,

    /// Name of the identifier column
    #[arg(long)]
    id_column: Option<String>,

    /// Print debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn extract_config(&self) -> Result<ExtractConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::from_yaml_file(path)?,
            None => ExtractConfig::default(),
        };
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(z) = self.z {
            config.width = IntervalWidth::Multiplier(z);
        }
        if let Some(level) = self.level {
            config.width = IntervalWidth::Level(level);
        }
        if let Some(policy) = self.se_policy {
            config.se_policy = policy.into();
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let Some(id_column) = &self.id_column {
            config.id_column = Some(id_column.clone());
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.extract_config()?;
    log::debug!("Configuration: {:?}", config);

    let extremes = run_extraction(
        &cli.input,
        &cli.negative_output,
        &cli.positive_output,
        &config,
    )?;

    log::info!(
        "Done! {} negative, {} positive features",
        extremes.negative.len(),
        extremes.positive.len()
    );
    for (direction, selection) in [
        (Direction::Negative, &extremes.negative),
        (Direction::Positive, &extremes.positive),
    ] {
        if let Some(top) = selection.features.first() {
            log::debug!("Top {}: {} (bound={:.3})", direction.name(), top.id, top.bound);
        }
    }
    Ok(())
}
