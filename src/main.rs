//! evalplot: render per-metric bar charts from evaluation result files.
//!
//! Reads experiment/metric/value records from a JSON or CSV file, groups
//! them by metric, and writes one bar chart per metric into the output
//! directory, plus a manifest.json describing the run.

mod aggregate;
mod config;
mod loader;
mod manifest;
mod render;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use aggregate::MetricTable;
use config::PlotConfig;
use manifest::RunManifest;
use render::RenderOptions;

/// Render one bar chart per metric from an evaluation results file,
/// comparing values across experiments.
#[derive(Parser, Debug)]
#[command(name = "evalplot", version, about)]
struct Cli {
    /// Path to the JSON or CSV results file
    #[arg(short, long)]
    input: PathBuf,

    /// Directory charts are written into (created if absent)
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Chart appearance settings (defaults apply if the file is absent)
    #[arg(short, long, default_value = "evalplot.toml")]
    config: PathBuf,

    /// Load and aggregate, report planned charts, write nothing
    #[arg(long)]
    dry_run: bool,

    /// Extra logging (config resolution, per-chart detail)
    #[arg(short, long)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug)]
enum RunError {
    Config(config::ConfigError),
    Load(loader::LoadError),
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Render(render::RenderError),
    Manifest(manifest::ManifestError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{e}"),
            RunError::Load(e) => write!(f, "{e}"),
            RunError::OutputDir { path, source } => {
                write!(
                    f,
                    "failed to create output directory {}: {source}",
                    path.display()
                )
            }
            RunError::Render(e) => write!(f, "{e}"),
            RunError::Manifest(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => Some(e),
            RunError::Load(e) => Some(e),
            RunError::OutputDir { source, .. } => Some(source),
            RunError::Render(e) => Some(e),
            RunError::Manifest(e) => Some(e),
        }
    }
}

impl From<config::ConfigError> for RunError {
    fn from(e: config::ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<loader::LoadError> for RunError {
    fn from(e: loader::LoadError) -> Self {
        RunError::Load(e)
    }
}

impl From<render::RenderError> for RunError {
    fn from(e: render::RenderError) -> Self {
        RunError::Render(e)
    }
}

impl From<manifest::ManifestError> for RunError {
    fn from(e: manifest::ManifestError) -> Self {
        RunError::Manifest(e)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    tracing::debug!(?cli, "parsed CLI arguments");

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let config = PlotConfig::load(&cli.config)?;
    let options = RenderOptions::from_config(&config)?;

    std::fs::create_dir_all(&cli.output_dir).map_err(|e| RunError::OutputDir {
        path: cli.output_dir.clone(),
        source: e,
    })?;

    let records = loader::load_records(&cli.input)?;
    let table = MetricTable::from_records(&records);
    tracing::info!(
        input = %cli.input.display(),
        records = records.len(),
        experiments = table.experiments().len(),
        metrics = table.metrics().len(),
        "loaded results"
    );

    if cli.dry_run {
        for metric in table.metrics() {
            tracing::info!(
                metric = %metric,
                bars = table.series_for(metric).len(),
                path = %cli.output_dir.join(format!("{metric}.png")).display(),
                "would render"
            );
        }
        tracing::info!(charts = table.metrics().len(), "dry run, nothing written");
        return Ok(());
    }

    let charts = render::render_charts(&table, &cli.output_dir, &options)?;
    let manifest = RunManifest::new(
        &cli.input,
        table.record_count(),
        table.experiments().len(),
        charts,
    );
    let manifest_path = manifest.write(&cli.output_dir)?;
    tracing::info!(
        charts = manifest.charts.len(),
        manifest = %manifest_path.display(),
        "run complete"
    );
    Ok(())
}
