// GeoEval - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Log file discovery
// 4. Batch extraction and output

use geoeval::app::batch::{self, BatchConfig, BatchReport};
use geoeval::core::discovery;
use geoeval::core::export;
use geoeval::platform::config;
use geoeval::util::constants;
use geoeval::util::error::{GeoEvalError, Result};
use geoeval::util::logging;

use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full batch report: records, per-file summaries, failures.
    Json,
    /// One row per document.
    Csv,
    /// Human-readable evaluation summary.
    Summary,
}

/// GeoEval - Extract true, predicted and neighbour coordinates from
/// geolocation evaluation logs.
///
/// Each PATH may be a log file or a directory to search for logs.
#[derive(Parser, Debug)]
#[command(name = "geoeval", version, about)]
struct Cli {
    /// Log files or directories to extract from.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Summary)]
    format: OutputFormat,

    /// Write output to FILE instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Reject predicted/neighbour lines that are not inside an open document.
    #[arg(long = "strict")]
    strict: bool,

    /// Radius (km) within which a prediction counts as accurate.
    #[arg(long = "accuracy-km", value_name = "N", value_parser = parse_accuracy_km)]
    accuracy_km: Option<f64>,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn parse_accuracy_km(s: &str) -> std::result::Result<f64, String> {
    let km: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (constants::MIN_ACCURACY_RADIUS_KM..=constants::MAX_ACCURACY_RADIUS_KM).contains(&km) {
        Ok(km)
    } else {
        Err(format!(
            "must be between {} and {}",
            constants::MIN_ACCURACY_RADIUS_KM,
            constants::MAX_ACCURACY_RADIUS_KM
        ))
    }
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its level can take part in the filter.
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let (app_config, config_warnings) = config::load_config(&config_path);

    logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "GeoEval starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    match run(&cli, app_config) {
        Ok(report) if report.failures.is_empty() => {}
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("Error: {}: {}", failure.source, failure.error);
            }
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli, app_config: config::AppConfig) -> Result<BatchReport> {
    let mut batch_config = BatchConfig {
        extract: app_config.extract,
        accuracy_radius_km: app_config.accuracy_radius_km,
    };
    // CLI overrides config.
    if cli.strict {
        batch_config.extract.strict = true;
    }
    if let Some(km) = cli.accuracy_km {
        batch_config.accuracy_radius_km = km;
    }

    let mut files = Vec::new();
    for root in &cli.paths {
        let (found, warnings) = discovery::discover_files(root, &app_config.discovery)?;
        for warning in &warnings {
            tracing::warn!(root = %root.display(), "{warning}");
        }
        if found.is_empty() {
            tracing::warn!(root = %root.display(), "No log files found");
        }
        files.extend(found);
    }
    // Overlapping roots must not extract the same log twice.
    let mut seen = std::collections::HashSet::new();
    files.retain(|path| seen.insert(path.clone()));

    let report = batch::run_batch(&files, &batch_config);

    match &cli.output {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|source| GeoEvalError::Io {
                path: path.clone(),
                operation: "create",
                source,
            })?;
            write_output(&report, cli.format, io::BufWriter::new(file), path)?;
            tracing::info!(path = %path.display(), format = ?cli.format, "Output written");
        }
        None => {
            let stdout = io::stdout();
            write_output(&report, cli.format, stdout.lock(), Path::new("<stdout>"))?;
        }
    }

    Ok(report)
}

fn write_output<W: Write>(
    report: &BatchReport,
    format: OutputFormat,
    mut writer: W,
    path: &Path,
) -> Result<()> {
    let io_err = |source: io::Error| GeoEvalError::Io {
        path: path.to_path_buf(),
        operation: "write",
        source,
    };

    match format {
        OutputFormat::Json => {
            export::export_json(report, &mut writer, path)?;
            writeln!(writer).map_err(io_err)?;
        }
        OutputFormat::Csv => {
            report.write_csv(&mut writer, path)?;
        }
        OutputFormat::Summary => {
            write_summary(report, &mut writer).map_err(io_err)?;
        }
    }
    writer.flush().map_err(io_err)
}

fn write_summary<W: Write>(report: &BatchReport, mut w: W) -> io::Result<()> {
    for file in &report.files {
        let ev = &file.evaluation;
        writeln!(
            w,
            "{}: {} documents, {} dropped, mean error {}, median error {}",
            file.source,
            ev.documents,
            file.extraction.dropped_documents,
            km(ev.mean_error_km),
            km(ev.median_error_km),
        )?;
    }
    for failure in &report.failures {
        writeln!(w, "{}: FAILED: {}", failure.source, failure.error)?;
    }

    let ev = &report.evaluation;
    writeln!(w)?;
    writeln!(
        w,
        "Files:            {} extracted, {} failed",
        report.files.len(),
        report.failures.len()
    )?;
    writeln!(w, "Documents:        {}", ev.documents)?;
    writeln!(
        w,
        "Mean error:       {} ({})",
        km(ev.mean_error_km),
        mi(ev.mean_error_mi)
    )?;
    writeln!(
        w,
        "Median error:     {} ({})",
        km(ev.median_error_km),
        mi(ev.median_error_mi)
    )?;
    match ev.accuracy {
        Some(acc) => writeln!(
            w,
            "Accuracy @{} km: {:.2}%",
            ev.accuracy_radius_km,
            acc * 100.0
        )?,
        None => writeln!(w, "Accuracy @{} km: n/a", ev.accuracy_radius_km)?,
    }
    match ev.mean_neighbors {
        Some(n) => writeln!(w, "Mean neighbours:  {n:.2}"),
        None => writeln!(w, "Mean neighbours:  n/a"),
    }
}

fn km(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2} km"))
}

fn mi(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2} mi"))
}
