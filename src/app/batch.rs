// GeoEval - app/batch.rs
//
// Runs extraction over one or more log files.
//
// Every file is its own extraction run with its own extractor; nothing is
// shared between runs, so files are processed in parallel with rayon. A
// failure aborts only the file it occurred in.

use crate::core::export;
use crate::core::extractor::{ExtractConfig, ExtractSummary, LogExtractor};
use crate::core::model::DocumentRecord;
use crate::core::stats::EvalSummary;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{GeoEvalError, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Settings shared by every file in a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    pub extract: ExtractConfig,
    pub accuracy_radius_km: f64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extract: ExtractConfig::default(),
            accuracy_radius_km: constants::DEFAULT_ACCURACY_RADIUS_KM,
        }
    }
}

/// Successful extraction of one log file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Display form of the source path.
    pub source: String,
    pub records: Vec<DocumentRecord>,
    pub extraction: ExtractSummary,
    pub evaluation: EvalSummary,
}

/// A log file whose extraction failed.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub source: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: GeoEvalError,
}

/// Outcome of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    /// Evaluation over the records of every successful file.
    pub evaluation: EvalSummary,
}

impl BatchReport {
    /// Every record with the log it came from, in input file order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &DocumentRecord)> {
        self.files
            .iter()
            .flat_map(|f| f.records.iter().map(move |r| (f.source.as_str(), r)))
    }

    pub fn record_count(&self) -> usize {
        self.files.iter().map(|f| f.records.len()).sum()
    }

    /// Writes all records as CSV.
    pub fn write_csv<W: Write>(&self, writer: W, export_path: &Path) -> Result<usize> {
        Ok(export::export_csv(self.records(), writer, export_path)?)
    }
}

/// Extract and evaluate a single log file.
pub fn extract_file(path: &Path, config: &BatchConfig) -> Result<FileReport> {
    let content = fs::read_file_lossy(path).map_err(|source| GeoEvalError::Io {
        path: path.to_path_buf(),
        operation: "read",
        source,
    })?;

    let extraction = LogExtractor::new()
        .with_config(config.extract)
        .extract(content.lines())?;

    if extraction.summary.dropped_documents > 0 {
        tracing::info!(
            file = %path.display(),
            dropped = extraction.summary.dropped_documents,
            "Incomplete documents dropped"
        );
    }

    let evaluation = EvalSummary::from_records(&extraction.records, config.accuracy_radius_km);
    Ok(FileReport {
        source: path.display().to_string(),
        records: extraction.records,
        extraction: extraction.summary,
        evaluation,
    })
}

/// Extract every file in `paths`, in parallel. Output keeps input order.
pub fn run_batch(paths: &[PathBuf], config: &BatchConfig) -> BatchReport {
    let started_at = Utc::now();
    let timer = Instant::now();

    tracing::info!(files = paths.len(), strict = config.extract.strict, "Batch starting");

    let outcomes: Vec<(&PathBuf, Result<FileReport>)> = paths
        .par_iter()
        .map(|path| (path, extract_file(path, config)))
        .collect();

    let mut files = Vec::new();
    let mut failures = Vec::new();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                tracing::debug!(
                    file = %path.display(),
                    records = report.records.len(),
                    "File extracted"
                );
                files.push(report);
            }
            Err(error) => {
                tracing::warn!(file = %path.display(), error = %error, "File extraction failed");
                failures.push(FileFailure {
                    source: path.display().to_string(),
                    error,
                });
            }
        }
    }

    let all_records: Vec<DocumentRecord> = files
        .iter()
        .flat_map(|f| f.records.iter().cloned())
        .collect();
    let evaluation = EvalSummary::from_records(&all_records, config.accuracy_radius_km);

    let report = BatchReport {
        started_at,
        elapsed_ms: timer.elapsed().as_millis() as u64,
        files,
        failures,
        evaluation,
    };

    tracing::info!(
        files = report.files.len(),
        failures = report.failures.len(),
        records = report.record_count(),
        elapsed_ms = report.elapsed_ms,
        "Batch complete"
    );

    report
}

fn serialize_display<S: Serializer>(
    error: &GeoEvalError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    const GOOD: &str = "\
#1 Document corpus/a.txt at (10.0,10.0)
#1 #1 close neighbor: (10.5,10.5)
#1 predicted cell center at (10.0,10.0)
";

    #[test]
    fn test_extract_file_reports_records_and_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("good.log");
        stdfs::write(&path, GOOD).unwrap();

        let report = extract_file(&path, &BatchConfig::default()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].document, "a.txt");
        assert_eq!(report.evaluation.accuracy, Some(1.0));
    }

    #[test]
    fn test_batch_isolates_failures_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("1-good.log");
        let bad = dir.path().join("2-bad.log");
        let missing = dir.path().join("3-missing.log");
        let good2 = dir.path().join("4-good.log");
        stdfs::write(&good, GOOD).unwrap();
        stdfs::write(&bad, "# Document x at (1.0;2.0)\n").unwrap();
        stdfs::write(&good2, GOOD).unwrap();

        let paths = vec![good.clone(), bad, missing, good2.clone()];
        let report = run_batch(&paths, &BatchConfig::default());

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.files[0].source, good.display().to_string());
        assert_eq!(report.files[1].source, good2.display().to_string());
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(report.failures[0].error, GeoEvalError::Extract(_)));
        assert!(matches!(report.failures[1].error, GeoEvalError::Io { .. }));
        assert_eq!(report.record_count(), 2);
        assert_eq!(report.evaluation.documents, 2);
    }

    #[test]
    fn test_report_serialises_failures_as_messages() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.log");
        stdfs::write(&bad, "# predicted cell center at (1.0,2.0)\n").unwrap();

        let report = run_batch(&[bad], &BatchConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        let message = json["failures"][0]["error"].as_str().unwrap();
        assert!(message.contains("line 1"), "{message}");
    }
}
