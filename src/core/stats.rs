// GeoEval - core/stats.rs
//
// Error statistics over extracted records: how far predictions landed from
// the true coordinates.

use crate::core::model::DocumentRecord;
use crate::util::constants;
use serde::Serialize;

/// Aggregate prediction error over a set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalSummary {
    pub documents: usize,
    pub mean_error_km: Option<f64>,
    pub median_error_km: Option<f64>,
    pub mean_error_mi: Option<f64>,
    pub median_error_mi: Option<f64>,
    /// Radius used for `accuracy`.
    pub accuracy_radius_km: f64,
    /// Fraction of documents predicted within `accuracy_radius_km`.
    pub accuracy: Option<f64>,
    pub mean_neighbors: Option<f64>,
}

impl EvalSummary {
    pub fn from_records(records: &[DocumentRecord], accuracy_radius_km: f64) -> Self {
        let mut errors: Vec<f64> = records.iter().map(DocumentRecord::error_km).collect();
        errors.sort_by(f64::total_cmp);

        let mean_error_km = mean(&errors);
        let median_error_km = median(&errors);
        let within = errors.iter().filter(|e| **e <= accuracy_radius_km).count();
        let neighbor_counts: Vec<f64> = records.iter().map(|r| r.neighbors.len() as f64).collect();

        Self {
            documents: records.len(),
            mean_error_km,
            median_error_km,
            mean_error_mi: mean_error_km.map(|km| km * constants::MILES_PER_KM),
            median_error_mi: median_error_km.map(|km| km * constants::MILES_PER_KM),
            accuracy_radius_km,
            accuracy: ratio(within, records.len()),
            mean_neighbors: mean(&neighbor_counts),
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median of an already sorted slice.
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}

fn ratio(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}
