// GeoEval - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These records are the unit of output that flows through
// statistics and export.

use crate::core::coord::Coordinate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Neighbor
// =============================================================================

/// A coordinate the predictor considered a close candidate, with its rank.
///
/// Ranks are taken verbatim from the log: not guaranteed to start at 1 or to
/// be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub coord: Coordinate,
    pub rank: u32,
}

// =============================================================================
// DocumentRecord
// =============================================================================

/// One evaluated document recovered from the log.
///
/// Constructed at the moment its predicted-coordinate line is parsed and
/// immutable thereafter. `neighbors` are in the order they appeared in the
/// log, between the document's header line and its predicted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Document name with any leading directory component stripped.
    pub document: String,
    pub true_coord: Coordinate,
    pub predicted_coord: Coordinate,
    pub neighbors: Vec<Neighbor>,
}

impl DocumentRecord {
    /// Great-circle distance between the true and predicted coordinates.
    pub fn error_km(&self) -> f64 {
        self.true_coord.distance_km(&self.predicted_coord)
    }

    pub fn error_mi(&self) -> f64 {
        self.true_coord.distance_mi(&self.predicted_coord)
    }

    /// Neighbours sorted by ascending rank. Equal ranks keep encounter order.
    ///
    /// The stored `neighbors` field is left untouched.
    pub fn neighbors_by_rank(&self) -> Vec<Neighbor> {
        let mut sorted = self.neighbors.clone();
        sorted.sort_by_key(|n| n.rank);
        sorted
    }
}
