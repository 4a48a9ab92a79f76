// GeoEval - util/constants.rs
//
// Single source of truth for named constants, log markers, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "GeoEval";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "GeoEval";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log markers (wire format of the evaluation log)
// =============================================================================

/// Only lines starting with this character are inspected at all.
pub const LINE_MARKER: char = '#';

/// Precedes the document name on a document-header line.
pub const DOCUMENT_MARKER: &str = "Document ";

/// Precedes the true coordinate pair on a document-header line.
pub const TRUE_COORD_MARKER: &str = " at (";

/// Precedes a neighbour coordinate pair.
pub const NEIGHBOR_MARKER: &str = " close neighbor: (";

/// Precedes the predicted coordinate pair; its line completes a document.
pub const PREDICTED_MARKER: &str = " predicted cell center at (";

/// Hash marker whose second occurrence on a neighbour line introduces the rank.
pub const RANK_MARKER: char = '#';

/// Closes a coordinate pair.
pub const COORD_CLOSE: char = ')';

/// Separates latitude from longitude inside a coordinate pair.
pub const COORD_SEPARATOR: char = ',';

/// Directory separator stripped from the front of document names.
pub const PATH_SEPARATOR: char = '/';

// =============================================================================
// Geodesy
// =============================================================================

/// Earth radius used for great-circle distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6372.8;

/// Miles per kilometre.
pub const MILES_PER_KM: f64 = 0.621371;

// =============================================================================
// Evaluation
// =============================================================================

/// Default radius (km) within which a prediction counts as accurate (~100 mi).
pub const DEFAULT_ACCURACY_RADIUS_KM: f64 = 161.0;

/// Minimum configurable accuracy radius (km).
pub const MIN_ACCURACY_RADIUS_KM: f64 = 0.001;

/// Maximum configurable accuracy radius (km). Half the equatorial circumference.
pub const MAX_ACCURACY_RADIUS_KM: f64 = 20_038.0;

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Maximum number of log files processed in a single batch.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Hard upper bound on max depth.
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Default include glob patterns for evaluation log discovery.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.log", "*.txt", "*.out"];

/// Default exclude glob patterns for evaluation log discovery.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.gz", "*.bz2", "*.zip", ".git"];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output and error messages.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
