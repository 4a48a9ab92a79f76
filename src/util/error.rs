// GeoEval - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its causal chain so it
// can be logged with full context.

use std::fmt;
use std::io;
use std::path::PathBuf;

use super::logging::preview;

/// Top-level error type for all GeoEval operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum GeoEvalError {
    /// A log line could not be turned into record state.
    Extract(ExtractError),

    /// Log file discovery failed.
    Discovery(DiscoveryError),

    /// Writing records or summaries failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for GeoEvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract(e) => write!(f, "Extraction error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for GeoEvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Extract(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

/// Errors raised while scanning an evaluation log.
///
/// Both kinds abort the extraction run. Each carries the 1-based position of
/// the offending line and its full content.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// A marker was found but its paired delimiter or expected marker was not.
    MalformedLogLine {
        line_number: usize,
        line: String,
        expected: &'static str,
    },

    /// A token where a number was expected could not be parsed as one.
    NumericParse {
        line_number: usize,
        line: String,
        token: String,
        field: &'static str,
    },
}

impl ExtractError {
    /// 1-based index of the offending line in the input.
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedLogLine { line_number, .. } | Self::NumericParse { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Full content of the offending line.
    pub fn line(&self) -> &str {
        match self {
            Self::MalformedLogLine { line, .. } | Self::NumericParse { line, .. } => line,
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLogLine {
                line_number,
                line,
                expected,
            } => write!(
                f,
                "line {line_number}: malformed log line, expected {expected}: '{}'",
                preview(line)
            ),
            Self::NumericParse {
                line_number,
                line,
                token,
                field,
            } => write!(
                f,
                "line {line_number}: cannot parse {field} from '{token}': '{}'",
                preview(line)
            ),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<ExtractError> for GeoEvalError {
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to log file discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The root path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// Permission denied accessing the root path.
    PermissionDenied { path: PathBuf, source: io::Error },

    /// Maximum file count exceeded during discovery.
    MaxFilesExceeded { found: usize, max: usize },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Path '{}' does not exist", path.display())
            }
            Self::PermissionDenied { path, source } => {
                write!(
                    f,
                    "Permission denied accessing '{}': {source}",
                    path.display()
                )
            }
            Self::MaxFilesExceeded { found, max } => {
                write!(
                    f,
                    "Discovery stopped: found {found} files, maximum is {max}. \
                     Increase [discovery] max_files in config or narrow the path."
                )
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PermissionDenied { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for GeoEvalError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing extracted records.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the output.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for GeoEvalError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for GeoEvalError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for GeoEval results.
pub type Result<T> = std::result::Result<T, GeoEvalError>;
