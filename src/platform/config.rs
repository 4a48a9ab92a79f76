// GeoEval - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation. Uses the `directories` crate for XDG (Linux), AppData
// (Windows), Library (macOS) compliance.

use crate::core::discovery::DiscoveryConfig;
use crate::core::extractor::ExtractConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Platform-appropriate location of `config.toml`.
///
/// Falls back to the current directory if platform dirs cannot be determined.
pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("", "", constants::APP_ID) {
        Some(proj_dirs) => proj_dirs.config_dir().join(constants::CONFIG_FILE_NAME),
        None => {
            tracing::warn!("Could not determine platform directories, using current directory");
            PathBuf::from(".").join(constants::CONFIG_FILE_NAME)
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[extract]` section.
    pub extract: ExtractSection,
    /// `[evaluation]` section.
    pub evaluation: EvaluationSection,
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[extract]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Reject predicted/neighbour lines that follow an already-emitted document.
    pub strict: Option<bool>,
}

/// `[evaluation]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct EvaluationSection {
    /// Radius (km) within which a prediction counts as accurate.
    pub accuracy_radius_km: Option<f64>,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    pub max_depth: Option<usize>,
    pub max_files: Option<usize>,
    pub include_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub extract: ExtractConfig,
    pub accuracy_radius_km: f64,
    pub discovery: DiscoveryConfig,
    /// Logging level string (read before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extract: ExtractConfig::default(),
            accuracy_radius_km: constants::DEFAULT_ACCURACY_RADIUS_KM,
            discovery: DiscoveryConfig::default(),
            log_level: None,
        }
    }
}

/// Load and validate the config file at `config_path`.
///
/// Returns the validated config and a list of non-fatal warnings. A missing
/// file yields defaults with no warnings. An unreadable or unparseable file
/// yields defaults plus a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    match read_raw_config(config_path) {
        Ok(raw) => validate(raw),
        Err(e @ ConfigError::TomlParse { .. }) => {
            let msg = format!(
                "{e}. Using defaults. See config.example.toml for the expected format."
            );
            (AppConfig::default(), vec![msg])
        }
        Err(e) => (AppConfig::default(), vec![format!("{e}. Using defaults.")]),
    }
}

/// Read and deserialise `config.toml` without validating values.
pub fn read_raw_config(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source,
    })
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- Extract --
    if let Some(strict) = raw.extract.strict {
        config.extract.strict = strict;
    }

    // -- Evaluation: accuracy_radius_km --
    if let Some(radius) = raw.evaluation.accuracy_radius_km {
        if (constants::MIN_ACCURACY_RADIUS_KM..=constants::MAX_ACCURACY_RADIUS_KM).contains(&radius)
        {
            config.accuracy_radius_km = radius;
        } else {
            warnings.push(format!(
                "[evaluation] accuracy_radius_km = {radius} is out of range ({}-{}). Using default ({}).",
                constants::MIN_ACCURACY_RADIUS_KM,
                constants::MAX_ACCURACY_RADIUS_KM,
                constants::DEFAULT_ACCURACY_RADIUS_KM,
            ));
        }
    }

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.discovery.max_depth = depth;
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_DEPTH,
                constants::DEFAULT_MAX_DEPTH,
            ));
        }
    }

    // -- Discovery: max_files --
    if let Some(files) = raw.discovery.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.discovery.max_files = files;
        } else {
            warnings.push(format!(
                "[discovery] max_files = {files} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_FILES,
                constants::ABSOLUTE_MAX_FILES,
                constants::DEFAULT_MAX_FILES,
            ));
        }
    }

    // -- Discovery: patterns --
    if let Some(patterns) = raw.discovery.include_patterns {
        config.discovery.include_patterns = patterns;
    }
    if let Some(patterns) = raw.discovery.exclude_patterns {
        config.discovery.exclude_patterns = patterns;
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    (config, warnings)
}
