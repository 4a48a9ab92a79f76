// GeoEval - core/discovery.rs
//
// Recursive directory traversal to find evaluation logs for batch runs.
//
// Uses `walkdir` for traversal and `glob` for filename patterns. Reads only
// metadata; file contents are read by the app layer.
//
//   - Per-entry I/O errors are non-fatal and collected as warnings.
//   - max_files and max_depth are clamped to named absolute bounds.
//   - Exclude patterns without wildcards also prune directory descent.

use crate::util::constants;
use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of matching files before discovery fails.
    pub max_files: usize,

    /// Glob patterns (filename-only) that a file MUST match to be included.
    /// An empty list means "include everything that is not excluded".
    pub include_patterns: Vec<String>,

    /// Glob patterns matched against filenames AND directory names.
    pub exclude_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Discover evaluation logs under `root`.
///
/// A `root` that is a regular file is returned as-is, without pattern
/// filtering, so an explicitly named log is never skipped. Returned paths are
/// sorted for deterministic output.
///
/// Returns `Err` only for an unusable root or when more than `max_files`
/// files match.
pub fn discover_files(
    root: &Path,
    config: &DiscoveryConfig,
) -> Result<(Vec<PathBuf>, Vec<String>), DiscoveryError> {
    let meta = std::fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => DiscoveryError::PermissionDenied {
            path: root.to_path_buf(),
            source: e,
        },
        _ => DiscoveryError::RootNotFound {
            path: root.to_path_buf(),
        },
    })?;

    if meta.is_file() {
        return Ok((vec![root.to_path_buf()], Vec::new()));
    }

    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);

    tracing::debug!(
        root = %root.display(),
        max_depth,
        max_files,
        include = ?config.include_patterns,
        exclude = ?config.exclude_patterns,
        "Discovery starting"
    );

    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let mut files: Vec<PathBuf> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    let walker = walkdir::WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_str().unwrap_or("");
            !is_excluded_component(name, &exclude_pats)
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if is_excluded_filename(file_name, &exclude_pats) {
            tracing::trace!(file = file_name, "Excluded by pattern");
            continue;
        }
        if !is_included(file_name, &include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        files.push(path.to_path_buf());
    }

    if files.len() > max_files {
        return Err(DiscoveryError::MaxFilesExceeded {
            found: files.len(),
            max: max_files,
        });
    }

    files.sort();

    tracing::debug!(
        files = files.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((files, warnings))
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile pattern strings; invalid ones are logged and skipped.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, kind, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

/// Literal (wildcard-free) exclude patterns also name directories to skip.
fn is_excluded_component(dir_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| {
        let s = p.as_str();
        !s.contains('*') && !s.contains('?') && !s.contains('[') && p.matches(dir_name)
    })
}

fn is_excluded_filename(file_name: &str, exclude_pats: &[glob::Pattern]) -> bool {
    exclude_pats.iter().any(|p| p.matches(file_name))
}

fn is_included(file_name: &str, include_pats: &[glob::Pattern]) -> bool {
    include_pats.is_empty() || include_pats.iter().any(|p| p.matches(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_temp_tree() -> TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        fs::write(root.join("run1.log"), "").unwrap();
        fs::write(root.join("run2.out"), "").unwrap();
        fs::write(root.join("notes.md"), "").unwrap();
        fs::write(root.join("old.log.gz"), "").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("run3.log"), "").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git").join("HEAD.log"), "").unwrap();
        dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_discovers_matching_files_recursively() {
        let dir = make_temp_tree();
        let (files, warnings) = discover_files(dir.path(), &DiscoveryConfig::default()).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");

        let mut found = names(&files);
        found.sort();
        assert_eq!(found, vec!["run1.log", "run2.out", "run3.log"]);
    }

    #[test]
    fn test_single_file_root_bypasses_patterns() {
        let dir = make_temp_tree();
        let file = dir.path().join("notes.md");
        let (files, _) = discover_files(&file, &DiscoveryConfig::default()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_root() {
        let result = discover_files(
            Path::new("/nonexistent/geoeval-discovery-test"),
            &DiscoveryConfig::default(),
        );
        assert!(matches!(result, Err(DiscoveryError::RootNotFound { .. })));
    }

    #[test]
    fn test_max_files_exceeded() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            max_files: 2,
            ..Default::default()
        };
        let result = discover_files(dir.path(), &config);
        assert!(matches!(
            result,
            Err(DiscoveryError::MaxFilesExceeded { found: 3, max: 2 })
        ));
    }

    #[test]
    fn test_max_depth_limits_recursion() {
        let dir = make_temp_tree();
        let config = DiscoveryConfig {
            max_depth: 1,
            ..Default::default()
        };
        let (files, _) = discover_files(dir.path(), &config).unwrap();
        assert!(!names(&files).contains(&"run3.log".to_string()));
    }
}
