// GeoEval - platform/fs.rs
//
// Filesystem reads for evaluation logs.

use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// Invalid UTF-8 is replaced rather than rejected; marker lines are ASCII so
/// stray bytes elsewhere in a log never affect extraction.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            tracing::debug!(path = %path.display(), "Log contains invalid UTF-8; decoding lossily");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}
