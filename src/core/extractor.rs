// GeoEval - core/extractor.rs
//
// Single-pass, line-oriented extraction of document records from evaluation
// logs. Core layer: accepts lines, never touches the filesystem.
//
// Three tagged line shapes are recognised, only on lines starting with '#':
//
//   # Document <name> at (<lat>,<lng>)           -> opens a document
//   #<n> #<rank> close neighbor: (<lat>,<lng>)   -> appends a neighbour
//   # predicted cell center at (<lat>,<lng>)     -> emits the document
//
// Everything else is ignored. Structural or numeric errors abort the run.

use crate::core::coord::{Coordinate, CoordinateFactory, DegreesFactory};
use crate::core::model::{DocumentRecord, Neighbor};
use crate::util::constants::{
    COORD_CLOSE, COORD_SEPARATOR, DOCUMENT_MARKER, LINE_MARKER, NEIGHBOR_MARKER, PATH_SEPARATOR,
    PREDICTED_MARKER, RANK_MARKER, TRUE_COORD_MARKER,
};
use crate::util::error::ExtractError;
use crate::util::logging::preview;
use serde::Serialize;

const TRUE_PAIR: &str = "a '(lat,lng)' true coordinate closed by ')'";
const NEIGHBOR_PAIR: &str = "a '(lat,lng)' neighbor coordinate closed by ')'";
const PREDICTED_PAIR: &str = "a '(lat,lng)' predicted coordinate closed by ')'";

/// Extraction behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Close the document slot once its record is emitted.
    ///
    /// When false (the default) the accumulator is left as-is after emission,
    /// so a second predicted line before a new header re-emits the previous
    /// document's name, true coordinate, and neighbours. When true, that
    /// second predicted line (or a stray neighbour line) is a
    /// `MalformedLogLine`.
    pub strict: bool,
}

/// Counters describing one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    /// Total lines fed to the extractor.
    pub lines_scanned: usize,
    /// Lines starting with the line marker.
    pub marker_lines: usize,
    /// Marker lines matching none of the three shapes.
    pub ignored_marker_lines: usize,
    /// Records emitted.
    pub records_emitted: usize,
    /// Documents opened by a header but never completed by a predicted line.
    pub dropped_documents: usize,
}

/// Records plus counters from a one-shot extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub records: Vec<DocumentRecord>,
    pub summary: ExtractSummary,
}

/// Name and true coordinate of the most recent header line.
#[derive(Debug, Clone)]
struct DocumentHeader {
    name: String,
    true_coord: Coordinate,
}

/// Per-run accumulator. Reset by every header line.
#[derive(Debug, Default)]
struct ParserState {
    header: Option<DocumentHeader>,
    neighbors: Vec<Neighbor>,
    /// A header has been seen and its predicted line has not.
    open: bool,
}

/// Line shapes after classification.
enum LineShape<'a> {
    Header { name: &'a str, pair: &'a str },
    Neighbor { marker_at: usize, pair: &'a str },
    Predicted { pair: &'a str },
    Unrecognised,
}

/// Stateful scanner turning log lines into [`DocumentRecord`]s.
///
/// One instance corresponds to one extraction run. Feed lines in order with
/// [`feed`](Self::feed), then call [`finish`](Self::finish); or use
/// [`extract`](Self::extract) / [`records`](Self::records) over a whole input.
pub struct LogExtractor<F = DegreesFactory> {
    factory: F,
    config: ExtractConfig,
    state: ParserState,
    summary: ExtractSummary,
}

impl Default for LogExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LogExtractor {
    /// Creates an extractor using the pass-through degrees factory.
    pub fn new() -> Self {
        Self::with_factory(DegreesFactory)
    }
}

impl<F: CoordinateFactory> LogExtractor<F> {
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory,
            config: ExtractConfig::default(),
            state: ParserState::default(),
            summary: ExtractSummary::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    /// Counters accumulated so far.
    pub fn summary(&self) -> &ExtractSummary {
        &self.summary
    }

    /// Processes one line. `line_number` is its 1-based position in the input.
    ///
    /// Returns the completed record when `line` is a predicted-coordinate line.
    pub fn feed(
        &mut self,
        line_number: usize,
        line: &str,
    ) -> Result<Option<DocumentRecord>, ExtractError> {
        self.summary.lines_scanned += 1;

        if !line.starts_with(LINE_MARKER) {
            return Ok(None);
        }
        self.summary.marker_lines += 1;

        match classify(line) {
            LineShape::Header { name, pair } => {
                let true_coord = self.parse_pair(line_number, line, pair, TRUE_PAIR)?;
                self.open_document(line_number, strip_path_prefix(name), true_coord);
                Ok(None)
            }
            LineShape::Neighbor { marker_at, pair } => {
                let coord = self.parse_pair(line_number, line, pair, NEIGHBOR_PAIR)?;
                let rank = parse_rank(line_number, line, marker_at)?;
                self.push_neighbor(line_number, line, Neighbor { coord, rank })?;
                Ok(None)
            }
            LineShape::Predicted { pair } => {
                let predicted = self.parse_pair(line_number, line, pair, PREDICTED_PAIR)?;
                self.emit(line_number, line, predicted).map(Some)
            }
            LineShape::Unrecognised => {
                self.summary.ignored_marker_lines += 1;
                tracing::trace!(line_number, line = preview(line), "Ignoring marker line");
                Ok(None)
            }
        }
    }

    /// Ends the run. A document still open at this point is dropped.
    pub fn finish(mut self) -> ExtractSummary {
        if self.state.open {
            self.drop_open_document("end of input");
        }
        tracing::debug!(
            lines = self.summary.lines_scanned,
            records = self.summary.records_emitted,
            dropped = self.summary.dropped_documents,
            ignored = self.summary.ignored_marker_lines,
            "Extraction finished"
        );
        self.summary
    }

    /// Runs the extractor over a whole line sequence, failing on the first
    /// malformed line.
    pub fn extract<I, S>(mut self, lines: I) -> Result<Extraction, ExtractError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut records = Vec::new();
        for (idx, line) in lines.into_iter().enumerate() {
            if let Some(record) = self.feed(idx + 1, line.as_ref())? {
                records.push(record);
            }
        }
        let summary = self.finish();
        Ok(Extraction { records, summary })
    }

    /// Lazily yields records as their predicted lines are reached.
    ///
    /// The iterator ends after the first error it yields.
    pub fn records<I, S>(self, lines: I) -> Records<F, I::IntoIter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Records {
            extractor: self,
            lines: lines.into_iter().enumerate(),
            failed: false,
        }
    }

    fn open_document(&mut self, line_number: usize, name: &str, true_coord: Coordinate) {
        if self.state.open {
            self.drop_open_document("new document header");
        }
        tracing::trace!(line_number, document = name, "Document header");
        self.state.header = Some(DocumentHeader {
            name: name.to_string(),
            true_coord,
        });
        self.state.neighbors.clear();
        self.state.open = true;
    }

    fn push_neighbor(
        &mut self,
        line_number: usize,
        line: &str,
        neighbor: Neighbor,
    ) -> Result<(), ExtractError> {
        if self.config.strict && !self.state.open {
            return Err(ExtractError::MalformedLogLine {
                line_number,
                line: line.to_string(),
                expected: "a document header before the neighbor line",
            });
        }
        if self.state.header.is_none() {
            // The next header clears it.
            tracing::debug!(
                line_number,
                rank = neighbor.rank,
                "Neighbor line before any document header"
            );
        }
        self.state.neighbors.push(neighbor);
        Ok(())
    }

    fn emit(
        &mut self,
        line_number: usize,
        line: &str,
        predicted_coord: Coordinate,
    ) -> Result<DocumentRecord, ExtractError> {
        let missing_header = || ExtractError::MalformedLogLine {
            line_number,
            line: line.to_string(),
            expected: "a document header before the predicted coordinate",
        };

        let record = if self.config.strict {
            if !self.state.open {
                return Err(missing_header());
            }
            let header = self.state.header.take().ok_or_else(missing_header)?;
            DocumentRecord {
                document: header.name,
                true_coord: header.true_coord,
                predicted_coord,
                neighbors: std::mem::take(&mut self.state.neighbors),
            }
        } else {
            let header = self.state.header.as_ref().ok_or_else(missing_header)?;
            if !self.state.open {
                tracing::debug!(
                    line_number,
                    document = %header.name,
                    "Predicted coordinate without a new header; reusing previous document"
                );
            }
            DocumentRecord {
                document: header.name.clone(),
                true_coord: header.true_coord,
                predicted_coord,
                neighbors: self.state.neighbors.clone(),
            }
        };

        self.state.open = false;
        self.summary.records_emitted += 1;
        tracing::trace!(
            line_number,
            document = %record.document,
            neighbors = record.neighbors.len(),
            "Record emitted"
        );
        Ok(record)
    }

    fn drop_open_document(&mut self, reason: &'static str) {
        self.summary.dropped_documents += 1;
        self.state.open = false;
        if let Some(header) = &self.state.header {
            tracing::debug!(document = %header.name, reason, "Dropping incomplete document");
        }
    }

    fn parse_pair(
        &self,
        line_number: usize,
        line: &str,
        pair: &str,
        expected: &'static str,
    ) -> Result<Coordinate, ExtractError> {
        let (lat, lng) = split_pair(pair).ok_or_else(|| ExtractError::MalformedLogLine {
            line_number,
            line: line.to_string(),
            expected,
        })?;
        let lat = parse_degrees(line_number, line, lat, "latitude")?;
        let lng = parse_degrees(line_number, line, lng, "longitude")?;
        Ok(self.factory.from_degrees(lat, lng))
    }
}

/// Lazy record iterator returned by [`LogExtractor::records`].
pub struct Records<F, I> {
    extractor: LogExtractor<F>,
    lines: std::iter::Enumerate<I>,
    failed: bool,
}

impl<F, I> Records<F, I> {
    /// Counters accumulated so far.
    pub fn summary(&self) -> &ExtractSummary {
        &self.extractor.summary
    }
}

impl<F, I, S> Iterator for Records<F, I>
where
    F: CoordinateFactory,
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<DocumentRecord, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for (idx, line) in self.lines.by_ref() {
            match self.extractor.feed(idx + 1, line.as_ref()) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// One-shot extraction over the lines of `content` with default settings.
pub fn extract_records(content: &str) -> Result<Vec<DocumentRecord>, ExtractError> {
    LogExtractor::new()
        .extract(content.lines())
        .map(|extraction| extraction.records)
}

// =============================================================================
// Line-level helpers
// =============================================================================

/// Ordered shape checks: header, then neighbour, then predicted.
fn classify(line: &str) -> LineShape<'_> {
    if let Some(doc_at) = line.find(DOCUMENT_MARKER) {
        let after_doc = &line[doc_at + DOCUMENT_MARKER.len()..];
        if let Some(at) = after_doc.find(TRUE_COORD_MARKER) {
            return LineShape::Header {
                name: &after_doc[..at],
                pair: &after_doc[at + TRUE_COORD_MARKER.len()..],
            };
        }
    }
    if let Some(marker_at) = line.find(NEIGHBOR_MARKER) {
        return LineShape::Neighbor {
            marker_at,
            pair: &line[marker_at + NEIGHBOR_MARKER.len()..],
        };
    }
    if let Some(at) = line.find(PREDICTED_MARKER) {
        return LineShape::Predicted {
            pair: &line[at + PREDICTED_MARKER.len()..],
        };
    }
    LineShape::Unrecognised
}

/// Keeps only the text after the first path separator, if there is one.
fn strip_path_prefix(name: &str) -> &str {
    match name.find(PATH_SEPARATOR) {
        Some(idx) => &name[idx + PATH_SEPARATOR.len_utf8()..],
        None => name,
    }
}

/// Splits `lat,lng)...` into its two raw tokens. `None` when the closing
/// parenthesis is missing or the pair does not have exactly two parts.
fn split_pair(text: &str) -> Option<(&str, &str)> {
    let inner = &text[..text.find(COORD_CLOSE)?];
    let mut parts = inner.split(COORD_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lng), None) => Some((lat, lng)),
        _ => None,
    }
}

fn parse_degrees(
    line_number: usize,
    line: &str,
    token: &str,
    field: &'static str,
) -> Result<f64, ExtractError> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExtractError::NumericParse {
            line_number,
            line: line.to_string(),
            token: token.to_string(),
            field,
        })
}

/// Reads the rank of a neighbour line.
///
/// The first `#` belongs to the line prefix; the rank runs from just after the
/// second `#` to the next whitespace. Compact lines with a single `#`
/// (`# 3 close neighbor: (..)`) carry the rank as the token right before the
/// neighbour marker.
fn parse_rank(line_number: usize, line: &str, marker_at: usize) -> Result<u32, ExtractError> {
    let token = match second_rank_marker(line) {
        Some(hash_at) => {
            let after = &line[hash_at + RANK_MARKER.len_utf8()..];
            let end = after
                .find(char::is_whitespace)
                .ok_or_else(|| ExtractError::MalformedLogLine {
                    line_number,
                    line: line.to_string(),
                    expected: "whitespace after the neighbor rank",
                })?;
            &after[..end]
        }
        None => line[..marker_at]
            .split_whitespace()
            .last()
            .unwrap_or("")
            .trim_start_matches(RANK_MARKER),
    };

    token
        .parse::<u32>()
        .map_err(|_| ExtractError::NumericParse {
            line_number,
            line: line.to_string(),
            token: token.to_string(),
            field: "rank",
        })
}

fn second_rank_marker(line: &str) -> Option<usize> {
    let first = line.find(RANK_MARKER)?;
    let rest_start = first + RANK_MARKER.len_utf8();
    line[rest_start..]
        .find(RANK_MARKER)
        .map(|idx| rest_start + idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::from_degrees(lat, lng)
    }

    fn strict() -> ExtractConfig {
        ExtractConfig { strict: true }
    }

    #[test]
    fn test_single_document_example() {
        let content = "# Document foo/bar.txt at (40.0,-75.0)\n\
                       # 1 close neighbor: (41.0,-74.0)\n\
                       # predicted cell center at (40.5,-74.5)\n";

        let records = extract_records(content).unwrap();

        assert_eq!(
            records,
            vec![DocumentRecord {
                document: "bar.txt".to_string(),
                true_coord: c(40.0, -75.0),
                predicted_coord: c(40.5, -74.5),
                neighbors: vec![Neighbor {
                    coord: c(41.0, -74.0),
                    rank: 1
                }],
            }]
        );
    }

    #[test]
    fn test_records_in_file_order_with_neighbor_counts() {
        let content = "\
#1 Document a.txt at (1.0,1.0)
#1 #1 close neighbor: (1.1,1.1)
#1 #2 close neighbor: (1.2,1.2)
#1 predicted cell center at (1.5,1.5)
#2 Document b.txt at (2.0,2.0)
#2 predicted cell center at (2.5,2.5)
#3 Document c.txt at (3.0,3.0)
#3 #1 close neighbor: (3.1,3.1)
#3 predicted cell center at (3.5,3.5)
";
        let records = extract_records(content).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.document.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
        let counts: Vec<usize> = records.iter().map(|r| r.neighbors.len()).collect();
        assert_eq!(counts, vec![2, 0, 1]);
    }

    #[test]
    fn test_path_prefix_stripped_at_first_separator_only() {
        let content = "# Document corpus/dev/doc 7 at (0.0,0.0)\n\
                       # predicted cell center at (1.0,1.0)\n\
                       # Document plain-name at (0.0,0.0)\n\
                       # predicted cell center at (1.0,1.0)\n";
        let records = extract_records(content).unwrap();
        assert_eq!(records[0].document, "dev/doc 7");
        assert_eq!(records[1].document, "plain-name");
    }

    #[test]
    fn test_unmarked_and_unrecognised_lines_are_ignored() {
        let content = "\
Loading model...
# Document a at (1.0,2.0)
  # indented lines are not marker lines
Document z at (9.0,9.0)
# Evaluating with 10 cells
# Document count without a coordinate
predicted cell center at (8.0,8.0)
# predicted cell center at (3.0,4.0)
";
        let extraction = LogExtractor::new().extract(content.lines()).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].document, "a");
        assert_eq!(extraction.records[0].true_coord, c(1.0, 2.0));
        assert_eq!(extraction.summary.lines_scanned, 8);
        assert_eq!(extraction.summary.marker_lines, 4);
        assert_eq!(extraction.summary.ignored_marker_lines, 2);
    }

    #[test]
    fn test_open_document_at_end_is_dropped() {
        let content = "# Document a at (1.0,2.0)\n\
                       # predicted cell center at (3.0,4.0)\n\
                       # Document b at (5.0,6.0)\n\
                       #1 #1 close neighbor: (5.5,6.5)\n";
        let extraction = LogExtractor::new().extract(content.lines()).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.summary.dropped_documents, 1);
    }

    #[test]
    fn test_input_ending_on_header_drops_that_document() {
        let content = "# Document a at (1.0,2.0)\n\
                       # predicted cell center at (3.0,4.0)\n\
                       # Document b at (5.0,6.0)";
        let extraction = LogExtractor::new().extract(content.lines()).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].document, "a");
        assert_eq!(extraction.summary.dropped_documents, 1);
    }

    #[test]
    fn test_header_after_header_drops_first_document() {
        let content = "# Document first at (1.0,1.0)\n\
                       #1 #1 close neighbor: (1.1,1.1)\n\
                       # Document second at (2.0,2.0)\n\
                       # predicted cell center at (2.5,2.5)\n";
        let extraction = LogExtractor::new().extract(content.lines()).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].document, "second");
        assert!(extraction.records[0].neighbors.is_empty());
        assert_eq!(extraction.summary.dropped_documents, 1);
    }

    #[test]
    fn test_rank_uses_second_hash() {
        let content = "#42 Document d at (0.0,0.0)\n\
                       #42   #7 close neighbor: (1.0,2.0) score 0.5\n\
                       #42 predicted cell center at (0.0,0.0)\n";
        let records = extract_records(content).unwrap();
        assert_eq!(records[0].neighbors[0].rank, 7);
    }

    #[test]
    fn test_neighbors_kept_in_encounter_order() {
        let content = "# Document d at (0.0,0.0)\n\
                       #1 #3 close neighbor: (3.0,0.0)\n\
                       #1 #1 close neighbor: (1.0,0.0)\n\
                       #1 #2 close neighbor: (2.0,0.0)\n\
                       # predicted cell center at (0.0,0.0)\n";
        let records = extract_records(content).unwrap();
        let ranks: Vec<u32> = records[0].neighbors.iter().map(|n| n.rank).collect();
        assert_eq!(ranks, vec![3, 1, 2]);
    }

    #[test]
    fn test_whitespace_inside_pair_is_tolerated() {
        let content = "# Document d at ( 40.25 , -75.5 )\n\
                       # predicted cell center at (40.0,-75.0)\n";
        let records = extract_records(content).unwrap();
        assert_eq!(records[0].true_coord, c(40.25, -75.5));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "# Document d at (1.0,2.0)\r\n# predicted cell center at (3.0,4.0)\r\n";
        let records = extract_records(content).unwrap();
        assert_eq!(records[0].predicted_coord, c(3.0, 4.0));
    }

    #[test]
    fn test_missing_close_paren_is_malformed() {
        let content = "# some preamble\n# Document d at (1.0,2.0\n";
        let err = extract_records(content).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedLogLine { .. }), "{err:?}");
        assert_eq!(err.line_number(), 2);
        assert_eq!(err.line(), "# Document d at (1.0,2.0");
    }

    #[test]
    fn test_pair_without_exactly_two_parts_is_malformed() {
        for pair in ["(1.0)", "(1.0,2.0,3.0)"] {
            let content = format!("# predicted cell center at {pair}");
            let err = extract_records(&content).unwrap_err();
            assert!(matches!(err, ExtractError::MalformedLogLine { .. }), "{err:?}");
        }
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let content = "# Document d at (north,2.0)\n";
        match extract_records(content).unwrap_err() {
            ExtractError::NumericParse {
                line_number,
                token,
                field,
                ..
            } => {
                assert_eq!(line_number, 1);
                assert_eq!(token, "north");
                assert_eq!(field, "latitude");
            }
            other => panic!("expected NumericParse, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        let content = "# Document d at (1.0,NaN)\n";
        let err = extract_records(content).unwrap_err();
        assert!(matches!(err, ExtractError::NumericParse { field: "longitude", .. }));
    }

    #[test]
    fn test_non_numeric_rank() {
        let content = "# Document d at (0.0,0.0)\n#1 #x close neighbor: (1.0,1.0)\n";
        match extract_records(content).unwrap_err() {
            ExtractError::NumericParse {
                line_number,
                token,
                field,
                ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(token, "x");
                assert_eq!(field, "rank");
            }
            other => panic!("expected NumericParse, got {other:?}"),
        }
    }

    #[test]
    fn test_predicted_before_any_header_is_malformed() {
        for config in [ExtractConfig::default(), strict()] {
            let err = LogExtractor::new()
                .with_config(config)
                .extract(["# predicted cell center at (1.0,1.0)"])
                .unwrap_err();
            assert!(matches!(err, ExtractError::MalformedLogLine { .. }));
        }
    }

    #[test]
    fn test_neighbor_before_any_header_is_discarded_by_default() {
        let lines = [
            "#0 #1 close neighbor: (9.0,9.0)",
            "# Document a.txt at (1.0,2.0)",
            "# predicted cell center at (1.5,2.5)",
        ];
        let extraction = LogExtractor::new().extract(lines).unwrap();

        assert_eq!(extraction.records.len(), 1);
        assert_eq!(extraction.records[0].document, "a.txt");
        assert_eq!(extraction.records[0].true_coord, c(1.0, 2.0));
        assert!(extraction.records[0].neighbors.is_empty());
        assert_eq!(extraction.summary.dropped_documents, 0);
    }

    #[test]
    fn test_strict_mode_rejects_neighbor_before_any_header() {
        let err = LogExtractor::new()
            .with_config(strict())
            .extract(["#1 #1 close neighbor: (1.0,1.0)"])
            .unwrap_err();
        assert!(matches!(err, ExtractError::MalformedLogLine { line_number: 1, .. }));
    }

    #[test]
    fn test_second_predicted_line_reuses_stale_state_by_default() {
        let lines = [
            "# Document d at (1.0,1.0)",
            "#1 #1 close neighbor: (1.1,1.1)",
            "# predicted cell center at (2.0,2.0)",
            "# predicted cell center at (3.0,3.0)",
        ];
        let records = LogExtractor::new().extract(lines).unwrap().records;

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].document, "d");
        assert_eq!(records[1].true_coord, c(1.0, 1.0));
        assert_eq!(records[1].predicted_coord, c(3.0, 3.0));
        assert_eq!(records[1].neighbors, records[0].neighbors);
    }

    #[test]
    fn test_strict_mode_rejects_second_predicted_line() {
        let lines = [
            "# Document d at (1.0,1.0)",
            "# predicted cell center at (2.0,2.0)",
            "# predicted cell center at (3.0,3.0)",
        ];
        let err = LogExtractor::new()
            .with_config(strict())
            .extract(lines)
            .unwrap_err();
        assert_eq!(err.line_number(), 3);
    }

    #[test]
    fn test_strict_mode_rejects_neighbor_after_emission() {
        let lines = [
            "# Document d at (1.0,1.0)",
            "# predicted cell center at (2.0,2.0)",
            "#1 #1 close neighbor: (1.1,1.1)",
        ];
        let err = LogExtractor::new()
            .with_config(strict())
            .extract(lines)
            .unwrap_err();
        assert!(matches!(err, ExtractError::MalformedLogLine { line_number: 3, .. }));
    }

    #[test]
    fn test_incremental_feed_emits_on_predicted_line() {
        let mut extractor = LogExtractor::new();
        assert_eq!(extractor.feed(1, "# Document d at (1.0,1.0)").unwrap(), None);
        assert_eq!(
            extractor.feed(2, "# 4 close neighbor: (1.5,1.5)").unwrap(),
            None
        );
        let record = extractor
            .feed(3, "# predicted cell center at (2.0,2.0)")
            .unwrap()
            .expect("record");
        assert_eq!(record.neighbors[0].rank, 4);
        assert_eq!(extractor.finish().records_emitted, 1);
    }

    #[test]
    fn test_lazy_records_stop_after_error() {
        let lines = vec![
            "# Document a at (1.0,1.0)",
            "# predicted cell center at (2.0,2.0)",
            "# Document b at (oops,1.0)",
            "# Document c at (1.0,1.0)",
            "# predicted cell center at (2.0,2.0)",
        ];
        let mut records = LogExtractor::new().records(lines);

        assert_eq!(records.next().unwrap().unwrap().document, "a");
        assert!(records.next().unwrap().is_err());
        assert!(records.next().is_none());
    }

    #[test]
    fn test_custom_factory_is_used() {
        let snap = |lat: f64, lng: f64| Coordinate::from_degrees(lat.floor(), lng.floor());
        let lines = [
            "# Document d at (1.7,2.2)",
            "# predicted cell center at (3.9,4.1)",
        ];
        let records = LogExtractor::with_factory(snap).extract(lines).unwrap().records;
        assert_eq!(records[0].true_coord, c(1.0, 2.0));
        assert_eq!(records[0].predicted_coord, c(3.0, 4.0));
    }

    #[test]
    fn test_strip_path_prefix() {
        assert_eq!(strip_path_prefix("a/b/c"), "b/c");
        assert_eq!(strip_path_prefix("abc"), "abc");
        assert_eq!(strip_path_prefix("/abs"), "abs");
    }
}
