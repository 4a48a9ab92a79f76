// GeoEval - core/export.rs
//
// CSV and JSON export of extracted records.
// Core layer: writes to any Write trait object.

use crate::core::model::DocumentRecord;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// CSV column header, one row per document.
pub const CSV_HEADER: [&str; 9] = [
    "source",
    "document",
    "true_lat",
    "true_lng",
    "predicted_lat",
    "predicted_lng",
    "error_km",
    "neighbor_count",
    "neighbors",
];

/// Export records to CSV, one row per document.
///
/// `rows` pairs each record with the log file it came from. Neighbours are
/// flattened into one column as `rank:lat,lng` joined by `;`, in encounter
/// order.
pub fn export_csv<'s, 'r, W, I>(
    rows: I,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = (&'s str, &'r DocumentRecord)>,
{
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADER).map_err(csv_err)?;

    let mut count = 0;
    for (source, record) in rows {
        let neighbors = record
            .neighbors
            .iter()
            .map(|n| format!("{}:{},{}", n.rank, n.coord.lat, n.coord.lng))
            .collect::<Vec<_>>()
            .join(";");

        let fields = [
            source.to_string(),
            record.document.clone(),
            record.true_coord.lat.to_string(),
            record.true_coord.lng.to_string(),
            record.predicted_coord.lat.to_string(),
            record.predicted_coord.lng.to_string(),
            format!("{:.3}", record.error_km()),
            record.neighbors.len().to_string(),
            neighbors,
        ];
        csv_writer.write_record(&fields).map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export any serialisable value (records, reports) as pretty JSON.
pub fn export_json<W, T>(value: &T, writer: W, export_path: &Path) -> Result<(), ExportError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(writer, value).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })
}
