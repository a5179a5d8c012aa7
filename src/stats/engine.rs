//! Single-pass statistics engine.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::debug;
use tokio_util::sync::CancellationToken;

use crate::error::{ToolError, ToolResult};
use crate::types::DatasetStatistics;

use super::numeric::parse_number;

/// Open a gzip-compressed CSV file and compute its statistics.
///
/// A path that does not exist (or vanishes before it is opened) fails with
/// [`ToolError::NotFound`] naming the path, before anything is read.
pub fn statistics_from_gzip_path(
    path: impl AsRef<Path>,
    cancel: &CancellationToken,
) -> ToolResult<DatasetStatistics> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ToolError::not_found(path),
        _ => ToolError::Io(e),
    })?;
    debug!("computing statistics for {}", path.display());

    // Concatenated members (bgzip, appended exports) are read through to the end.
    let decoder = MultiGzDecoder::new(BufReader::new(file));
    let stats = statistics_from_reader(decoder, cancel)?;

    debug!(
        "statistics for {}: rows={} columns={}",
        path.display(),
        stats.row_count,
        stats.columns.len()
    );
    Ok(stats)
}

/// Compute statistics from decompressed CSV bytes with one header row.
///
/// Rules, per data row and per header column `i`:
///
/// - an empty or absent field leaves column `i` untouched
/// - a numeric column folds in the parsed value, or turns text at the first value that does not
///   parse (discarding what it had accumulated)
/// - a text column is not inspected
///
/// Fields beyond the header width are ignored. Memory use is bounded by the column count.
pub fn statistics_from_reader<R: Read>(
    reader: R,
    cancel: &CancellationToken,
) -> ToolResult<DatasetStatistics> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut stats = DatasetStatistics::with_columns(headers.iter());

    let mut record = csv::StringRecord::new();
    loop {
        if cancel.is_cancelled() {
            debug!("statistics cancelled after {} rows", stats.row_count);
            return Err(ToolError::Cancelled);
        }
        if !rdr.read_record(&mut record)? {
            break;
        }

        for (column, raw) in stats.columns.iter_mut().zip(record.iter()) {
            if raw.is_empty() || !column.is_numeric() {
                continue;
            }
            match parse_number(raw) {
                Some(value) => column.observe(value),
                None => column.mark_text(),
            }
        }
        stats.row_count += 1;
    }

    Ok(stats)
}
