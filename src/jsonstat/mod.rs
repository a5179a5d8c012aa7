//! JSON-stat to CSV flattening.
//!
//! A JSON-stat dataset describes categorical dimensions plus one flat value array laid out over
//! the cartesian product of their categories. Flattening writes one CSV row per combination:
//!
//! ```text
//! region,year,value
//! NO,2020,100
//! NO,2021,110
//! ```
//!
//! Most callers should use [`convert`] (async) or [`flatten_to_path`] (blocking). The pieces
//! are also available on their own:
//!
//! - [`dataset`]: locating dimensions, categories, labels and values in the document
//! - [`flatten`]: index arithmetic and row enumeration
//! - [`writer`]: temp-file-and-rename CSV output

pub mod dataset;
pub mod flatten;
pub mod writer;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{ToolError, ToolResult};

pub use dataset::{Dimension, JsonStatDataset};
pub use flatten::{write_rows, FlatteningContext, VALUE_COLUMN};
pub use writer::AtomicCsvWriter;

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenSummary {
    /// Where the CSV was written.
    pub output: PathBuf,
    /// Dimension names in column order.
    pub dimensions: Vec<String>,
    /// Data rows written (header excluded).
    pub rows_written: u64,
}

/// Convert the JSON-stat document at `input` into a CSV file at `output`.
///
/// `output` is replaced only once every row has been written; on failure it is left as it was.
pub fn flatten_to_path(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> ToolResult<FlattenSummary> {
    let input = input.as_ref();
    let text = fs::read_to_string(input).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ToolError::not_found(input),
        _ => ToolError::Io(e),
    })?;
    let dataset = JsonStatDataset::parse_str(&text)?;
    debug!(
        "flattening {}: dimensions={:?} values={}",
        input.display(),
        dataset.dimension_names(),
        dataset.values.len()
    );

    let mut out = AtomicCsvWriter::new(output)?;
    let rows_written = write_rows(&dataset, out.writer_mut())?;
    let output = out.finish()?;

    Ok(FlattenSummary {
        output,
        dimensions: dataset.dimension_names(),
        rows_written,
    })
}

/// Async wrapper over [`flatten_to_path`].
///
/// The conversion runs to completion on tokio's blocking pool; it has no cancellation point.
///
/// ```no_run
/// # async fn run() -> Result<(), datashaper::ToolError> {
/// let summary = datashaper::jsonstat::convert("population.json", "population.csv").await?;
/// println!("rows={}", summary.rows_written);
/// # Ok(())
/// # }
/// ```
pub async fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> ToolResult<FlattenSummary> {
    let input = input.as_ref().to_path_buf();
    let output = output.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || flatten_to_path(&input, &output)).await?
}
