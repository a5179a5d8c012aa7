//! Streaming statistics over gzip-compressed CSV.
//!
//! Most callers should use [`compute_statistics`], which runs the single-pass engine on the
//! blocking pool and honors a [`CancellationToken`]. The synchronous building blocks are also
//! available:
//!
//! - [`engine::statistics_from_gzip_path`]: open, decompress and analyze a file
//! - [`engine::statistics_from_reader`]: analyze already-decompressed CSV bytes
//! - [`numeric::parse_number`]: the locale-invariant number grammar used per field

pub mod engine;
pub mod numeric;

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::error::ToolResult;
use crate::types::DatasetStatistics;

pub use engine::{statistics_from_gzip_path, statistics_from_reader};
pub use numeric::parse_number;

/// Compute row count and per-column statistics for a gzip-compressed CSV file.
///
/// The pass itself is sequential; it runs on tokio's blocking pool so the calling task is not
/// blocked. `cancel` is checked once per data row; once it fires the call fails with
/// [`crate::ToolError::Cancelled`] and no partial result is returned.
///
/// ```no_run
/// use datashaper::stats::compute_statistics;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn run() -> Result<(), datashaper::ToolError> {
/// let stats = compute_statistics("measurements.csv.gz", CancellationToken::new()).await?;
/// println!("rows={}", stats.row_count);
/// # Ok(())
/// # }
/// ```
pub async fn compute_statistics(
    path: impl AsRef<Path>,
    cancel: CancellationToken,
) -> ToolResult<DatasetStatistics> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || statistics_from_gzip_path(&path, &cancel)).await?
}
