//! `datashaper` is a small command-line toolkit (and library) with three independent data
//! operations:
//!
//! - **Statistics** over gzip-compressed CSV: one streaming pass, constant memory per column,
//!   producing a row count plus per-column count/mean/min/max ([`stats::compute_statistics`]).
//! - **Flattening** of a JSON-stat dataset into CSV: one row per combination of dimension
//!   categories, last dimension varying fastest ([`jsonstat::convert`]).
//! - **Organizing** the files of a directory into subdirectories by extension or modification
//!   month ([`organize::organize_directory`]).
//!
//! ## Column typing
//!
//! Every column starts numeric. The first non-empty value that does not parse as a number turns
//! the column into text for the rest of the stream, and its numeric statistics reset to the
//! "no data" state (count 0, mean 0, min +inf, max -inf). Empty fields are ignored.
//!
//! ## Quick example: statistics
//!
//! ```no_run
//! use datashaper::stats::compute_statistics;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), datashaper::ToolError> {
//! let stats = compute_statistics("sales.csv.gz", CancellationToken::new()).await?;
//! for col in &stats.columns {
//!     println!("{} numeric={} mean={}", col.name, col.is_numeric(), col.mean());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: flattening
//!
//! ```rust
//! use datashaper::jsonstat::{write_rows, JsonStatDataset};
//!
//! let ds = JsonStatDataset::parse_str(r#"{
//!     "id": ["region", "year"],
//!     "dimension": {
//!         "region": { "category": { "index": ["NO", "SE"], "label": { "NO": "Norway" } } },
//!         "year": { "category": { "index": ["2020", "2021"] } }
//!     },
//!     "value": [1, 2, 3, 4]
//! }"#).unwrap();
//!
//! let mut w = csv::Writer::from_writer(Vec::new());
//! let rows = write_rows(&ds, &mut w).unwrap();
//! assert_eq!(rows, 4);
//! let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
//! assert!(text.starts_with("region,year,value\nNorway,2020,1\nNorway,2021,2\nSE,2020,3\n"));
//! ```
//!
//! ## Modules
//!
//! - [`stats`]: streaming CSV statistics
//! - [`jsonstat`]: JSON-stat flattening
//! - [`organize`]: file relocation by grouping key
//! - [`runner`]: unified, observed entry point over all three
//! - [`observability`]: observer hooks (log facade, event file)
//! - [`types`]: statistics result types
//! - [`error`]: the shared error type

pub mod error;
pub mod jsonstat;
pub mod observability;
pub mod organize;
pub mod runner;
pub mod stats;
pub mod types;

pub use error::{ErrorKind, ToolError, ToolResult};
