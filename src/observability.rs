//! Operation outcome events.
//!
//! [`crate::runner::run`] emits one [`OperationEvent`] per operation to an optional
//! [`OperationObserver`]. A successful event carries an [`OperationSummary`] with the figures that
//! matter for that operation (files moved and skipped, rows and text columns, rows and
//! dimensions); a failed one carries its severity and whether it crossed the alert threshold.
//!
//! [`LogObserver`] writes events through the `log` facade. [`FileObserver`] appends them to a file
//! as JSON lines. A `Vec<Arc<dyn OperationObserver>>` is itself an observer that fans out.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;

use crate::jsonstat::FlattenSummary;
use crate::organize::OrganizeReport;
use crate::types::DatasetStatistics;

/// Severity of a failed operation, ordered for alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationSeverity {
    Info,
    /// Caller-requested stop (cancellation).
    Warning,
    /// The input was unusable.
    Error,
    /// Missing inputs, I/O and other infrastructure failures.
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Organize,
    Statistics,
    Flatten,
}

/// What a successful operation produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OperationSummary {
    Organize {
        moved: usize,
        skipped: usize,
        dry_run: bool,
    },
    Statistics {
        rows: u64,
        columns: usize,
        text_columns: usize,
    },
    Flatten {
        rows: u64,
        dimensions: Vec<String>,
    },
}

impl OperationSummary {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Organize { .. } => OperationKind::Organize,
            Self::Statistics { .. } => OperationKind::Statistics,
            Self::Flatten { .. } => OperationKind::Flatten,
        }
    }
}

impl From<&OrganizeReport> for OperationSummary {
    fn from(report: &OrganizeReport) -> Self {
        Self::Organize {
            moved: report.moved.len(),
            skipped: report.skipped.len(),
            dry_run: report.dry_run,
        }
    }
}

impl From<&DatasetStatistics> for OperationSummary {
    fn from(stats: &DatasetStatistics) -> Self {
        Self::Statistics {
            rows: stats.row_count,
            columns: stats.columns.len(),
            text_columns: stats.columns.iter().filter(|c| !c.is_numeric()).count(),
        }
    }
}

impl From<&FlattenSummary> for OperationSummary {
    fn from(summary: &FlattenSummary) -> Self {
        Self::Flatten {
            rows: summary.rows_written,
            dimensions: summary.dimensions.clone(),
        }
    }
}

impl fmt::Display for OperationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organize {
                moved,
                skipped,
                dry_run,
            } => {
                write!(f, "moved {moved} file(s), skipped {skipped}")?;
                if *dry_run {
                    write!(f, " (dry run)")?;
                }
                Ok(())
            }
            Self::Statistics {
                rows,
                columns,
                text_columns,
            } => write!(f, "{rows} rows, {columns} columns ({text_columns} text)"),
            Self::Flatten { rows, dimensions } => {
                write!(f, "{rows} rows over [{}]", dimensions.join(", "))
            }
        }
    }
}

/// Success or failure of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EventResult {
    Ok {
        summary: OperationSummary,
    },
    Failed {
        severity: OperationSeverity,
        error: String,
        /// Severity met the configured alert threshold.
        alert: bool,
    },
}

/// One finished operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationEvent {
    pub kind: OperationKind,
    /// Input path (directory for organize).
    pub path: PathBuf,
    pub result: EventResult,
}

pub trait OperationObserver: Send + Sync {
    fn on_event(&self, event: &OperationEvent);
}

impl OperationObserver for Vec<Arc<dyn OperationObserver>> {
    fn on_event(&self, event: &OperationEvent) {
        for o in self {
            o.on_event(event);
        }
    }
}

/// Writes events through the `log` facade; failures log at a level matching their severity.
#[derive(Debug, Default)]
pub struct LogObserver;

impl OperationObserver for LogObserver {
    fn on_event(&self, event: &OperationEvent) {
        let path = event.path.display();
        match &event.result {
            EventResult::Ok { summary } => log::info!("{:?} {path}: {summary}", event.kind),
            EventResult::Failed {
                severity,
                error,
                alert,
            } => {
                let level = match severity {
                    OperationSeverity::Info => log::Level::Info,
                    OperationSeverity::Warning => log::Level::Warn,
                    OperationSeverity::Error | OperationSeverity::Critical => log::Level::Error,
                };
                let tag = if *alert { "[ALERT] " } else { "" };
                log::log!(level, "{tag}{:?} {path} failed ({severity:?}): {error}", event.kind);
            }
        }
    }
}

/// Appends each event as one JSON line, stamped with the UTC time it was recorded.
#[derive(Debug)]
pub struct FileObserver {
    file: Mutex<File>,
}

impl FileObserver {
    /// Open (or create) `path` for appending.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl OperationObserver for FileObserver {
    fn on_event(&self, event: &OperationEvent) {
        let line = serde_json::json!({ "ts": Utc::now().to_rfc3339(), "event": event });
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        if let Err(e) = writeln!(file, "{line}") {
            log::warn!("could not record event: {e}");
        }
    }
}
