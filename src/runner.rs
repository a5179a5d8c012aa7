//! Unified entry point.
//!
//! [`run`] executes one [`OperationRequest`] and, if an
//! [`crate::observability::OperationObserver`] is configured, reports the outcome to it as one
//! [`OperationEvent`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{ErrorKind, ToolError, ToolResult};
use crate::jsonstat::{self, FlattenSummary};
use crate::observability::{
    EventResult, OperationEvent, OperationKind, OperationObserver, OperationSeverity, OperationSummary,
};
use crate::organize::{self, OrganizeOptions, OrganizeReport};
use crate::stats;
use crate::types::DatasetStatistics;

/// One operation to run.
#[derive(Debug, Clone)]
pub enum OperationRequest {
    Organize {
        dir: PathBuf,
        options: OrganizeOptions,
    },
    Statistics {
        path: PathBuf,
    },
    Flatten {
        input: PathBuf,
        output: PathBuf,
    },
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Organize { .. } => OperationKind::Organize,
            Self::Statistics { .. } => OperationKind::Statistics,
            Self::Flatten { .. } => OperationKind::Flatten,
        }
    }

    /// The input path the operation reads.
    pub fn input_path(&self) -> &PathBuf {
        match self {
            Self::Organize { dir, .. } => dir,
            Self::Statistics { path } => path,
            Self::Flatten { input, .. } => input,
        }
    }
}

/// Result of a successful [`run`].
#[derive(Debug, Clone)]
pub enum OperationOutcome {
    Organized(OrganizeReport),
    Statistics(DatasetStatistics),
    Flattened(FlattenSummary),
}

impl OperationOutcome {
    pub fn summary(&self) -> OperationSummary {
        match self {
            Self::Organized(report) => report.into(),
            Self::Statistics(stats) => stats.into(),
            Self::Flattened(summary) => summary.into(),
        }
    }
}

/// Options controlling [`run`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct RunOptions {
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn OperationObserver>>,
    /// Failures at or above this severity are flagged as alerts.
    pub alert_at_or_above: OperationSeverity,
    /// Cancels a running statistics pass.
    pub cancel: CancellationToken,
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            observer: None,
            alert_at_or_above: OperationSeverity::Critical,
            cancel: CancellationToken::new(),
        }
    }
}

/// Run one operation.
///
/// When an observer is configured it receives one event: the [`OperationSummary`] on success, or
/// the computed severity on failure, with `alert` set when that severity is at or above
/// `options.alert_at_or_above`.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use datashaper::observability::LogObserver;
/// use datashaper::runner::{run, OperationRequest, RunOptions};
///
/// # async fn go() -> Result<(), datashaper::ToolError> {
/// let opts = RunOptions {
///     observer: Some(Arc::new(LogObserver)),
///     ..Default::default()
/// };
/// let request = OperationRequest::Statistics { path: "data.csv.gz".into() };
/// let _outcome = run(&request, &opts).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run(request: &OperationRequest, options: &RunOptions) -> ToolResult<OperationOutcome> {
    let result = match request {
        OperationRequest::Organize {
            dir,
            options: organize_opts,
        } => {
            let dir = dir.clone();
            let organize_opts = organize_opts.clone();
            tokio::task::spawn_blocking(move || organize::organize_directory(&dir, &organize_opts))
                .await
                .map_err(ToolError::from)
                .and_then(|r| r)
                .map(OperationOutcome::Organized)
        }
        OperationRequest::Statistics { path } => stats::compute_statistics(path, options.cancel.clone())
            .await
            .map(OperationOutcome::Statistics),
        OperationRequest::Flatten { input, output } => jsonstat::convert(input, output)
            .await
            .map(OperationOutcome::Flattened),
    };

    if let Some(obs) = options.observer.as_ref() {
        let event_result = match &result {
            Ok(outcome) => EventResult::Ok {
                summary: outcome.summary(),
            },
            Err(e) => {
                let severity = severity_for_error(e);
                EventResult::Failed {
                    severity,
                    error: e.to_string(),
                    alert: severity >= options.alert_at_or_above,
                }
            }
        };
        obs.on_event(&OperationEvent {
            kind: request.kind(),
            path: request.input_path().clone(),
            result: event_result,
        });
    }

    result
}

/// Severity used when reporting `e` to an observer.
pub fn severity_for_error(e: &ToolError) -> OperationSeverity {
    match e.kind() {
        ErrorKind::NotFound | ErrorKind::Io | ErrorKind::Task => OperationSeverity::Critical,
        ErrorKind::MalformedInput | ErrorKind::Parse => OperationSeverity::Error,
        ErrorKind::Cancelled => OperationSeverity::Warning,
    }
}
