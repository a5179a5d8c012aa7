use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Result;

use datashaper::observability::{FileObserver, LogObserver, OperationObserver};
use datashaper::organize::{GroupBy, OrganizeOptions, OrganizeReport};
use datashaper::runner::{OperationOutcome, OperationRequest, RunOptions, run};
use datashaper::types::DatasetStatistics;

#[derive(Debug, Parser)]
#[command(name = "datashaper", version, about = "Organize files, profile compressed CSV, flatten JSON-stat")]
struct Cli {
    /// Log debug detail (otherwise RUST_LOG or `info`)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append one JSON line per operation outcome to this file
    #[arg(long, global = true, value_name = "FILE")]
    event_log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Move the files of a directory into subdirectories by grouping key
    Organize {
        dir: PathBuf,
        #[arg(long, value_enum, default_value_t = GroupKey::Extension)]
        by: GroupKey,
        /// Only log what would be moved
        #[arg(long)]
        dry_run: bool,
    },
    /// Row count and per-column statistics of a gzip-compressed CSV file
    Stats {
        path: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Flatten a JSON-stat dataset into CSV
    Flatten { input: PathBuf, output: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GroupKey {
    Extension,
    Month,
}

impl From<GroupKey> for GroupBy {
    fn from(key: GroupKey) -> Self {
        match key {
            GroupKey::Extension => GroupBy::Extension,
            GroupKey::Month => GroupBy::ModifiedMonth,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut observers: Vec<Arc<dyn OperationObserver>> = vec![Arc::new(LogObserver)];
    if let Some(path) = &cli.event_log {
        observers.push(Arc::new(FileObserver::open(path)?));
    }
    let options = RunOptions {
        observer: Some(Arc::new(observers)),
        ..Default::default()
    };

    let cancel = options.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupt received, cancelling");
            cancel.cancel();
        }
    });

    let (request, json) = match cli.command {
        Command::Organize { dir, by, dry_run } => (
            OperationRequest::Organize {
                dir,
                options: OrganizeOptions {
                    group_by: by.into(),
                    dry_run,
                },
            },
            false,
        ),
        Command::Stats { path, json } => (OperationRequest::Statistics { path }, json),
        Command::Flatten { input, output } => (OperationRequest::Flatten { input, output }, false),
    };

    match run(&request, &options).await? {
        OperationOutcome::Organized(report) => print_report(&report),
        OperationOutcome::Statistics(stats) if json => {
            println!("{}", serde_json::to_string_pretty(&stats)?)
        }
        OperationOutcome::Statistics(stats) => print_statistics(&stats),
        OperationOutcome::Flattened(summary) => println!(
            "wrote {} rows ({}) to {}",
            summary.rows_written,
            summary.dimensions.join(", "),
            summary.output.display()
        ),
    }

    Ok(())
}

fn print_report(report: &OrganizeReport) {
    let verb = if report.dry_run { "would move" } else { "moved" };
    for mv in &report.moved {
        println!("{verb} {} -> {}", mv.from.display(), mv.to.display());
    }
    for mv in &report.skipped {
        println!("skipped {} (destination exists)", mv.from.display());
    }
    println!("{verb} {} file(s), skipped {}", report.moved.len(), report.skipped.len());
}

fn print_statistics(stats: &DatasetStatistics) {
    println!("rows: {}", stats.row_count);
    let width = stats
        .columns
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0)
        .max("column".len());
    println!(
        "{:<width$}  {:<7}  {:>10}  {:>14}  {:>14}  {:>14}",
        "column", "type", "count", "mean", "min", "max"
    );
    for col in &stats.columns {
        if col.is_numeric() && col.count() > 0 {
            println!(
                "{:<width$}  {:<7}  {:>10}  {:>14.4}  {:>14}  {:>14}",
                col.name,
                "numeric",
                col.count(),
                col.mean(),
                col.min(),
                col.max()
            );
        } else {
            let kind = if col.is_numeric() { "numeric" } else { "text" };
            println!(
                "{:<width$}  {:<7}  {:>10}  {:>14}  {:>14}  {:>14}",
                col.name, kind, "-", "-", "-", "-"
            );
        }
    }
}
