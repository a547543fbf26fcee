//! CLI entry point for the segment log rollup.
//!
//! Provides subcommands for reacting to a storage trigger, replaying an S3
//! event notification, running the aggregation directly, and inspecting the
//! interval table.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use segment_rollup::analyzers::analyzer::{RunOutcome, handle_trigger, log_weight_anomalies, run};
use segment_rollup::analyzers::intervals::{default_intervals, load_intervals};
use segment_rollup::analyzers::types::{IntervalDefinition, SegmentRef};
use segment_rollup::config::RollupConfig;
use segment_rollup::storage::{LocalStore, ObjectStore, S3Store};
use segment_rollup::trigger::{TriggerEvent, events_from_notification};
use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "segment_rollup")]
#[command(about = "Rolls per-segment traffic logs up into a single report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Local directory holding the segment logs
    #[arg(short, long, conflicts_with = "s3_bucket")]
    dir: Option<String>,

    /// S3 bucket holding the segment logs (e.g., "my-bucket")
    #[arg(long)]
    s3_bucket: Option<String>,

    /// Key prefix inside the bucket (defaults to "<container>/")
    #[arg(long, requires = "s3_bucket")]
    prefix: Option<String>,

    /// JSON file with an alternate interval table
    #[arg(long)]
    intervals: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// React to a newly created object, e.g. "test-logs/segment_003.mp4.log"
    Trigger {
        /// Path of the object that was created
        #[arg(value_name = "OBJECT")]
        object: String,

        /// Size of the created object in bytes
        #[arg(short, long, default_value_t = 0)]
        bytes: u64,

        #[command(flatten)]
        store: StoreArgs,
    },
    /// Run from an S3 event notification JSON document ("-" reads stdin)
    Event {
        #[arg(value_name = "FILE")]
        file: String,

        #[command(flatten)]
        store: StoreArgs,
    },
    /// Aggregate the segment logs without a trigger
    Aggregate {
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Show the interval table and segments whose weights do not sum to 1.0
    Intervals {
        /// JSON file with an alternate interval table
        #[arg(long)]
        intervals: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/segment_rollup.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("segment_rollup.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = RollupConfig::from_env()?;

    match cli.command {
        Commands::Trigger {
            object,
            bytes,
            store,
        } => {
            let Some(event) = TriggerEvent::from_path(&config.container, &object, bytes) else {
                info!(object = %object, container = %config.container, "Object does not match trigger path, ignoring");
                return Ok(());
            };

            let intervals = interval_table(store.intervals.as_deref())?;
            let backend = open_store(&store, &config).await?;
            let outcome = handle_trigger(backend.as_ref(), &config, &intervals, &event).await?;
            log_outcome(&outcome);
        }
        Commands::Event { file, store } => {
            let json = read_input(&file)?;
            let events = events_from_notification(&config.container, &json)?;

            let Some(first) = events.first() else {
                info!(container = %config.container, "No matching records in notification, ignoring");
                return Ok(());
            };
            for event in &events[1..] {
                info!(object = %event.path, bytes = event.length, "Additional log in notification");
            }

            let intervals = interval_table(store.intervals.as_deref())?;
            let backend = open_store(&store, &config).await?;
            let outcome = handle_trigger(backend.as_ref(), &config, &intervals, first).await?;
            log_outcome(&outcome);
        }
        Commands::Aggregate { store } => {
            let intervals = interval_table(store.intervals.as_deref())?;
            let backend = open_store(&store, &config).await?;
            let outcome = run(backend.as_ref(), &config, &intervals).await?;
            log_outcome(&outcome);
        }
        Commands::Intervals { intervals } => {
            let intervals = interval_table(intervals.as_deref())?;

            for (i, interval) in intervals.iter().enumerate() {
                info!(interval = i + 1, refs = %describe_refs(interval), "Interval");
            }

            log_weight_anomalies(&intervals, config.segment_count);
        }
    }

    Ok(())
}

/// Picks the storage backend: flags first, then `ROLLUP_LOCAL_DIR`, then `ROLLUP_S3_BUCKET`.
async fn open_store(args: &StoreArgs, config: &RollupConfig) -> Result<Box<dyn ObjectStore>> {
    if let Some(bucket) = &args.s3_bucket {
        return Ok(Box::new(s3_store(bucket, args.prefix.as_deref(), config).await));
    }

    if let Some(dir) = args.dir.as_ref().or(config.local_dir.as_ref()) {
        info!(dir = %dir, "Using local storage");
        return Ok(Box::new(LocalStore::new(dir)));
    }

    match &config.s3_bucket {
        Some(bucket) => Ok(Box::new(s3_store(bucket, None, config).await)),
        None => bail!(
            "no storage configured: pass --dir or --s3-bucket (or set ROLLUP_LOCAL_DIR / ROLLUP_S3_BUCKET)"
        ),
    }
}

async fn s3_store(bucket: &str, prefix: Option<&str>, config: &RollupConfig) -> S3Store {
    let prefix = prefix
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}/", config.container));
    info!(bucket, prefix = %prefix, "Using S3 storage");
    S3Store::from_env(bucket, &prefix).await
}

fn interval_table(path: Option<&str>) -> Result<Vec<IntervalDefinition>> {
    match path {
        Some(path) => {
            let intervals = load_intervals(path)?;
            info!(path, count = intervals.len(), "Loaded interval table");
            Ok(intervals)
        }
        None => Ok(default_intervals()),
    }
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read notification from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
    }
}

fn describe_refs(interval: &IntervalDefinition) -> String {
    interval
        .refs
        .iter()
        .map(|r| match r {
            SegmentRef::Whole(i) => i.to_string(),
            SegmentRef::Half(i) => format!("½{i}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn log_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Waiting { found } => info!(found, "Run ended early, report not written"),
        RunOutcome::Completed { report } => {
            info!(bytes = report.len(), "Run complete")
        }
    }
}
