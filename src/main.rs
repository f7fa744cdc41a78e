//! CLI entry point for the trip hotspot analyzer.
//!
//! Loads a trip CSV and prints the busiest pickup zones and the busiest
//! (zone, hour) slots.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_hotspots::analyzers::aggregator::TripAggregator;
use trip_hotspots::analyzers::types::LoadSummary;
use trip_hotspots::output::{
    HotspotReport, print_pretty, print_table, write_json, write_slots_csv, write_zones_csv,
};

const DEFAULT_LOG_FILE: &str = "logs/trip_hotspots.log";

#[derive(Parser)]
#[command(name = "trip_hotspots")]
#[command(about = "Find the busiest pickup zones and hours in a trip CSV", long_about = None)]
struct Cli {
    /// Also print skipped rows and their reasons on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Print both the top zones and the top (zone, hour) slots
    Report {
        /// Trip CSV with a header row
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Number of zones to list
        #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
        zones: i64,

        /// Number of slots to list
        #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
        slots: i64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Print the busiest pickup zones as CSV
    Zones {
        #[arg(value_name = "FILE")]
        source: PathBuf,

        #[arg(short, default_value_t = 10, allow_negative_numbers = true)]
        k: i64,
    },
    /// Print the busiest (zone, hour) slots as CSV
    Slots {
        #[arg(value_name = "FILE")]
        source: PathBuf,

        #[arg(short, default_value_t = 10, allow_negative_numbers = true)]
        k: i64,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.verbose)?;

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Report {
            source,
            zones,
            slots,
            format,
        } => {
            let (aggregator, summary) = load(&source);
            let report = HotspotReport::build(
                &source.display().to_string(),
                summary,
                &aggregator,
                zones,
                slots,
            );
            print_pretty(&report);

            match format {
                Format::Table => print_table(&report),
                Format::Json => write_json(&report, &mut stdout)?,
                Format::Csv => {
                    write_zones_csv(&report.top_zones, &mut stdout)?;
                    writeln!(stdout)?;
                    write_slots_csv(&report.top_slots, &mut stdout)?;
                }
            }
        }
        Commands::Zones { source, k } => {
            let (aggregator, _) = load(&source);
            write_zones_csv(&aggregator.top_zones(k), &mut stdout)?;
        }
        Commands::Slots { source, k } => {
            let (aggregator, _) = load(&source);
            write_slots_csv(&aggregator.top_busy_slots(k), &mut stdout)?;
        }
    }

    Ok(())
}

/// Installs a stderr layer and a daily rolling JSON file layer.
///
/// Stderr shows load summaries by default and every skipped row with
/// `--verbose`; the file always keeps per-row detail. `LOG_FILE_PATH` picks
/// the file, `RUST_LOG` and `RUST_LOG_JSON` override the filters.
fn init_tracing(verbose: bool) -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE));
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("trip_hotspots.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_level = if verbose { "trip_hotspots=debug" } else { "info" };
    let stderr_layer = fmt::layer()
        .with_target(verbose)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(stderr_level.parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive("trip_hotspots=debug".parse()?),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

/// Loads `source` into a fresh aggregator, warning when nothing was counted.
fn load(source: &Path) -> (TripAggregator, LoadSummary) {
    let mut aggregator = TripAggregator::new();
    let summary = aggregator.load_file(source);

    if summary.rows_accepted == 0 {
        warn!(
            source = %source.display(),
            rows_read = summary.rows_read,
            "No trips were counted; file missing, empty, or every row malformed"
        );
    } else {
        info!(zones = aggregator.zone_len(), "Aggregation ready");
    }

    (aggregator, summary)
}
