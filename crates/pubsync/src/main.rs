//! pubsync - Entry Point
//!
//! CLI for keeping a website's publication dataset in sync with OpenAlex.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pubsync::sync::{AppendReport, UpdateReport};
use pubsync::{Config, OpenAlexClient, Synchronizer};

#[derive(Parser, Debug)]
#[command(name = "pubsync")]
#[command(about = "Manage website publication metadata and citation counts")]
#[command(version)]
#[command(group(
    clap::ArgGroup::new("mode")
        .required(true)
        .multiple(false)
        .args(["update_citations", "append_metadata", "update_and_append"]),
))]
struct Cli {
    /// Update citation counts for records already in the dataset
    #[arg(long)]
    update_citations: bool,

    /// Append records for manifest identifiers missing from the dataset
    #[arg(long)]
    append_metadata: bool,

    /// Perform both operations: update first, then append
    #[arg(long)]
    update_and_append: bool,

    /// Directory containing the records, manifest, and log files
    dataset_dir: PathBuf,

    /// Suppress progress output (failures are still reported)
    #[arg(long)]
    quiet: bool,

    /// Include errata in the appended metadata
    #[arg(long)]
    include_errata: bool,

    /// Email for the OpenAlex polite pool
    #[arg(long, env = "EMAIL")]
    mailto: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

/// Summary lines always print, even in quiet mode, so per-record failures are
/// never silent.
fn print_update_report(report: &UpdateReport) {
    println!(
        "Update citations: examined {}, updated {}, failed {}",
        report.examined,
        report.updated,
        report.failures.len()
    );
    for failure in &report.failures {
        eprintln!("  failed {}: {}", failure.id, failure.reason);
    }
}

fn print_append_report(report: &AppendReport) {
    println!(
        "Append metadata: {} candidate(s), appended {}, already present {}, errata skipped {}, failed {}",
        report.candidates,
        report.appended,
        report.skipped_existing,
        report.skipped_errata,
        report.failures.len()
    );
    for failure in &report.failures {
        eprintln!("  failed {}: {}", failure.id, failure.reason);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dataset_dir = %cli.dataset_dir.display(),
        "starting pubsync"
    );

    let config = Config::new(cli.mailto.clone());
    let client = OpenAlexClient::new(config)?;
    let sync = Synchronizer::new(client, cli.quiet);

    if cli.update_citations {
        let report = sync.update(&cli.dataset_dir).await?;
        print_update_report(&report);
    } else if cli.append_metadata {
        let report = sync.append(&cli.dataset_dir, cli.include_errata).await?;
        print_append_report(&report);
    } else {
        let combined = sync.update_and_append(&cli.dataset_dir, cli.include_errata).await;

        match &combined.update {
            Ok(report) => print_update_report(report),
            Err(err) => eprintln!("Update citations failed: {err}"),
        }
        match &combined.append {
            Ok(report) => print_append_report(report),
            Err(err) => eprintln!("Append metadata failed: {err}"),
        }

        if combined.has_fatal_error() {
            std::process::exit(1);
        }
    }

    Ok(())
}
