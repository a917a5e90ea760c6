//! CLI entry point for the rental listing analyzer.
//!
//! Provides subcommands for running the full load → geocode → aggregate
//! pipeline, writing a district-enriched copy of the dataset, and exporting
//! map-marker data.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rental_analyzer::analyzers::aggregate::analyze;
use rental_analyzer::geocode::{DEFAULT_BASE_URL, NominatimClient};
use rental_analyzer::loader::load_listings_from_slice;
use rental_analyzer::output::{append_records, map_view, write_json, write_listings};
use rental_analyzer::resolver::ResolveOptions;
use rental_analyzer::session::AnalysisSession;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "rental_analyzer")]
#[command(about = "Price analysis over rental listings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write chart-ready artifacts
    Analyze {
        /// Path to the listings CSV
        #[arg(value_name = "INPUT")]
        input: String,

        /// Directory for report.json, markers.json, and aggregate CSVs
        #[arg(short, long, default_value = "analysis")]
        output_dir: String,

        /// Language for district names
        #[arg(short, long, default_value = "es")]
        language: String,

        /// Pause between geocoding requests in milliseconds (0 disables)
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },
    /// Attach districts and write the enriched dataset as CSV
    Resolve {
        /// Path to the listings CSV
        #[arg(value_name = "INPUT")]
        input: String,

        /// CSV file to write enriched listings to
        #[arg(short, long, default_value = "enriched.csv")]
        output: String,

        /// Language for district names
        #[arg(short, long, default_value = "es")]
        language: String,

        /// Pause between geocoding requests in milliseconds (0 disables)
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },
    /// Export map-marker JSON (no geocoding involved)
    Markers {
        /// Path to the listings CSV
        #[arg(value_name = "INPUT")]
        input: String,

        /// JSON file to write the map view to
        #[arg(short, long, default_value = "markers.json")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rental_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rental_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output_dir,
            language,
            delay_ms,
        } => {
            let bytes = std::fs::read(&input)?;
            let mut session = new_session(language, delay_ms)?;

            let listings = session.enriched(&bytes).await?;
            let report = analyze(&listings);

            std::fs::create_dir_all(&output_dir)?;
            write_json(&format!("{output_dir}/report.json"), &report)?;
            write_json(&format!("{output_dir}/markers.json"), &map_view(&listings))?;
            append_records(
                &format!("{output_dir}/district_means.csv"),
                &report.district_means,
            )?;
            append_records(
                &format!("{output_dir}/room_groups.csv"),
                &report.room_groups,
            )?;

            info!(
                output_dir,
                total = report.total_listings,
                resolved = report.resolved_listings,
                districts = report.district_means.len(),
                room_groups = report.room_groups.len(),
                "Analysis complete"
            );
        }
        Commands::Resolve {
            input,
            output,
            language,
            delay_ms,
        } => {
            let bytes = std::fs::read(&input)?;
            let mut session = new_session(language, delay_ms)?;

            let listings = session.enriched(&bytes).await?;
            write_listings(&output, &listings)?;

            info!(output, rows = listings.len(), "Enriched dataset written");
        }
        Commands::Markers { input, output } => {
            let bytes = std::fs::read(&input)?;
            let listings = load_listings_from_slice(&bytes)?;

            write_json(&output, &map_view(&listings))?;

            info!(output, markers = listings.len(), "Map markers written");
        }
    }

    Ok(())
}

/// Builds a session against the configured Nominatim endpoint.
fn new_session(language: String, delay_ms: u64) -> Result<AnalysisSession<NominatimClient>> {
    let base_url =
        std::env::var("NOMINATIM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let geocoder = NominatimClient::new(base_url)?;

    Ok(AnalysisSession::new(
        geocoder,
        ResolveOptions {
            language,
            request_delay: Duration::from_millis(delay_ms),
        },
    ))
}
