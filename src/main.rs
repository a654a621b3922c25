//! CLI entry point for the call metrics dashboard.
//!
//! Loads the call sheet, applies day and caller filters, and prints the key
//! metrics once or in an interactive loop.

use anyhow::{Context, Result};
use call_metrics::config::AppConfig;
use call_metrics::fetch::{BasicClient, Source};
use call_metrics::metrics::{CallerFilter, FilterSelection};
use call_metrics::output::{OutputFormat, format_metrics, format_options};
use call_metrics::session::Session;
use call_metrics::shell::{HELP, ShellCommand, ShellState};
use call_metrics::table::TableCache;
use chrono::Weekday;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "call_metrics")]
#[command(about = "Key performance metrics from the daily call tracking sheet", long_about = None)]
struct Cli {
    /// URL or path of the call sheet CSV (overrides CALL_SHEET_URL)
    #[arg(short, long, global = true, value_name = "URL_OR_PATH")]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print key metrics for a day and caller selection
    Metrics {
        /// Day of week to include; repeat for several (default: every observed day)
        #[arg(short, long = "day", value_name = "DAY")]
        days: Vec<Weekday>,

        /// Caller to restrict to, or "All"
        #[arg(short, long, default_value = CallerFilter::ALL_LABEL)]
        caller: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List the days and callers present in the sheet
    Options {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Read filter commands from stdin and print metrics on demand
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = AppConfig::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("call_metrics.log"));

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

    let source = Source::parse(cli.source.as_deref().unwrap_or(&config.source));
    let client = BasicClient::with_timeout(config.http_timeout)
        .context("failed to build HTTP client")?;
    let cache = match config.cache_max_age {
        Some(max_age) => TableCache::with_max_age(max_age),
        None => TableCache::new(),
    };
    let session = Session::new(source, client, cache);

    match cli.command {
        Commands::Metrics {
            days,
            caller,
            format,
        } => {
            let table = session
                .table()
                .await
                .with_context(|| format!("could not load call sheet from {}", session.source()))?;
            let caller = CallerFilter::parse(&caller);
            let selection = if days.is_empty() {
                FilterSelection {
                    caller,
                    ..FilterSelection::all(&table)
                }
            } else {
                FilterSelection::new(days, caller)
            };

            let bundle = call_metrics::metrics::aggregate(&table, &selection);
            println!("{}", format_metrics(&bundle, format)?);
        }
        Commands::Options { format } => {
            let options = session
                .options()
                .await
                .with_context(|| format!("could not load call sheet from {}", session.source()))?;
            println!("{}", format_options(&options, format)?);
        }
        Commands::Shell => run_shell(&session).await?,
    }

    Ok(())
}

/// Interactive loop: each `show` re-applies the current selection to the cached table.
///
/// Load failures are reported and the loop keeps running.
#[tracing::instrument(skip_all, fields(source = %session.source()))]
async fn run_shell(session: &Session) -> Result<()> {
    let mut state = ShellState::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    info!("Shell started");

    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!(input = %line, "Unrecognised shell input");
                println!("{e}");
                continue;
            }
        };

        match command {
            ShellCommand::Days(days) => state.days = days,
            ShellCommand::Caller(caller) => state.caller = caller,
            ShellCommand::Show => match session.table().await {
                Ok(table) => {
                    let bundle = call_metrics::metrics::aggregate(&table, &state.selection(&table));
                    println!("{}", format_metrics(&bundle, OutputFormat::Text)?);
                }
                Err(e) => report_load_error(&e),
            },
            ShellCommand::Options => match session.options().await {
                Ok(options) => println!("{}", format_options(&options, OutputFormat::Text)?),
                Err(e) => report_load_error(&e),
            },
            ShellCommand::Refresh => match session.refresh().await {
                Ok(table) => println!("Reloaded {} rows.", table.len()),
                Err(e) => report_load_error(&e),
            },
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => break,
        }
    }

    info!("Shell finished");
    Ok(())
}

fn report_load_error(e: &call_metrics::PipelineError) {
    error!(error = %e, "Call sheet load failed");
    println!("error: {e}");
}
