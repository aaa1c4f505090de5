use clap::{Parser, ValueEnum};
use console::{Term, set_colors_enabled, style};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fpmon::output::{ConsoleSink, RecordFormat};
use fpmon::{FpingOptions, FpmonError, fmt, monitor};

#[path = "fpmon/config_store.rs"]
mod config_store;

use config_store::{ConfigStore, Defaults};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "fpmon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "fping monitor - continuous loss and latency records per host")]
struct Args {
    /// Hosts to monitor (hostnames or addresses)
    #[arg(value_name = "HOST")]
    hosts: Vec<String>,

    /// Path to the fping executable (default: search PATH)
    #[arg(long)]
    fping: Option<PathBuf>,

    /// Interval between probes to one host, in milliseconds
    #[arg(short = 'p', long)]
    period: Option<u64>,

    /// Interval between summary records, in seconds
    #[arg(short = 'Q', long)]
    summary: Option<u64>,

    /// Retry backoff factor
    #[arg(short = 'B', long)]
    backoff: Option<f64>,

    /// Retries per probe
    #[arg(short = 'r', long)]
    retries: Option<u32>,

    /// Type of service byte set on probes
    #[arg(short = 'O', long)]
    tos: Option<u8>,

    /// Output format: text or json
    #[arg(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// Alias for JSON output
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty-print the JSON stats summary
    #[arg(long)]
    pretty: bool,

    /// Do not print per-host stats when the session ends
    #[arg(long)]
    no_stats: bool,

    /// Disable colored output
    #[arg(long = "no-color", alias = "nocolor")]
    no_color: bool,

    /// Debug logging on stderr (overrides RUST_LOG)
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let err_term = Term::stderr();

    let store = match ConfigStore::load() {
        Ok(store) => store,
        Err(e) => {
            err_term
                .write_line(&style(format!("Error: {}", e)).red().bold().to_string())
                .ok();
            process::exit(1);
        }
    };
    tracing::debug!("config: {}", store.path().display());

    let format = match resolve_format(&args, store.defaults()) {
        Ok(format) => format,
        Err(e) => process::exit(handle_error(&err_term, e)),
    };
    let opts = fping_options(&args, store.defaults());

    let want_color = matches!(format, OutputFormat::Text)
        && io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none()
        && !args.no_color;
    set_colors_enabled(want_color);

    let record_format = match format {
        OutputFormat::Text => RecordFormat::Text,
        OutputFormat::Json => RecordFormat::Json,
    };
    let mut sink = ConsoleSink::new(Term::stdout(), record_format);

    let exit_code = match monitor(&args.hosts, &opts, &mut sink, shutdown_signal()).await {
        Ok(summary) => {
            tracing::debug!(?summary, "monitoring finished");
            0
        }
        Err(e) => handle_error(&err_term, e),
    };

    let (_, stats) = sink.into_inner();
    if !args.no_stats && !stats.is_empty() {
        let list = stats.summaries();
        match format {
            OutputFormat::Json => match fmt::json::stats_list_to_json(&list, args.pretty) {
                Ok(s) => eprintln!("{}", s),
                Err(e) => eprintln!("error serializing: {}", e),
            },
            OutputFormat::Text => {
                for (name, st) in &list {
                    err_term.write_line(&fmt::text::render_stats(name, st)).ok();
                }
            }
        }
    }

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("fpmon=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn resolve_format(args: &Args, defaults: &Defaults) -> Result<OutputFormat, FpmonError> {
    if args.json {
        return Ok(OutputFormat::Json);
    }
    if let Some(format) = args.format {
        return Ok(format);
    }
    match defaults.format.as_deref() {
        None | Some("text") => Ok(OutputFormat::Text),
        Some("json") => Ok(OutputFormat::Json),
        Some(other) => Err(FpmonError::Config(format!("unknown format '{other}'"))),
    }
}

/// CLI flag, then config file, then built-in default.
fn fping_options(args: &Args, defaults: &Defaults) -> FpingOptions {
    let base = FpingOptions::default();
    FpingOptions {
        binary: args.fping.clone().or_else(|| defaults.fping.clone()),
        backoff: args.backoff.or(defaults.backoff).unwrap_or(base.backoff),
        retries: args.retries.or(defaults.retries).unwrap_or(base.retries),
        tos: args.tos.or(defaults.tos).unwrap_or(base.tos),
        period: args
            .period
            .or(defaults.period_ms)
            .map(Duration::from_millis)
            .unwrap_or(base.period),
        summary_interval: args
            .summary
            .or(defaults.summary_secs)
            .map(Duration::from_secs)
            .unwrap_or(base.summary_interval),
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        _ = terminate => tracing::info!("Received terminate signal"),
    }
}

fn handle_error(term: &Term, err: FpmonError) -> i32 {
    term.write_line(&style(format!("Error: {}", err)).red().bold().to_string())
        .ok();
    match err {
        FpmonError::FpingNotFound(_) => 2,
        FpmonError::NoHosts => 3,
        _ => 1,
    }
}
