//! CLI definition and dispatch.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::anthropic_adapter::AnthropicAdapter;
use crate::adapters::backend_adapter::BackendAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::env_config_adapter::EnvConfigAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::http_client::client_from_config;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::adapters::polygon_adapter::PolygonAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::demo::{DemoModeAdapter, SAMPLE_TICKERS};
use crate::domain::error::StockbriefError;
use crate::domain::orchestrator::ReportOrchestrator;
use crate::domain::price::DateRange;
use crate::domain::report::GenerationMode;
use crate::domain::ticker::{parse_symbols, TickerSet};
use crate::logging::{init_logging, LoggingConfig};
use crate::ports::analysis_port::AnalysisPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stockbrief", about = "AI-generated briefings for up to three stocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a report for up to three tickers
    Report {
        /// Ticker symbols; commas and spaces both separate
        tickers: Vec<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Use cached sample analyses only, no network calls
        #[arg(long)]
        demo: bool,
        /// Write to a file; `.html` and `.json` pick the format
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Read prices from `{DIR}/{TICKER}.csv` instead of the network
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Show cached demo analyses, for all samples or the given tickers
    Samples {
        tickers: Vec<String>,
    },
    /// Start the proxy server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let _ = dotenvy::dotenv();
    match cli.command {
        Command::Report {
            tickers,
            config,
            demo,
            output,
            json,
            data_dir,
            start,
            end,
        } => {
            let options = ReportOptions {
                mode: if demo {
                    GenerationMode::Demo
                } else {
                    GenerationMode::Live
                },
                output,
                json,
                data_dir,
                start,
                end,
            };
            run_report(&tickers, config.as_ref(), &options)
        }
        Command::Samples { tickers } => run_samples(&tickers),
        Command::Serve { config } => run_serve(config.as_ref()),
    }
}

fn fail(err: StockbriefError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// File configuration (empty when no path is given) under the environment overlay.
pub fn load_config(path: Option<&PathBuf>) -> Result<EnvConfigAdapter, StockbriefError> {
    let file = match path {
        Some(path) => FileConfigAdapter::from_file(path).map_err(|e| StockbriefError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?,
        None => FileConfigAdapter::empty(),
    };
    Ok(EnvConfigAdapter::from_env(file))
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate, StockbriefError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| StockbriefError::ConfigInvalid {
        section: "report".into(),
        key: key.into(),
        reason: format!("'{value}' is not a YYYY-MM-DD date: {e}"),
    })
}

/// Trailing window ending yesterday, with either bound overridable.
pub fn build_date_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<DateRange, StockbriefError> {
    let default = DateRange::trailing(today);
    let start = start.map(|s| parse_date("start", s)).transpose()?.unwrap_or(default.start);
    let end = end.map(|s| parse_date("end", s)).transpose()?.unwrap_or(default.end);
    DateRange::new(start, end).ok_or_else(|| StockbriefError::ConfigInvalid {
        section: "report".into(),
        key: "start".into(),
        reason: format!("start {start} is after end {end}"),
    })
}

/// Selection from command-line arguments plus the symbols that did not fit.
pub fn build_ticker_set(args: &[String]) -> (TickerSet, Vec<String>) {
    let mut set = TickerSet::new();
    let mut ignored = Vec::new();
    for symbol in args.iter().flat_map(|arg| parse_symbols(arg)) {
        if !set.add(&symbol) && !set.contains(&symbol.to_uppercase()) {
            ignored.push(symbol);
        }
    }
    (set, ignored)
}

/// Price and analysis ports chosen from configuration.
///
/// `[backend] base_url` routes both through a proxy server; otherwise Polygon
/// and Anthropic are called directly. `data_dir` always wins for prices.
pub fn build_ports(
    config: &dyn ConfigPort,
    data_dir: Option<&Path>,
) -> Result<(Arc<dyn PricePort>, Arc<dyn AnalysisPort>), StockbriefError> {
    let client = client_from_config(config)?;

    let backend = match config.get_non_empty("backend", "base_url") {
        Some(_) => Some(Arc::new(BackendAdapter::from_config(config, client.clone())?)),
        None => None,
    };

    let analysis: Arc<dyn AnalysisPort> = match &backend {
        Some(backend) => backend.clone() as Arc<dyn AnalysisPort>,
        None => Arc::new(AnthropicAdapter::from_config(config, client.clone())?),
    };

    let prices: Arc<dyn PricePort> = match (data_dir, &backend) {
        (Some(dir), _) => Arc::new(CsvAdapter::new(dir.to_path_buf())),
        (None, Some(backend)) => backend.clone() as Arc<dyn PricePort>,
        (None, None) => Arc::new(PolygonAdapter::from_config(config, client)?),
    };

    Ok((prices, analysis))
}

pub struct ReportOptions {
    pub mode: GenerationMode,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub data_dir: Option<PathBuf>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Writer for `path` by extension; text unless `.html`/`.htm` or `.json`.
pub fn writer_for(path: &Path) -> Box<dyn ReportPort> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html") | Some("htm") => Box::new(HtmlReportAdapter::new()),
        Some("json") => Box::new(JsonReportAdapter::new()),
        _ => Box::new(TextReportAdapter::new()),
    }
}

fn run_report(tickers: &[String], config_path: Option<&PathBuf>, options: &ReportOptions) -> ExitCode {
    match generate_report(tickers, config_path, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn generate_report(
    tickers: &[String],
    config_path: Option<&PathBuf>,
    options: &ReportOptions,
) -> Result<(), StockbriefError> {
    if let Some(path) = config_path {
        eprintln!("Loading config from {}", path.display());
    }
    let config = load_config(config_path)?;
    init_logging(&LoggingConfig::from_config(&config)?);

    let range = build_date_range(
        options.start.as_deref(),
        options.end.as_deref(),
        Utc::now().date_naive(),
    )?;

    let (mut selection, ignored) = build_ticker_set(tickers);
    for symbol in &ignored {
        eprintln!(
            "warning: ignoring {symbol}: at most {} distinct tickers per report",
            TickerSet::CAPACITY
        );
    }

    let orchestrator = match options.mode {
        GenerationMode::Demo => ReportOrchestrator::offline(),
        GenerationMode::Live => {
            if selection.is_empty() {
                if let Some(dir) = &options.data_dir {
                    if let Ok(available) = CsvAdapter::new(dir.clone()).list_symbols() {
                        eprintln!("Available in {}: {}", dir.display(), available.join(", "));
                    }
                }
                return Err(StockbriefError::EmptySelection);
            }
            let (prices, analysis) = build_ports(&config, options.data_dir.as_deref())?;
            ReportOrchestrator::new(prices, analysis)
        }
    };

    if options.mode == GenerationMode::Demo && selection.is_empty() {
        eprintln!("Demo mode: using sample tickers {}", SAMPLE_TICKERS.join(", "));
    }
    eprintln!("Generating report for {range}...");

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(orchestrator.generate(&mut selection, range, options.mode))?;

    if report.fallback_count() > 0 {
        eprintln!(
            "warning: {} of {} tickers used cached data",
            report.fallback_count(),
            report.entries.len()
        );
    }

    match &options.output {
        Some(path) => {
            writer_for(path).write(&report, &path.to_string_lossy())?;
            eprintln!("Report written to {}", path.display());
        }
        None => {
            let content = if options.json {
                JsonReportAdapter::new().render(&report)?
            } else {
                TextReportAdapter::new().render(&report)?
            };
            print!("{content}");
        }
    }
    Ok(())
}

/// Sample tickers named in `args`, plus the symbols that have no sample.
///
/// Nothing selected means every sample ticker.
pub fn build_sample_set(args: &[String]) -> (TickerSet, Vec<String>) {
    let mut set = TickerSet::new();
    let mut unknown = Vec::new();
    for symbol in args.iter().flat_map(|arg| parse_symbols(arg)) {
        if !DemoModeAdapter::load_sample(&mut set, &symbol) && !set.contains(&symbol.to_uppercase()) {
            unknown.push(symbol);
        }
    }
    if DemoModeAdapter::demo_available(&set) {
        DemoModeAdapter::populate_if_empty(&mut set);
    }
    (set, unknown)
}

fn run_samples(tickers: &[String]) -> ExitCode {
    let (set, unknown) = build_sample_set(tickers);
    for symbol in &unknown {
        eprintln!(
            "warning: no sample analysis for {symbol}; samples exist for {}",
            SAMPLE_TICKERS.join(", ")
        );
    }
    for ticker in &set {
        let analysis = DemoModeAdapter::analysis_for(ticker);
        println!("{ticker}\t{}", analysis.summary);
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: Option<&PathBuf>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        match serve(config_path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(e),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3001";

/// `[server] listen` as a socket address.
pub fn listen_addr(config: &dyn ConfigPort) -> Result<std::net::SocketAddr, StockbriefError> {
    let raw = config
        .get_non_empty("server", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    raw.parse().map_err(|e| StockbriefError::ConfigInvalid {
        section: "server".into(),
        key: "listen".into(),
        reason: format!("'{raw}': {e}"),
    })
}

/// `[server] allowed_origins`, comma separated.
pub fn allowed_origins(config: &dyn ConfigPort) -> Vec<String> {
    config
        .get_non_empty("server", "allowed_origins")
        .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

#[cfg(feature = "web")]
fn serve(config_path: Option<&PathBuf>) -> Result<(), StockbriefError> {
    use crate::adapters::web::{build_router, AppState};

    if let Some(path) = config_path {
        eprintln!("Loading config from {}", path.display());
    }
    let config = load_config(config_path)?;
    init_logging(&LoggingConfig::from_config(&config)?);

    let (prices, analysis) = build_ports(&config, None)?;
    let addr = listen_addr(&config)?;
    let origins = allowed_origins(&config);
    let router = build_router(AppState::new(prices, analysis), &origins);

    eprintln!("Starting proxy server on {addr}");
    tracing::info!(%addr, origins = ?origins, "server starting");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await
    })?;
    Ok(())
}
