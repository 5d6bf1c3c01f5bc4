//! Argument parsing, logging setup, and command dispatch for `phishlens`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use phishlens_api_models::BULK_URL_COLUMN;
use phishlens_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, command_span, init_logging, record_outcome,
};
use reqwest::Url;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliDependencies, CliResult, parse_url};
use crate::commands::analyze::handle_analyze;
use crate::commands::bulk::handle_bulk;
use crate::commands::catalog::handle_catalog;
use crate::commands::dashboard::handle_dashboard;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

fn bulk_file_help() -> String {
    format!(
        "CSV file to analyze. It must contain a column named '{BULK_URL_COLUMN}' \
         with one URL per row; the service rejects anything else."
    )
}

/// Parses CLI arguments, executes the requested command, and handles
/// user-facing telemetry emission. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
        ..LoggingConfig::default()
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let deps = match CliDependencies::from_env(&cli, &trace_id) {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };
    let telemetry = deps.telemetry.clone();

    let span = command_span(command_name, &trace_id);
    let result = dispatch(cli, &deps).instrument(span.clone()).await;

    let (exit_code, message, outcome) = match result {
        Ok(()) => (0, None, "success"),
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            eprintln!("error: {message}");
            (exit_code, Some(message), "error")
        }
    };
    record_outcome(&span, outcome);

    if let Some(emitter) = &telemetry {
        emitter
            .emit(
                &trace_id,
                command_name,
                outcome,
                exit_code,
                message.as_deref(),
            )
            .await;
    }

    exit_code
}

async fn dispatch(cli: Cli, deps: &CliDependencies) -> CliResult<()> {
    let ctx = AppContext {
        client: deps.client.clone(),
        base_url: cli.api_url,
    };

    match cli.command {
        Command::Analyze(args) => handle_analyze(&ctx, args, cli.output).await,
        Command::Bulk(args) => handle_bulk(&ctx, args, cli.output).await,
        Command::Catalog => handle_catalog(cli.output),
        Command::Dashboard(args) => handle_dashboard(&ctx, args, cli.output).await,
    }
}

#[derive(Parser)]
#[command(
    name = "phishlens",
    about = "Submit URLs to a PhishLens classification service and inspect the verdicts"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "PHISHLENS_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "PHISHLENS_HTTP_TIMEOUT_SECS",
        help = "Request timeout in seconds; unset leaves requests unbounded"
    )]
    pub(crate) timeout: Option<u64>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for reports, the catalog, and notices"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "PHISHLENS_LOG_LEVEL",
        default_value = DEFAULT_LOG_LEVEL
    )]
    log_level: String,
    #[arg(
        long,
        global = true,
        env = "PHISHLENS_LOG_FORMAT",
        value_parser = parse_log_format
    )]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a single URL and print the verdict with its feature breakdown.
    Analyze(AnalyzeArgs),
    /// Upload a CSV of URLs and save the service's result file.
    Bulk(BulkArgs),
    /// Print the feature catalog the service reports against.
    Catalog,
    /// Interactive session holding both flows at once.
    Dashboard(DashboardArgs),
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// URL to classify.
    pub(crate) url: String,
}

#[derive(Args, Debug)]
pub(crate) struct BulkArgs {
    #[arg(help = bulk_file_help())]
    pub(crate) file: PathBuf,
    #[arg(
        long,
        default_value = ".",
        help = "Directory receiving url_analysis_results.csv"
    )]
    pub(crate) output_dir: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    #[arg(
        long,
        default_value = ".",
        help = "Directory receiving bulk result downloads"
    )]
    pub(crate) output_dir: PathBuf,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input.parse::<LogFormat>().map_err(|err| err.to_string())
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Analyze(_) => "analyze",
        Command::Bulk(_) => "bulk",
        Command::Catalog => "catalog",
        Command::Dashboard(_) => "dashboard",
    }
}
