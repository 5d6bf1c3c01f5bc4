//! Interactive session driving both flows from line commands.
//!
//! Input lines and flow outcomes are multiplexed on one loop, so the prompt keeps
//! accepting commands while requests are outstanding.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use phishlens_api_models::{BULK_URL_COLUMN, FeatureCatalog};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{DashboardArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::dispatch::bulk::DirectorySink;
use crate::output::{print_catalog, print_notice, print_report, print_saved, print_status, render_report};
use crate::session::{Session, Update};
use crate::state::{Flow, SubmissionState};

fn help_text() -> String {
    format!(
        "\
commands:
  url <text>     set the URL to analyze (no text clears it)
  analyze        submit the current URL
  file <path>    select a CSV file for bulk analysis
  bulk           submit the selected CSV file
  clear          reset the single-URL analysis and its input
  status         show both flows
  catalog        list the feature catalog
  help           show this text
  quit           leave the dashboard

bulk CSV files need a column named '{BULK_URL_COLUMN}' with one URL per row."
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DashboardCommand {
    SetUrl(String),
    Analyze,
    SelectFile(PathBuf),
    Bulk,
    Clear,
    Status,
    Catalog,
    Help,
    Quit,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Continue,
    Quit,
}

/// Parse one input line. Argument text is kept verbatim apart from surrounding whitespace.
pub(crate) fn parse_command(line: &str) -> Result<DashboardCommand, String> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => DashboardCommand::Nothing,
        "url" => DashboardCommand::SetUrl(rest.to_string()),
        "analyze" => DashboardCommand::Analyze,
        "file" if rest.is_empty() => return Err("usage: file <path>".to_string()),
        "file" => DashboardCommand::SelectFile(PathBuf::from(rest)),
        "bulk" => DashboardCommand::Bulk,
        "clear" => DashboardCommand::Clear,
        "status" => DashboardCommand::Status,
        "catalog" => DashboardCommand::Catalog,
        "help" | "?" => DashboardCommand::Help,
        "quit" | "exit" => DashboardCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(command)
}

pub(crate) async fn handle_dashboard(
    ctx: &AppContext,
    args: DashboardArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let sink = Arc::new(DirectorySink::new(args.output_dir));
    let (mut session, mut events) = Session::new(ctx.service(), sink);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", help_text());
    prompt();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = line
                    .map_err(|err| CliError::failure(anyhow!("failed to read input: {err}")))?;
                let Some(line) = line else {
                    break;
                };
                match parse_command(&line) {
                    Ok(command) => {
                        if run_command(&mut session, command, format)? == Control::Quit {
                            break;
                        }
                    }
                    Err(message) => eprintln!("{message}"),
                }
                prompt();
            }
            Some(event) = events.recv() => {
                if let Some(update) = session.apply(event).await {
                    show_update(&session, &update, format)?;
                    prompt();
                }
            }
        }
    }
    Ok(())
}

/// Apply one command to the session. Rejected submissions are reported, not returned.
pub(crate) fn run_command(
    session: &mut Session,
    command: DashboardCommand,
    format: OutputFormat,
) -> CliResult<Control> {
    match command {
        DashboardCommand::SetUrl(url) => session.set_url(url),
        DashboardCommand::Analyze => match session.submit_single() {
            Ok(_) => println!("analyzing {}", session.url_input()),
            Err(rejected) => eprintln!("{rejected}"),
        },
        DashboardCommand::SelectFile(path) => {
            if let Err(rejected) = session.select_file(path.clone()) {
                eprintln!("{rejected}: '{}' is not a file", path.display());
            }
        }
        DashboardCommand::Bulk => match session.submit_bulk() {
            Ok(ticket) => println!("uploading for {} analysis", ticket.flow().label()),
            Err(rejected) => eprintln!("{rejected}"),
        },
        DashboardCommand::Clear => session.reset_single(),
        DashboardCommand::Status => print_status(session, format)?,
        DashboardCommand::Catalog => print_catalog(FeatureCatalog::standard(), format)?,
        DashboardCommand::Help => println!("{}", help_text()),
        DashboardCommand::Quit => return Ok(Control::Quit),
        DashboardCommand::Nothing => {}
    }
    Ok(Control::Continue)
}

fn show_update(session: &Session, update: &Update, format: OutputFormat) -> CliResult<()> {
    print_notice(&update.notice, format)?;
    if let Some(path) = &update.saved_to {
        print_saved(path);
    }
    if update.flow == Flow::Single
        && let SubmissionState::Success(result) = session.single_state()
    {
        print_report(&render_report(result, FeatureCatalog::standard()), format)?;
    }
    Ok(())
}

fn prompt() {
    print!("phishlens> ");
    // a failed flush only delays the prompt
    let _ = std::io::stdout().flush();
}
