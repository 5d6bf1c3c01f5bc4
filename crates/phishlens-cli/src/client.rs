//! Shared HTTP client, CLI error type, and outcome telemetry.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::anyhow;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::Serialize;

use crate::cli::Cli;
use crate::dispatch::{AnalysisService, HttpAnalysisService};
use crate::state::SubmitRejected;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
pub(crate) const TELEMETRY_ENDPOINT_ENV: &str = "PHISHLENS_TELEMETRY_ENDPOINT";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<SubmitRejected> for CliError {
    fn from(rejected: SubmitRejected) -> Self {
        Self::validation(rejected.to_string())
    }
}

/// Dependencies constructed from environment flags and CLI options.
#[derive(Clone)]
pub(crate) struct CliDependencies {
    pub(crate) client: Client,
    pub(crate) telemetry: Option<TelemetryEmitter>,
}

impl CliDependencies {
    /// Construct a configured HTTP client and optional telemetry emitter.
    pub(crate) fn from_env(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        Ok(Self {
            client: build_client(cli.timeout, trace_id)?,
            telemetry: TelemetryEmitter::from_env(),
        })
    }
}

/// HTTP client tagging every request with `trace_id`. No timeout unless one is configured.
pub(crate) fn build_client(timeout_secs: Option<u64>, trace_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    let mut builder = Client::builder().default_headers(default_headers);
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
}

impl AppContext {
    /// Analysis service bound to the configured endpoint.
    pub(crate) fn service(&self) -> Arc<dyn AnalysisService> {
        Arc::new(HttpAnalysisService::new(
            self.client.clone(),
            self.base_url.clone(),
        ))
    }
}

/// Telemetry emitter used to forward CLI outcomes.
#[derive(Clone)]
pub(crate) struct TelemetryEmitter {
    pub(crate) client: Client,
    pub(crate) endpoint: Url,
}

impl TelemetryEmitter {
    #[must_use]
    pub(crate) fn from_env() -> Option<Self> {
        let endpoint = std::env::var(TELEMETRY_ENDPOINT_ENV).ok()?;
        let endpoint = endpoint.parse().ok()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .ok()?;
        Some(Self { client, endpoint })
    }

    pub(crate) async fn emit(
        &self,
        trace_id: &str,
        command: &str,
        outcome: &str,
        exit_code: i32,
        message: Option<&str>,
    ) {
        let event = TelemetryEvent {
            command,
            outcome,
            trace_id,
            exit_code,
            message,
            timestamp_ms: timestamp_now_ms(),
        };

        if let Err(err) = self
            .client
            .post(self.endpoint.clone())
            .json(&event)
            .send()
            .await
        {
            tracing::debug!(error = %err, "telemetry emit failed");
        }
    }
}

#[derive(Serialize)]
struct TelemetryEvent<'a> {
    command: &'a str,
    outcome: &'a str,
    trace_id: &'a str,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    timestamp_ms: u64,
}

/// Parse the service base URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    let url = input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))?;
    if url.cannot_be_a_base() {
        return Err(format!("invalid URL '{input}': cannot carry endpoint paths"));
    }
    Ok(url)
}

/// Millisecond timestamp helper for telemetry.
#[must_use]
pub(crate) fn timestamp_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::prelude::*;

    #[test]
    fn parse_url_accepts_http_bases() {
        let url = parse_url("http://127.0.0.1:8000").expect("valid base");
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn parse_url_rejects_garbage_and_opaque_urls() {
        assert!(parse_url("not a url").is_err());
        let err = parse_url("mailto:ops@example.test").expect_err("opaque URL");
        assert!(err.contains("cannot carry endpoint paths"));
    }

    #[test]
    fn rejected_submissions_are_validation_errors() {
        let err = CliError::from(SubmitRejected::EmptyInput);
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "enter a URL to analyze");
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
    }

    #[tokio::test]
    async fn client_sends_request_id_header() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ping").header(HEADER_REQUEST_ID, "trace-123");
            then.status(200);
        });

        let client = build_client(Some(5), "trace-123").map_err(|err| anyhow!(err.display_message()))?;
        client.get(server.url("/ping")).send().await?;
        mock.assert();
        Ok(())
    }

    #[test]
    fn build_client_rejects_invalid_trace_ids() {
        let err = build_client(None, "bad\ntrace").expect_err("newline is not a header value");
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn telemetry_emitter_emits_event() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/telemetry");
            then.status(200);
        });

        let emitter = TelemetryEmitter {
            client: Client::new(),
            endpoint: format!("{}/telemetry", server.base_url())
                .parse()
                .map_err(|_| anyhow!("invalid URL"))?,
        };

        emitter
            .emit("trace", "analyze", "success", 0, None)
            .await;

        mock.assert();
        Ok(())
    }
}
