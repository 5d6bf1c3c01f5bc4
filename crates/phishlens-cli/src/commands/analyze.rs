use std::sync::Arc;

use anyhow::anyhow;
use phishlens_api_models::FeatureCatalog;

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::dispatch::bulk::DirectorySink;
use crate::output::{print_notice, print_report, render_report};
use crate::session::Session;
use crate::state::SubmissionState;

pub(crate) async fn handle_analyze(
    ctx: &AppContext,
    args: AnalyzeArgs,
    format: OutputFormat,
) -> CliResult<()> {
    // the single flow never downloads; the sink is only there to complete the session
    let (mut session, mut events) = Session::new(ctx.service(), Arc::new(DirectorySink::new(".")));
    session.set_url(args.url);
    session.submit_single()?;

    let update = session
        .settle(&mut events)
        .await
        .ok_or_else(|| CliError::failure(anyhow!("analysis ended without an outcome")))?;
    print_notice(&update.notice, format)?;

    match session.single_state() {
        SubmissionState::Success(result) => {
            print_report(&render_report(result, FeatureCatalog::standard()), format)
        }
        SubmissionState::Error(message) => Err(CliError::failure(anyhow!(message.clone()))),
        state => Err(CliError::failure(anyhow!(
            "analysis settled in unexpected state '{state}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use phishlens_test_support::fixtures::{PHISH_URL, phishing_payload};
    use reqwest::Client;

    fn context_with(server: &MockServer) -> AppContext {
        AppContext {
            client: Client::new(),
            base_url: server.base_url().parse().expect("valid URL"),
        }
    }

    #[tokio::test]
    async fn handle_analyze_renders_verdict() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/analyze");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(phishing_payload());
        });

        let args = AnalyzeArgs {
            url: PHISH_URL.to_string(),
        };
        handle_analyze(&context_with(&server), args, OutputFormat::Json)
            .await
            .expect("analysis should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn handle_analyze_maps_server_error_to_failure() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/analyze");
            then.status(500);
        });

        let args = AnalyzeArgs {
            url: PHISH_URL.to_string(),
        };
        let err = handle_analyze(&context_with(&server), args, OutputFormat::Table)
            .await
            .expect_err("500 should fail");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.display_message(),
            "Failed to analyze URL. Please try again."
        );
    }

    #[tokio::test]
    async fn handle_analyze_rejects_empty_url_without_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/analyze");
            then.status(200);
        });

        let args = AnalyzeArgs {
            url: String::new(),
        };
        let err = handle_analyze(&context_with(&server), args, OutputFormat::Table)
            .await
            .expect_err("empty URL should be rejected");
        assert!(matches!(err, CliError::Validation(_)));
        mock.assert_calls(0);
    }
}
