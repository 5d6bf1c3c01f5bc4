use std::sync::Arc;

use anyhow::anyhow;

use crate::cli::{BulkArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::dispatch::bulk::DirectorySink;
use crate::output::{print_notice, print_saved};
use crate::session::Session;
use crate::state::SubmissionState;

pub(crate) async fn handle_bulk(
    ctx: &AppContext,
    args: BulkArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let sink = Arc::new(DirectorySink::new(args.output_dir));
    let (mut session, mut events) = Session::new(ctx.service(), sink);
    session.select_file(args.file.clone()).map_err(|rejected| {
        CliError::validation(format!("{rejected}: '{}' is not a file", args.file.display()))
    })?;
    session.submit_bulk()?;

    let update = session
        .settle(&mut events)
        .await
        .ok_or_else(|| CliError::failure(anyhow!("bulk analysis ended without an outcome")))?;
    print_notice(&update.notice, format)?;
    if let Some(path) = &update.saved_to {
        print_saved(path);
    }

    match session.bulk_state() {
        SubmissionState::Success(()) => Ok(()),
        SubmissionState::Error(message) => Err(CliError::failure(anyhow!(message.clone()))),
        state => Err(CliError::failure(anyhow!(
            "bulk analysis settled in unexpected state '{state}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use phishlens_api_models::BULK_RESULT_FILE_NAME;
    use phishlens_test_support::fixtures::{SAMPLE_RESULT_CSV, write_upload_csv};
    use reqwest::Client;

    fn context_with(server: &MockServer) -> AppContext {
        AppContext {
            client: Client::new(),
            base_url: server.base_url().parse().expect("valid URL"),
        }
    }

    #[tokio::test]
    async fn handle_bulk_saves_result_file() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/bulk-analyze");
            then.status(200)
                .header("content-type", "text/csv")
                .body(SAMPLE_RESULT_CSV);
        });
        let dir = tempfile::tempdir().expect("temp dir");
        let upload = write_upload_csv(dir.path()).expect("fixture");
        let output_dir = dir.path().join("results");

        let args = BulkArgs {
            file: upload,
            output_dir: output_dir.clone(),
        };
        handle_bulk(&context_with(&server), args, OutputFormat::Table)
            .await
            .expect("bulk analysis should succeed");

        mock.assert();
        let saved = std::fs::read_to_string(output_dir.join(BULK_RESULT_FILE_NAME))
            .expect("result saved");
        assert_eq!(saved, SAMPLE_RESULT_CSV);
    }

    #[tokio::test]
    async fn handle_bulk_reports_unavailable_service_without_download() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/bulk-analyze");
            then.status(503);
        });
        let dir = tempfile::tempdir().expect("temp dir");
        let upload = write_upload_csv(dir.path()).expect("fixture");
        let output_dir = dir.path().join("results");

        let args = BulkArgs {
            file: upload,
            output_dir: output_dir.clone(),
        };
        let err = handle_bulk(&context_with(&server), args, OutputFormat::Table)
            .await
            .expect_err("503 should fail");

        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.display_message(),
            "Failed to analyze CSV file. Please try again."
        );
        assert!(!output_dir.join(BULK_RESULT_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn handle_bulk_rejects_missing_file() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/bulk-analyze");
            then.status(200);
        });
        let dir = tempfile::tempdir().expect("temp dir");

        let args = BulkArgs {
            file: dir.path().join("absent.csv"),
            output_dir: dir.path().to_path_buf(),
        };
        let err = handle_bulk(&context_with(&server), args, OutputFormat::Table)
            .await
            .expect_err("missing file should fail");

        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("absent.csv"));
        mock.assert_calls(0);
    }
}
