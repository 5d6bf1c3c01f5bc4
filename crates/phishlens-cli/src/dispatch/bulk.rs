//! Bulk CSV submission against `POST /bulk-analyze` and local delivery of the result.
//!
//! # Design
//! - The upload is forwarded untouched; the server owns CSV validation.
//! - The response body is opaque bytes, saved only if the flow still wants it.
//! - Delivery writes a part file and renames it into place so a crash never
//!   leaves a truncated `url_analysis_results.csv` behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use phishlens_api_models::{BULK_ANALYZE_PATH, BulkAnalysisRequest, FILE_FIELD};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use thiserror::Error;
use tokio::fs;

use crate::dispatch::{DispatchError, endpoint_url};

/// Post the CSV as multipart form data and return the response body.
pub(crate) async fn upload_csv(
    client: &Client,
    base_url: &Url,
    request: BulkAnalysisRequest,
) -> Result<Vec<u8>, DispatchError> {
    let url = endpoint_url(base_url, BULK_ANALYZE_PATH)?;
    let part = Part::bytes(request.contents).file_name(request.file_name);
    let form = Form::new().part(FILE_FIELD, part);

    let response = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|source| DispatchError::Transport {
            endpoint: BULK_ANALYZE_PATH,
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DispatchError::Protocol {
            endpoint: BULK_ANALYZE_PATH,
            status,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| DispatchError::Transport {
            endpoint: BULK_ANALYZE_PATH,
            source,
        })?;
    Ok(body.to_vec())
}

/// Read a user-selected file into a [`BulkAnalysisRequest`].
pub(crate) async fn read_upload(path: &Path) -> Result<BulkAnalysisRequest, DispatchError> {
    let contents = fs::read(path)
        .await
        .map_err(|source| DispatchError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.csv")
        .to_string();
    Ok(BulkAnalysisRequest {
        file_name,
        contents,
    })
}

#[derive(Debug, Error)]
pub(crate) enum DownloadError {
    #[error("failed to prepare download directory '{}'", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write download '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to move download into '{}'", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for downloaded artifacts.
#[async_trait]
pub(crate) trait DownloadSink: Send + Sync {
    /// Store `bytes` under `file_name`, returning where they landed.
    async fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError>;
}

/// Saves downloads into a directory, replacing any earlier file of the same name.
#[derive(Clone, Debug)]
pub(crate) struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| DownloadError::Directory {
                path: self.dir.clone(),
                source,
            })?;

        let target = self.dir.join(file_name);
        let part = self.dir.join(format!(".{file_name}.part"));
        fs::write(&part, bytes)
            .await
            .map_err(|source| DownloadError::Write {
                path: part.clone(),
                source,
            })?;
        if let Err(source) = fs::rename(&part, &target).await {
            let _ = fs::remove_file(&part).await;
            return Err(DownloadError::Persist {
                path: target,
                source,
            });
        }
        Ok(target)
    }
}
