//! Remote calls behind the two submission flows.
//!
//! # Design
//! - Each call is one POST with no retries; failures keep their cause for logging.
//! - Callers collapse every failure into the flow's generic message.
//! - [`AnalysisService`] is the seam the session dispatches through.

pub(crate) mod bulk;
pub(crate) mod single;

use std::path::PathBuf;

use async_trait::async_trait;
use phishlens_api_models::{AnalysisResult, BulkAnalysisRequest, UrlAnalysisRequest};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

/// Why a dispatch failed. Never shown to the user verbatim.
#[derive(Debug, Error)]
pub(crate) enum DispatchError {
    #[error("base URL '{base}' cannot carry endpoint paths")]
    Endpoint { base: String },
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with status {status}")]
    Protocol {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("{endpoint} returned a malformed body")]
    Malformed {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read upload '{}'", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DispatchError {
    /// Short machine-readable cause used in structured logs.
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::Endpoint { .. } => "endpoint",
            Self::Transport { .. } => "transport",
            Self::Protocol { .. } => "protocol",
            Self::Malformed { .. } => "malformed",
            Self::ReadFile { .. } => "read_file",
        }
    }
}

#[async_trait]
pub(crate) trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: UrlAnalysisRequest) -> Result<AnalysisResult, DispatchError>;

    async fn bulk_analyze(&self, request: BulkAnalysisRequest) -> Result<Vec<u8>, DispatchError>;
}

/// [`AnalysisService`] backed by the remote HTTP API.
#[derive(Clone, Debug)]
pub(crate) struct HttpAnalysisService {
    client: Client,
    base_url: Url,
}

impl HttpAnalysisService {
    pub(crate) const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: UrlAnalysisRequest) -> Result<AnalysisResult, DispatchError> {
        single::analyze_url(&self.client, &self.base_url, &request).await
    }

    async fn bulk_analyze(&self, request: BulkAnalysisRequest) -> Result<Vec<u8>, DispatchError> {
        bulk::upload_csv(&self.client, &self.base_url, request).await
    }
}

/// Resolve an endpoint beneath `base`, keeping any path prefix the base carries.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> Result<Url, DispatchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| DispatchError::Endpoint {
            base: base.to_string(),
        })?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));
    url.set_query(None);
    Ok(url)
}
