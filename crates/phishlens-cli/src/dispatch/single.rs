//! Single-URL submission against `POST /analyze`.

use phishlens_api_models::{ANALYZE_PATH, AnalysisResult, URL_FIELD, UrlAnalysisRequest};
use reqwest::multipart::Form;
use reqwest::{Client, Url};

use crate::dispatch::{DispatchError, endpoint_url};

/// Post `request` as multipart form data and decode the verdict.
pub(crate) async fn analyze_url(
    client: &Client,
    base_url: &Url,
    request: &UrlAnalysisRequest,
) -> Result<AnalysisResult, DispatchError> {
    let url = endpoint_url(base_url, ANALYZE_PATH)?;
    let form = Form::new().text(URL_FIELD, request.url.clone());

    let response = client
        .post(url)
        .multipart(form)
        .send()
        .await
        .map_err(|source| DispatchError::Transport {
            endpoint: ANALYZE_PATH,
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DispatchError::Protocol {
            endpoint: ANALYZE_PATH,
            status,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| DispatchError::Transport {
            endpoint: ANALYZE_PATH,
            source,
        })?;
    serde_json::from_slice::<AnalysisResult>(&body).map_err(|source| DispatchError::Malformed {
        endpoint: ANALYZE_PATH,
        source,
    })
}
