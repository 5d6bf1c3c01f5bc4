#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared DTOs for the PhishLens classification API.
//!
//! The remote service owns feature extraction and classification; this crate only
//! describes the wire contract (request/response shapes, endpoint paths, form field
//! names) and the static feature catalog both sides agree on.

pub mod catalog;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use catalog::{
    CATEGORY_COUNT, CatalogError, FEATURE_COUNT, FeatureCatalog, FeatureCategory,
    FeatureDefinition,
};

/// Path of the single-URL analysis endpoint.
pub const ANALYZE_PATH: &str = "/analyze";
/// Path of the bulk CSV analysis endpoint.
pub const BULK_ANALYZE_PATH: &str = "/bulk-analyze";
/// Multipart field carrying the URL for [`ANALYZE_PATH`].
pub const URL_FIELD: &str = "url";
/// Multipart field carrying the CSV upload for [`BULK_ANALYZE_PATH`].
pub const FILE_FIELD: &str = "file";
/// File name the bulk result is saved under on the client.
pub const BULK_RESULT_FILE_NAME: &str = "url_analysis_results.csv";
/// Column the server expects in an uploaded CSV.
pub const BULK_URL_COLUMN: &str = "url";

/// Verdict and feature vector returned by `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    /// URL exactly as submitted.
    pub url: String,
    /// Classifier label (for example `phishing` or `legitimate`).
    pub prediction: String,
    /// Whether the service considers the URL safe.
    pub is_safe: bool,
    /// Feature values keyed by catalog id (`f1`..`f80`). May be a subset.
    #[serde(default)]
    pub features: BTreeMap<String, f64>,
}

impl AnalysisResult {
    /// Value recorded for `id`, with missing features reading as zero.
    #[must_use]
    pub fn feature_value(&self, id: &str) -> f64 {
        self.features.get(id).copied().unwrap_or(0.0)
    }
}

/// Single-URL submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlAnalysisRequest {
    /// URL to classify, sent verbatim.
    pub url: String,
}

/// Bulk submission carrying a user-selected CSV file.
///
/// The contents are not inspected; the server enforces the CSV layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAnalysisRequest {
    /// Name reported for the multipart part.
    pub file_name: String,
    /// Raw file bytes.
    pub contents: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_result_parses_feature_subset() {
        let payload = json!({
            "url": "http://example-phish.test",
            "prediction": "phishing",
            "is_safe": false,
            "features": {"f3": 1, "f25": 0.0}
        });

        let result: AnalysisResult =
            serde_json::from_value(payload).expect("result should deserialize");
        assert_eq!(result.features.len(), 2);
        assert!((result.feature_value("f3") - 1.0).abs() < f64::EPSILON);
        assert!(result.feature_value("f17").abs() < f64::EPSILON);
    }

    #[test]
    fn analysis_result_tolerates_missing_feature_map() {
        let payload = json!({
            "url": "https://example.com",
            "prediction": "legitimate",
            "is_safe": true
        });
        let result: AnalysisResult =
            serde_json::from_value(payload).expect("result should deserialize");
        assert!(result.features.is_empty());
    }

    #[test]
    fn analysis_result_rejects_wrong_shape() {
        let payload = json!({"url": "https://example.com", "is_safe": "yes"});
        assert!(serde_json::from_value::<AnalysisResult>(payload).is_err());
    }
}
