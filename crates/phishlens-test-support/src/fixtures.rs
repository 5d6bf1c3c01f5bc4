//! Canned service payloads and upload files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};

/// URL used by the phishing scenario fixtures.
pub const PHISH_URL: &str = "http://example-phish.test";

/// CSV body accepted by `/bulk-analyze` (header `url`, one URL per row).
pub const SAMPLE_UPLOAD_CSV: &str = "url\nhttps://example.com\nhttp://example-phish.test\n";

/// CSV body the service returns for [`SAMPLE_UPLOAD_CSV`].
pub const SAMPLE_RESULT_CSV: &str = "url,prediction,is_safe\nhttps://example.com,legitimate,true\nhttp://example-phish.test,phishing,false\n";

/// Build an `/analyze` response body with the supplied feature values.
#[must_use]
pub fn analysis_payload(url: &str, prediction: &str, is_safe: bool, features: &[(&str, f64)]) -> Value {
    let features: Map<String, Value> = features
        .iter()
        .map(|(id, value)| ((*id).to_string(), json!(value)))
        .collect();
    json!({
        "url": url,
        "prediction": prediction,
        "is_safe": is_safe,
        "features": features,
    })
}

/// Phishing verdict with only `f3` and `f25` populated.
#[must_use]
pub fn phishing_payload() -> Value {
    analysis_payload(PHISH_URL, "phishing", false, &[("f3", 1.0), ("f25", 0.0)])
}

/// Safe verdict carrying every feature set to its index (`f7` = 7.0).
#[must_use]
pub fn safe_payload(url: &str) -> Value {
    let ids: Vec<(String, f64)> = (1..=80_u32)
        .map(|n| (format!("f{n}"), f64::from(n)))
        .collect();
    let borrowed: Vec<(&str, f64)> = ids.iter().map(|(id, v)| (id.as_str(), *v)).collect();
    analysis_payload(url, "legitimate", true, &borrowed)
}

/// Write [`SAMPLE_UPLOAD_CSV`] into `dir` and return its path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_upload_csv(dir: &Path) -> Result<PathBuf> {
    let path = dir.join("urls.csv");
    fs::write(&path, SAMPLE_UPLOAD_CSV)
        .with_context(|| format!("failed to write upload fixture '{}'", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phishing_payload_contains_only_two_features() {
        let payload = phishing_payload();
        let features = payload["features"].as_object().expect("features object");
        assert_eq!(features.len(), 2);
        assert_eq!(payload["is_safe"], json!(false));
    }

    #[test]
    fn safe_payload_covers_whole_catalog() {
        let payload = safe_payload("https://example.com");
        let features = payload["features"].as_object().expect("features object");
        assert_eq!(features.len(), 80);
        assert_eq!(features["f80"], json!(80.0));
    }

    #[test]
    fn write_upload_csv_persists_fixture() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_upload_csv(dir.path())?;
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(fs::read_to_string(&path)?, SAMPLE_UPLOAD_CSV);
        Ok(())
    }
}
