//! Report projection and renderers for CLI commands.
//!
//! # Design
//! - [`render_report`] is pure: it joins a result with the catalog and never mutates either.
//! - Reports and catalogs go to stdout; notices go to stderr.

use std::path::Path;

use anyhow::anyhow;
use phishlens_api_models::{AnalysisResult, FeatureCatalog, FeatureDefinition};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};
use crate::notify::Notice;
use crate::session::Session;
use crate::state::SubmissionState;

/// Display projection of one [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AnalysisReport {
    pub(crate) url: String,
    pub(crate) prediction: String,
    pub(crate) is_safe: bool,
    pub(crate) badge: &'static str,
    pub(crate) alert_title: &'static str,
    pub(crate) categories: Vec<CategoryReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryReport {
    pub(crate) name: &'static str,
    pub(crate) rows: Vec<FeatureRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FeatureRow {
    pub(crate) id: &'static str,
    pub(crate) label: &'static str,
    pub(crate) value: i64,
}

#[derive(Serialize)]
struct CatalogView<'a> {
    name: &'a str,
    features: Vec<&'a FeatureDefinition>,
}

#[derive(Serialize)]
struct StatusView<'a> {
    url_input: &'a str,
    single: &'static str,
    single_error: Option<&'a str>,
    selected_file: Option<String>,
    bulk: &'static str,
    bulk_error: Option<&'a str>,
}

/// Join `result` with the catalog, category by category in display order.
pub(crate) fn render_report(result: &AnalysisResult, catalog: &FeatureCatalog) -> AnalysisReport {
    let categories = catalog
        .categories()
        .iter()
        .map(|category| CategoryReport {
            name: category.name,
            rows: category
                .feature_ids
                .iter()
                .map(|&id| FeatureRow {
                    id,
                    label: catalog.label_of(id).unwrap_or(id),
                    value: display_value(result.feature_value(id)),
                })
                .collect(),
        })
        .collect();

    AnalysisReport {
        url: result.url.clone(),
        prediction: result.prediction.clone(),
        is_safe: result.is_safe,
        badge: badge(result.is_safe),
        alert_title: alert_title(result.is_safe),
        categories,
    }
}

/// Round to the nearest integer with halves going up (`2.5` -> `3`, `-0.5` -> `0`).
/// Decided on the fractional part, so `0.49999999999999994` stays `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn display_value(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

#[must_use]
pub(crate) const fn badge(is_safe: bool) -> &'static str {
    if is_safe { "Safe" } else { "Potentially Malicious" }
}

#[must_use]
pub(crate) const fn alert_title(is_safe: bool) -> &'static str {
    if is_safe {
        "Safe URL Detected"
    } else {
        "Warning: Potential Phishing"
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn print_report(report: &AnalysisReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(report)?),
        OutputFormat::Table => {
            println!("{}", report.alert_title);
            println!("url: {}", report.url);
            println!("prediction: {}", report.prediction);
            println!("badge: {}", report.badge);
            for category in &report.categories {
                println!();
                println!("{}", category.name);
                for row in &category.rows {
                    println!("  {:<4} {:<48} {:>6}", row.id, row.label, row.value);
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn print_catalog(catalog: &FeatureCatalog, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let views: Vec<CatalogView<'_>> = catalog
                .categories()
                .iter()
                .map(|category| CatalogView {
                    name: category.name,
                    features: category
                        .feature_ids
                        .iter()
                        .filter_map(|id| catalog.get(id))
                        .collect(),
                })
                .collect();
            println!("{}", to_json(&views)?);
        }
        OutputFormat::Table => {
            for category in catalog.categories() {
                println!("{} ({})", category.name, category.feature_ids.len());
                for &id in category.feature_ids {
                    let label = catalog.label_of(id).unwrap_or(id);
                    println!("  {id:<4} {label}");
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn print_notice(notice: &Notice, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => eprintln!("{}", to_json(notice)?),
        OutputFormat::Table => eprintln!(
            "[{}] {}: {}",
            notice.severity, notice.title, notice.description
        ),
    }
    Ok(())
}

pub(crate) fn print_saved(path: &Path) {
    println!("saved: {}", path.display());
}

pub(crate) fn print_status(session: &Session, format: OutputFormat) -> CliResult<()> {
    let single = session.single_state();
    let bulk = session.bulk_state();
    let view = StatusView {
        url_input: session.url_input(),
        single: single.name(),
        single_error: match single {
            SubmissionState::Error(message) => Some(message.as_str()),
            _ => None,
        },
        selected_file: session
            .selected_file()
            .map(|path| path.display().to_string()),
        bulk: bulk.name(),
        bulk_error: match bulk {
            SubmissionState::Error(message) => Some(message.as_str()),
            _ => None,
        },
    };

    match format {
        OutputFormat::Json => println!("{}", to_json(&view)?),
        OutputFormat::Table => {
            println!("url: {}", if view.url_input.is_empty() { "<none>" } else { view.url_input });
            println!("single: {}", view.single);
            if let Some(message) = view.single_error {
                println!("  {message}");
            }
            println!(
                "file: {}",
                view.selected_file.as_deref().unwrap_or("<none>")
            );
            println!("bulk: {}", view.bulk);
            if let Some(message) = view.bulk_error {
                println!("  {message}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phishlens_api_models::FEATURE_COUNT;
    use phishlens_test_support::fixtures::{PHISH_URL, phishing_payload, safe_payload};

    fn result_from(payload: serde_json::Value) -> AnalysisResult {
        serde_json::from_value(payload).expect("fixture parses")
    }

    fn row<'a>(report: &'a AnalysisReport, id: &str) -> &'a FeatureRow {
        report
            .categories
            .iter()
            .flat_map(|category| category.rows.iter())
            .find(|row| row.id == id)
            .expect("row present")
    }

    #[test]
    fn phishing_scenario_renders_two_known_rows_and_zeroes() {
        let result = result_from(phishing_payload());
        let report = render_report(&result, FeatureCatalog::standard());

        assert_eq!(report.url, PHISH_URL);
        assert_eq!(report.prediction, "phishing");
        assert_eq!(report.badge, "Potentially Malicious");
        assert_eq!(report.alert_title, "Warning: Potential Phishing");
        assert_eq!(report.categories.len(), 9);
        assert_eq!(row(&report, "f3").value, 1);
        assert_eq!(row(&report, "f25").value, 0);

        let rows: Vec<&FeatureRow> = report
            .categories
            .iter()
            .flat_map(|category| category.rows.iter())
            .collect();
        assert_eq!(rows.len(), FEATURE_COUNT);
        let others = rows
            .iter()
            .filter(|row| row.id != "f3" && row.id != "f25")
            .filter(|row| row.value == 0)
            .count();
        assert_eq!(others, 78);
    }

    #[test]
    fn omitted_feature_renders_as_zero() {
        let mut result = result_from(safe_payload("https://example.com"));
        result.features.remove("f17");
        let report = render_report(&result, FeatureCatalog::standard());
        assert_eq!(row(&report, "f17").value, 0);
        assert_eq!(row(&report, "f18").value, 18);
    }

    #[test]
    fn badge_follows_safety_flag() {
        let report = render_report(
            &result_from(safe_payload("https://example.com")),
            FeatureCatalog::standard(),
        );
        assert_eq!(report.badge, "Safe");
        assert_eq!(report.alert_title, "Safe URL Detected");
        assert_eq!(badge(false), "Potentially Malicious");
    }

    #[test]
    fn rows_follow_catalog_order_and_labels() {
        let catalog = FeatureCatalog::standard();
        let report = render_report(&result_from(phishing_payload()), catalog);
        for (category, rendered) in catalog.categories().iter().zip(&report.categories) {
            assert_eq!(category.name, rendered.name);
            let ids: Vec<&str> = rendered.rows.iter().map(|row| row.id).collect();
            assert_eq!(ids, category.feature_ids);
        }
        assert_eq!(
            row(&report, "f1").label,
            catalog.label_of("f1").expect("known id")
        );
    }

    #[test]
    fn display_value_rounds_like_the_dashboard() {
        assert_eq!(display_value(0.0), 0);
        assert_eq!(display_value(0.49), 0);
        assert_eq!(display_value(0.5), 1);
        assert_eq!(display_value(2.5), 3);
        assert_eq!(display_value(-0.5), 0);
        assert_eq!(display_value(-1.6), -2);
        assert_eq!(display_value(42.0), 42);
        assert_eq!(display_value(0.499_999_999_999_999_94), 0);
        assert_eq!(display_value(-2.5), -2);
        assert_eq!(display_value(4_503_599_627_370_497.0), 4_503_599_627_370_497);
    }

    #[test]
    fn render_report_leaves_result_untouched() {
        let result = result_from(phishing_payload());
        let before = result.clone();
        let _ = render_report(&result, FeatureCatalog::standard());
        assert_eq!(result, before);
    }

    #[test]
    fn report_serializes_for_json_output() {
        let report = render_report(&result_from(phishing_payload()), FeatureCatalog::standard());
        let value = serde_json::to_value(&report).expect("serializable");
        assert_eq!(value["badge"], "Potentially Malicious");
        assert_eq!(value["categories"][0]["name"], "URL Structure");
    }
}
