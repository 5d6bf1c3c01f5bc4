//! Fixed notices surfaced after each submission settles.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Error message retained by the single flow on any dispatch failure.
pub(crate) const SINGLE_FAILURE_MESSAGE: &str = "Failed to analyze URL. Please try again.";
/// Error message retained by the bulk flow on any dispatch failure.
pub(crate) const BULK_FAILURE_MESSAGE: &str = "Failed to analyze CSV file. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Severity {
    Default,
    Destructive,
}

impl Display for Severity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Default => "info",
            Self::Destructive => "alert",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Notice {
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) severity: Severity,
}

impl Notice {
    pub(crate) const fn url_analyzed(is_safe: bool) -> Self {
        if is_safe {
            Self {
                title: "URL Analysis Complete",
                description: "The URL appears to be safe",
                severity: Severity::Default,
            }
        } else {
            Self {
                title: "Warning: Potential Threat Detected",
                description: "The URL may be malicious",
                severity: Severity::Destructive,
            }
        }
    }

    pub(crate) const fn url_failed() -> Self {
        Self {
            title: "Analysis Failed",
            description: "Could not complete URL analysis. Please try again.",
            severity: Severity::Destructive,
        }
    }

    pub(crate) const fn bulk_completed() -> Self {
        Self {
            title: "Bulk Analysis Complete",
            description: "Analysis results have been downloaded as a CSV file.",
            severity: Severity::Default,
        }
    }

    pub(crate) const fn bulk_failed() -> Self {
        Self {
            title: "Bulk Analysis Failed",
            description: "Could not complete bulk URL analysis. Please try again.",
            severity: Severity::Destructive,
        }
    }
}
