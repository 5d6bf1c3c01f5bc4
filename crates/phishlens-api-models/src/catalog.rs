//! Static feature catalog shared with the classification service.
//!
//! # Design
//! - Ids, labels, and grouping are a fixed contract; nothing here is mutable.
//! - Category order and id order inside a category are display order.
//! - Lookups parse the `f<n>` index instead of scanning the table.

use serde::Serialize;
use thiserror::Error;

/// Number of features the service reports.
pub const FEATURE_COUNT: usize = 80;
/// Number of display categories.
pub const CATEGORY_COUNT: usize = 9;

/// Errors raised by catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The id is not one of `f1`..`f80`.
    #[error("unknown feature '{id}'")]
    UnknownFeature {
        /// Identifier that failed to resolve.
        id: String,
    },
}

/// A single feature id and its human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureDefinition {
    /// Wire identifier (`f1`..`f80`).
    pub id: &'static str,
    /// Label shown to operators.
    pub label: &'static str,
}

/// Named group of feature ids in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureCategory {
    /// Category heading.
    pub name: &'static str,
    /// Member ids in display order.
    pub feature_ids: &'static [&'static str],
}

const fn def(id: &'static str, label: &'static str) -> FeatureDefinition {
    FeatureDefinition { id, label }
}

static FEATURES: [FeatureDefinition; FEATURE_COUNT] = [
    def("f1", "Full URL Length"),
    def("f2", "Hostname Length"),
    def("f3", "IP Address Present"),
    def("f4", "Count of Dots"),
    def("f5", "Count of Hyphens"),
    def("f6", "Count of @ Symbols"),
    def("f7", "Count of Question Marks"),
    def("f8", "Count of & Symbols"),
    def("f9", "Count of | Symbols"),
    def("f10", "Count of = Symbols"),
    def("f11", "Count of Underscores"),
    def("f12", "Count of Tilde Symbols"),
    def("f13", "Count of % Symbols"),
    def("f14", "Count of Forward Slashes"),
    def("f15", "Count of * Symbols"),
    def("f16", "Count of Colons"),
    def("f17", "Count of Commas"),
    def("f18", "Count of Semicolons"),
    def("f19", "Count of $ Symbols"),
    def("f20", "Count of Spaces"),
    def("f21", "Count of WWW"),
    def("f22", "Count of .com"),
    def("f23", "Count of HTTP"),
    def("f24", "Count of //"),
    def("f25", "HTTPS Present"),
    def("f26", "Ratio of Digits in URL"),
    def("f27", "Ratio of Digits in Hostname"),
    def("f28", "Punycode Present"),
    def("f29", "Port Present"),
    def("f30", "TLD in Path"),
    def("f31", "TLD in Subdomain"),
    def("f32", "Abnormal Subdomains"),
    def("f33", "Number of Subdomains"),
    def("f34", "Prefix/Suffix Present"),
    def("f35", "Random String Domain"),
    def("f36", "URL Shortening Service"),
    def("f37", "Suspicious Path Extension"),
    def("f38", "Total Redirections"),
    def("f39", "External Redirections"),
    def("f40", "Number of Words in URL"),
    def("f41", "Character Repetition"),
    def("f42", "Shortest Word Length (URL)"),
    def("f43", "Shortest Word Length (Hostname)"),
    def("f44", "Shortest Word Length (Path)"),
    def("f45", "Longest Word Length (URL)"),
    def("f46", "Longest Word Length (Hostname)"),
    def("f47", "Longest Word Length (Path)"),
    def("f48", "Average Word Length (URL)"),
    def("f49", "Average Word Length (Hostname)"),
    def("f50", "Average Word Length (Path)"),
    def("f51", "Phishing Keywords Count"),
    def("f52", "Brand in Domain"),
    def("f53", "Brand in Subdomain"),
    def("f54", "Brand in Path"),
    def("f55", "Suspicious TLD"),
    def("f56", "Statistical Report"),
    def("f57", "Number of Hyperlinks"),
    def("f58", "Internal Links Ratio"),
    def("f59", "External Links Ratio"),
    def("f60", "Null Links Ratio"),
    def("f61", "External CSS Count"),
    def("f62", "Internal Redirects"),
    def("f63", "External Redirects"),
    def("f64", "Internal Link Errors"),
    def("f65", "External Link Errors"),
    def("f66", "Suspicious Login Form"),
    def("f67", "External Favicon"),
    def("f68", "Links in Tags Ratio"),
    def("f69", "Submit to Email"),
    def("f70", "Internal Media Ratio"),
    def("f71", "External Media Ratio"),
    def("f72", "Suspicious Form Handler"),
    def("f73", "Invisible iFrame"),
    def("f74", "Pop-up Window"),
    def("f75", "Safe Anchor Count"),
    def("f76", "Mouse Over Detection"),
    def("f77", "Right Click Disabled"),
    def("f78", "Empty Title"),
    def("f79", "Domain in Title"),
    def("f80", "Domain in Copyright"),
];

static CATEGORIES: [FeatureCategory; CATEGORY_COUNT] = [
    FeatureCategory {
        name: "URL Structure",
        feature_ids: &["f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10"],
    },
    FeatureCategory {
        name: "Special Characters",
        feature_ids: &[
            "f11", "f12", "f13", "f14", "f15", "f16", "f17", "f18", "f19", "f20",
        ],
    },
    FeatureCategory {
        name: "Domain Features",
        feature_ids: &[
            "f21", "f22", "f23", "f24", "f25", "f26", "f27", "f28", "f29", "f30",
        ],
    },
    FeatureCategory {
        name: "Path Analysis",
        feature_ids: &[
            "f31", "f32", "f33", "f34", "f35", "f36", "f37", "f38", "f39", "f40",
        ],
    },
    FeatureCategory {
        name: "Word Analysis",
        feature_ids: &[
            "f41", "f42", "f43", "f44", "f45", "f46", "f47", "f48", "f49", "f50",
        ],
    },
    FeatureCategory {
        name: "Brand & Keywords",
        feature_ids: &["f51", "f52", "f53", "f54", "f55", "f56"],
    },
    FeatureCategory {
        name: "HTML Content",
        feature_ids: &["f57", "f58", "f59", "f60", "f61", "f62", "f63", "f64", "f65"],
    },
    FeatureCategory {
        name: "Security Features",
        feature_ids: &[
            "f66", "f67", "f68", "f69", "f70", "f71", "f72", "f73", "f74", "f75",
        ],
    },
    FeatureCategory {
        name: "User Interface",
        feature_ids: &["f76", "f77", "f78", "f79", "f80"],
    },
];

static STANDARD: FeatureCatalog = FeatureCatalog {
    features: &FEATURES,
    categories: &CATEGORIES,
};

/// Read-only view over the fixed feature table and its category grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureCatalog {
    features: &'static [FeatureDefinition],
    categories: &'static [FeatureCategory],
}

impl FeatureCatalog {
    /// The catalog agreed with the classification service.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// All feature definitions ordered `f1`..`f80`.
    #[must_use]
    pub const fn features(&self) -> &'static [FeatureDefinition] {
        self.features
    }

    /// The nine categories in display order.
    #[must_use]
    pub const fn categories(&self) -> &'static [FeatureCategory] {
        self.categories
    }

    /// Look up a definition by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'static FeatureDefinition> {
        let index = id.strip_prefix('f')?.parse::<usize>().ok()?;
        let definition = self.features.get(index.checked_sub(1)?)?;
        // rejects spellings like `f07` that parse to a valid index
        (definition.id == id).then_some(definition)
    }

    /// Human-readable label for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownFeature`] when `id` is outside `f1`..`f80`.
    pub fn label_of(&self, id: &str) -> Result<&'static str, CatalogError> {
        self.get(id)
            .map(|definition| definition.label)
            .ok_or_else(|| CatalogError::UnknownFeature { id: id.to_string() })
    }
}
