use std::collections::HashSet;

use phishlens_api_models::{CATEGORY_COUNT, FEATURE_COUNT, FeatureCatalog};

const EXPECTED_CATEGORIES: [&str; CATEGORY_COUNT] = [
    "URL Structure",
    "Special Characters",
    "Domain Features",
    "Path Analysis",
    "Word Analysis",
    "Brand & Keywords",
    "HTML Content",
    "Security Features",
    "User Interface",
];

#[test]
fn categories_partition_the_catalog_exactly_once() {
    let catalog = FeatureCatalog::standard();
    let mut seen = HashSet::new();
    let mut total = 0;
    for category in catalog.categories() {
        for id in category.feature_ids {
            assert!(seen.insert(*id), "{id} appears in more than one category");
            total += 1;
        }
    }
    assert_eq!(total, FEATURE_COUNT);

    let all_ids: HashSet<&str> = catalog.features().iter().map(|def| def.id).collect();
    assert_eq!(seen, all_ids);
}

#[test]
fn category_order_is_stable() {
    let first: Vec<&str> = FeatureCatalog::standard()
        .categories()
        .iter()
        .map(|category| category.name)
        .collect();
    let second: Vec<&str> = FeatureCatalog::standard()
        .categories()
        .iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(first, EXPECTED_CATEGORIES);
    assert_eq!(first, second);
}

#[test]
fn feature_ids_follow_display_order_within_categories() {
    let flattened: Vec<&str> = FeatureCatalog::standard()
        .categories()
        .iter()
        .flat_map(|category| category.feature_ids.iter().copied())
        .collect();
    let expected: Vec<String> = (1..=FEATURE_COUNT).map(|n| format!("f{n}")).collect();
    assert_eq!(flattened, expected);
}

#[test]
fn every_label_is_unique_and_non_empty() {
    let catalog = FeatureCatalog::standard();
    let mut labels = HashSet::new();
    for definition in catalog.features() {
        assert!(!definition.label.trim().is_empty());
        assert!(labels.insert(definition.label), "duplicate label {}", definition.label);
    }
}
