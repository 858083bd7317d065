//! Commonality and variability analysis over per-product feature traces.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// product -> feature -> traced files (paths relative to the product root).
pub type ProductTraces = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variability {
    Mandatory,
    Optional,
}

/// Classification of one feature across all products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureResult {
    /// Products tracing the feature, in product order.
    pub products: Vec<String>,
    pub variability: Variability,
    pub all_files: BTreeSet<String>,
    pub common_files: BTreeSet<String>,
    pub shared_files: BTreeSet<String>,
    pub specific_files: BTreeSet<String>,
    #[serde(default)]
    pub common_diff_ratios: BTreeMap<String, f64>,
    #[serde(default)]
    pub common_levenshtein: BTreeMap<String, usize>,
    #[serde(default)]
    pub shared_diff_ratios: BTreeMap<String, f64>,
    #[serde(default)]
    pub shared_levenshtein: BTreeMap<String, usize>,
}

/// Common, shared and specific files of one feature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePartition {
    pub all: BTreeSet<String>,
    pub common: BTreeSet<String>,
    pub shared: BTreeSet<String>,
    pub specific: BTreeSet<String>,
}

/// Every feature traced by at least one product.
pub fn all_features(traces: &ProductTraces) -> BTreeSet<&str> {
    traces
        .values()
        .flat_map(|features| features.keys().map(String::as_str))
        .collect()
}

/// Products whose trace table contains `feature`.
pub fn products_with_feature(traces: &ProductTraces, feature: &str) -> Vec<String> {
    traces
        .iter()
        .filter(|(_, features)| features.contains_key(feature))
        .map(|(product, _)| product.clone())
        .collect()
}

fn strip_trailing_separators(file: &str) -> &str {
    let trimmed = file.trim_end_matches(|c: char| c == '/' || c == '\\');
    if trimmed.is_empty() { file } else { trimmed }
}

/// Partition per-product file sets, given in product order.
///
/// A file outside the common set is specific on its first sighting and moves to
/// shared on its second; later sightings leave it in shared.
pub fn partition_files(per_product: &[BTreeSet<String>]) -> FilePartition {
    let Some((first, rest)) = per_product.split_first() else {
        return FilePartition::default();
    };
    let all: BTreeSet<String> = per_product.iter().flatten().cloned().collect();
    let common: BTreeSet<String> = first
        .iter()
        .filter(|file| rest.iter().all(|set| set.contains(*file)))
        .cloned()
        .collect();

    let mut seen_once = BTreeSet::new();
    let mut seen_multiple = BTreeSet::new();
    for file in per_product.iter().flatten() {
        if common.contains(file) || seen_multiple.contains(file) {
            continue;
        }
        if seen_once.remove(file) {
            seen_multiple.insert(file.clone());
        } else {
            seen_once.insert(file.clone());
        }
    }

    debug_assert!(seen_once.is_disjoint(&seen_multiple));
    FilePartition { all, common, shared: seen_multiple, specific: seen_once }
}

/// Classify a single feature. `None` when no product traces it.
pub fn classify_feature(traces: &ProductTraces, feature: &str) -> Option<FeatureResult> {
    let products = products_with_feature(traces, feature);
    if products.is_empty() {
        return None;
    }
    let variability = if products.len() == traces.len() {
        Variability::Mandatory
    } else {
        Variability::Optional
    };

    let per_product: Vec<BTreeSet<String>> = products
        .iter()
        .map(|product| {
            traces[product][feature]
                .iter()
                .map(|f| strip_trailing_separators(f).to_string())
                .collect()
        })
        .collect();
    let partition = partition_files(&per_product);

    Some(FeatureResult {
        products,
        variability,
        all_files: partition.all,
        common_files: partition.common,
        shared_files: partition.shared,
        specific_files: partition.specific,
        common_diff_ratios: BTreeMap::new(),
        common_levenshtein: BTreeMap::new(),
        shared_diff_ratios: BTreeMap::new(),
        shared_levenshtein: BTreeMap::new(),
    })
}

/// Classify every traced feature: mandatory/optional status and file partitions.
pub fn classify(traces: &ProductTraces) -> BTreeMap<String, FeatureResult> {
    let results: BTreeMap<String, FeatureResult> = all_features(traces)
        .into_iter()
        .filter_map(|feature| classify_feature(traces, feature).map(|r| (feature.to_string(), r)))
        .collect();
    tracing::info!(
        products = traces.len(),
        features = results.len(),
        mandatory = results.values().filter(|r| r.variability == Variability::Mandatory).count(),
        "classified features"
    );
    results
}
