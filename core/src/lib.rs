//! Feature-to-code traceability and variability recovery for software product lines.
//!
//! Source trees are indexed per product, scored against feature synonym sets with
//! an extended boolean model, thresholded into traces, and the traces of all
//! products are classified into mandatory/optional features with common, shared
//! and product-specific files.

pub mod classifier;
pub mod config;
pub mod diff;
pub mod error;
pub mod features;
pub mod index;
pub mod indexer;
pub mod language;
pub mod persist;
pub mod scoring;
pub mod tokenizer;
pub mod trace;

pub use classifier::{classify, FeatureResult, ProductTraces, Variability};
pub use error::ConfigError;
pub use features::{FeatureDictionary, FeatureSynonyms};
pub use index::{DocId, InvertedIndex, Posting};
pub use language::Language;
pub use scoring::{Combination, ExtendedBoolean};

use std::collections::BTreeMap;
use std::path::Path;

/// Classify `traces` and diff the common and shared files found under `base`.
pub fn analyze(traces: &ProductTraces, base: &Path) -> BTreeMap<String, FeatureResult> {
    let mut results = classify(traces);
    let cache = diff::ContentCache::new();
    diff::apply_diff(base, &mut results, &cache);
    results
}
