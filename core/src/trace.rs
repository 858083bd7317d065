//! Turns extended boolean scores into per-product feature traces.

use crate::classifier::ProductTraces;
use crate::config::AnalysisConfig;
use crate::error::ConfigError;
use crate::features::{FeatureDictionary, FeatureSynonyms};
use crate::index::InvertedIndex;
use crate::indexer::DocumentIndexer;
use crate::scoring::ExtendedBoolean;
use crate::tokenizer::StopWords;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Score every indexed document against one feature, best first.
pub fn score_documents(index: &InvertedIndex, synonyms: &FeatureSynonyms, scorer: &ExtendedBoolean) -> Vec<(PathBuf, f64)> {
    let max_idf = index.max_idf();
    let mut scored: Vec<(PathBuf, f64)> = index
        .documents()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|doc| (doc.to_path_buf(), scorer.score_with_max_idf(index, synonyms, doc, max_idf)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored
}

/// `doc` relative to `root`, `/`-separated.
fn relative_path(root: &Path, doc: &Path) -> String {
    let rel = doc.strip_prefix(root).unwrap_or(doc);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Features with at least one document scoring above `threshold`, mapped to those documents.
pub fn trace_index(
    index: &InvertedIndex,
    root: &Path,
    features: &FeatureDictionary,
    scorer: &ExtendedBoolean,
    threshold: f64,
) -> BTreeMap<String, BTreeSet<String>> {
    features
        .par_iter()
        .filter_map(|(feature, synonyms)| {
            let files: BTreeSet<String> = score_documents(index, synonyms, scorer)
                .into_iter()
                .filter(|(_, score)| *score > threshold)
                .map(|(doc, _)| relative_path(root, &doc))
                .collect();
            (!files.is_empty()).then(|| (feature.clone(), files))
        })
        .collect()
}

/// Index each configured product and threshold its scores into a trace table.
///
/// Stop words, p-norm and language are all resolved before any product is indexed.
pub fn trace_products(config: &AnalysisConfig) -> Result<ProductTraces, ConfigError> {
    let language = config.language()?;
    let stop_words = StopWords::load(config.stopwords_path()?)?;
    let scorer = ExtendedBoolean::from_resources(&config.resources_dir)?.with_combination(config.combination);

    let traces: ProductTraces = config
        .products
        .par_iter()
        .map(|product| {
            let path = config.product_path(product);
            if !path.is_dir() {
                tracing::warn!(product = %product, path = %path.display(), "product directory not found");
            }
            let root = path.canonicalize().unwrap_or(path);
            let index = DocumentIndexer::new(language, &stop_words, &config.features)
                .remove_ifdefs(config.remove_ifdefs)
                .build_index(&root);
            let traced = trace_index(&index, &root, &config.features, &scorer, config.threshold);
            tracing::info!(product = %product, features = traced.len(), "traced product");
            (product.clone(), traced)
        })
        .collect();
    Ok(traces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/spl/p1");
        assert_eq!(relative_path(root, &root.join("src").join("log.c")), "src/log.c");
    }
}
