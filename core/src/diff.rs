//! Pairwise comparison of the product copies of common and shared files.

use crate::classifier::FeatureResult;
use crate::indexer::read_source;
use parking_lot::RwLock;
use rayon::prelude::*;
use similar::TextDiff;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on a single character diff before `similar` falls back to an approximation.
const DIFF_TIMEOUT: Duration = Duration::from_secs(5);

/// path -> file content, shared by every feature of a run.
#[derive(Debug, Default)]
pub struct ContentCache {
    inner: RwLock<HashMap<PathBuf, Arc<str>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Arc<str>> {
        self.inner.read().get(path).cloned()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.inner.read().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// First write wins; a concurrent reader of the same path keeps its value.
    fn insert_if_absent(&self, path: &Path, content: String) {
        self.inner
            .write()
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::from(content));
    }
}

/// Load every path not yet cached. Paths that cannot be read are left out.
pub fn read_files_content(paths: &[PathBuf], cache: &ContentCache) {
    for path in paths {
        if cache.contains(path) {
            continue;
        }
        match read_source(path) {
            Ok(content) => cache.insert_if_absent(path, content),
            Err(err) => tracing::debug!(path = %path.display(), error = %err, "not cached"),
        }
    }
}

pub fn product_file(base: &Path, product: &str, relative: &str) -> PathBuf {
    base.join(product).join(relative)
}

/// The `base/product/relative` paths that exist on disk, in product order.
pub fn get_valid_files(base: &Path, products: &[String], relative: &str) -> Vec<PathBuf> {
    products
        .iter()
        .map(|product| product_file(base, product, relative))
        .filter(|path| path.is_file())
        .collect()
}

/// Every unordered pair, in input order.
pub fn pairs(paths: &[PathBuf]) -> Vec<(PathBuf, PathBuf)> {
    let mut out = Vec::new();
    for (i, a) in paths.iter().enumerate() {
        for b in &paths[i + 1..] {
            out.push((a.clone(), b.clone()));
        }
    }
    out
}

pub fn pair_key(file_id: &str, a: &Path, b: &Path) -> String {
    format!("{file_id}|{}|{}", a.display(), b.display())
}

/// Character-level similarity `2*M / (|a| + |b|)`, 1.0 for two empty texts.
pub fn diff_ratio(a: &str, b: &str) -> f64 {
    TextDiff::configure().timeout(DIFF_TIMEOUT).diff_chars(a, b).ratio() as f64
}

/// Character-level edit distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if b.is_empty() {
        return a.chars().count();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}

/// Compare the cached content of each pair. Pairs with an uncached side are skipped.
pub fn calculate_file_differences(
    file_id: &str,
    pairs: &[(PathBuf, PathBuf)],
    cache: &ContentCache,
    ratios: &mut BTreeMap<String, f64>,
    distances: &mut BTreeMap<String, usize>,
) {
    for (a, b) in pairs {
        let (Some(text_a), Some(text_b)) = (cache.get(a), cache.get(b)) else {
            continue;
        };
        let key = pair_key(file_id, a, b);
        ratios.insert(key.clone(), diff_ratio(&text_a, &text_b));
        distances.insert(key, levenshtein(&text_a, &text_b));
    }
}

fn diff_common_files(base: &Path, feature: &str, result: &mut FeatureResult, cache: &ContentCache) {
    let mut ratios = BTreeMap::new();
    let mut distances = BTreeMap::new();
    for file in &result.common_files {
        let paths: Vec<PathBuf> = result
            .products
            .iter()
            .map(|product| product_file(base, product, file))
            .collect();
        read_files_content(&paths, cache);
        for path in paths.iter().filter(|p| !cache.contains(p)) {
            tracing::warn!(feature, file = %file, path = %path.display(), "common file missing from product");
        }
        calculate_file_differences(file, &pairs(&paths), cache, &mut ratios, &mut distances);
    }
    result.common_diff_ratios = ratios;
    result.common_levenshtein = distances;
}

fn diff_shared_files(base: &Path, feature: &str, result: &mut FeatureResult, cache: &ContentCache) {
    let mut ratios = BTreeMap::new();
    let mut distances = BTreeMap::new();
    for file in &result.shared_files {
        let paths = get_valid_files(base, &result.products, file);
        tracing::debug!(feature, file = %file, copies = paths.len(), "diffing shared file");
        read_files_content(&paths, cache);
        calculate_file_differences(file, &pairs(&paths), cache, &mut ratios, &mut distances);
    }
    result.shared_diff_ratios = ratios;
    result.shared_levenshtein = distances;
}

/// Fill the diff ratio and edit distance maps of every feature.
///
/// `base` holds one directory per product. Features are processed in parallel
/// and share `cache`, so a file traced by several features is read once.
pub fn apply_diff(base: &Path, results: &mut BTreeMap<String, FeatureResult>, cache: &ContentCache) {
    results.par_iter_mut().for_each(|(feature, result)| {
        diff_common_files(base, feature, result, cache);
        diff_shared_files(base, feature, result, cache);
    });
    tracing::info!(features = results.len(), cached_files = cache.len(), "applied diffs");
}
