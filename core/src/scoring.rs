//! Extended boolean (p-norm) similarity between a feature query and a document.
//!
//! For a document `d` and synonym set `Q`:
//!
//! ```text
//! tf(t)  = freq(t, d) / max_{q in Q} freq(q, d)
//! idf(t) = log2(N / df(t)) / max_idf
//! sim    = ( sum_{t in Q, t in d} combine(tf(t)^p, idf(t)^p) / |Q| )^(1/p)
//! ```
//!
//! The sum runs over distinct synonyms while `|Q|` counts every listed entry,
//! so a repeated synonym dilutes the score instead of doubling its term.
//!
//! `combine` is addition by default. The multiplicative reading is kept as
//! [`Combination::Product`]; only that variant keeps scores inside `[0, 1]`,
//! the additive one is bounded by `2^(1/p)`.

use crate::error::ConfigError;
use crate::features::FeatureSynonyms;
use crate::index::InvertedIndex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File holding the p-norm exponent inside the resources directory.
pub const P_NORM_FILE: &str = "extended_boolean_p_norm.dat";

/// How a term's document weight and query weight are folded into the sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combination {
    /// `tf^p + idf^p`
    #[default]
    Sum,
    /// `tf^p * idf^p`
    Product,
}

impl Combination {
    fn apply(self, tf_p: f64, idf_p: f64) -> f64 {
        match self {
            Self::Sum => tf_p + idf_p,
            Self::Product => tf_p * idf_p,
        }
    }
}

/// Read the integer exponent from the first line of `path`.
pub fn load_p_norm<P: AsRef<Path>>(path: P) -> Result<f64, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::PNorm {
        path: path.to_path_buf(),
        source,
    })?;
    let line = text.lines().next().unwrap_or("").trim();
    line.parse::<i64>()
        .map(|p| p as f64)
        .map_err(|_| ConfigError::InvalidPNorm { path: path.to_path_buf(), value: line.to_string() })
}

/// Scorer parameters. Cheap to copy into worker threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedBoolean {
    pub p: f64,
    pub combination: Combination,
}

impl ExtendedBoolean {
    pub fn new(p: f64) -> Self {
        Self { p, combination: Combination::default() }
    }

    pub fn with_combination(mut self, combination: Combination) -> Self {
        self.combination = combination;
        self
    }

    /// Load `p` from `<resources_dir>/extended_boolean_p_norm.dat`.
    pub fn from_resources(resources_dir: &Path) -> Result<Self, ConfigError> {
        load_p_norm(resources_dir.join(P_NORM_FILE)).map(Self::new)
    }

    pub fn score(&self, index: &InvertedIndex, features: &FeatureSynonyms, document: &Path) -> f64 {
        self.score_with_max_idf(index, features, document, index.max_idf())
    }

    /// Same as [`score`](Self::score) with a precomputed `max_idf`, for scoring many
    /// documents against one index.
    pub fn score_with_max_idf(
        &self,
        index: &InvertedIndex,
        features: &FeatureSynonyms,
        document: &Path,
        max_idf: f64,
    ) -> f64 {
        if features.is_empty() || self.p == 0.0 || !index.contains_document(document) {
            return 0.0;
        }
        let max_frequency = max_frequency(index, features, document);
        if max_frequency == 0 {
            return 0.0;
        }

        let mut sum = 0.0;
        for term in features.distinct() {
            let (Some(posting), Some(idf)) = (index.posting(term, document), index.idf(term)) else {
                continue;
            };
            let tf = posting.frequency as f64 / max_frequency as f64;
            // max_idf is 0 only when every term occurs in every document
            let idf = if max_idf > 0.0 { idf / max_idf } else { 0.0 };
            sum += self.combination.apply(tf.powf(self.p), idf.powf(self.p));
        }

        let numerator = sum / features.len() as f64;
        if numerator > 0.0 {
            numerator.powf(1.0 / self.p)
        } else {
            0.0
        }
    }
}

/// Highest raw frequency in `document` among the synonyms, 0 if none occur.
pub fn max_frequency(index: &InvertedIndex, features: &FeatureSynonyms, document: &Path) -> u32 {
    features
        .distinct()
        .into_iter()
        .filter_map(|t| index.posting(t, document))
        .map(|p| p.frequency)
        .max()
        .unwrap_or(0)
}

/// Convenience wrapper over [`ExtendedBoolean::score`].
pub fn score(index: &InvertedIndex, features: &FeatureSynonyms, document: &Path, p: f64) -> f64 {
    ExtendedBoolean::new(p).score(index, features, document)
}
