use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Canonical feature name plus aliases, treated as interchangeable query terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSynonyms(Vec<String>);

impl FeatureSynonyms {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(terms.into_iter().map(Into::into).collect())
    }

    pub fn terms(&self) -> &[String] {
        &self.0
    }

    /// Each synonym once, in lexical order. A repeated entry still counts in [`len`](Self::len).
    pub fn distinct(&self) -> BTreeSet<&str> {
        self.0.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Feature identifier -> synonym set.
pub type FeatureDictionary = BTreeMap<String, FeatureSynonyms>;

/// Reject dictionaries the indexer cannot use: blank ids or blank synonyms.
pub fn validate(features: &FeatureDictionary) -> Result<(), ConfigError> {
    for (id, synonyms) in features {
        if id.trim().is_empty() {
            return Err(ConfigError::FeatureDictionary("empty feature id".into()));
        }
        if synonyms.terms().iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::FeatureDictionary(format!(
                "feature {id} has a blank synonym"
            )));
        }
    }
    Ok(())
}
