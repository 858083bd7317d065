//! Analysis configuration loaded from JSON.

use crate::error::ConfigError;
use crate::features::{self, FeatureDictionary};
use crate::language::Language;
use crate::scoring::Combination;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Language tag, e.g. `c` or `java`.
    pub language: String,
    /// Directory holding one subdirectory per product.
    pub products_base_path: PathBuf,
    pub products: Vec<String>,
    pub features: FeatureDictionary,
    /// Documents scoring strictly above this value are traced.
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub remove_ifdefs: bool,
    /// Directory with `stopwords_<lang>.dat` and `extended_boolean_p_norm.dat`.
    #[serde(default = "default_resources_dir")]
    pub resources_dir: PathBuf,
    #[serde(default)]
    pub combination: Combination,
}

fn default_resources_dir() -> PathBuf {
    PathBuf::from("resources")
}

impl AnalysisConfig {
    /// Load a config file. Relative paths inside it resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: AnalysisConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(dir) = path.parent() {
            if config.products_base_path.is_relative() {
                config.products_base_path = dir.join(&config.products_base_path);
            }
            if config.resources_dir.is_relative() {
                config.resources_dir = dir.join(&config.resources_dir);
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn language(&self) -> Result<Language, ConfigError> {
        self.language.parse()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.language()?;
        features::validate(&self.features)
    }

    pub fn product_path(&self, product: &str) -> PathBuf {
        self.products_base_path.join(product)
    }

    pub fn stopwords_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.resources_dir.join(self.language()?.stopwords_file()))
    }
}
