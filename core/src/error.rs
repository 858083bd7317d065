use std::path::PathBuf;

/// Fatal configuration problems. Any of these aborts a run before indexing starts.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("cannot read stop-word list {path}: {source}")]
    StopWords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read p-norm file {path}: {source}")]
    PNorm {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid p-norm value {value:?} in {path}")]
    InvalidPNorm { path: PathBuf, value: String },
    #[error("invalid feature dictionary: {0}")]
    FeatureDictionary(String),
}
