use crate::error::ConfigError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\w']+").expect("valid regex");
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n").expect("valid regex");
}

/// Marker that opens a conditional-compilation line (`#if`, `#ifdef`, `#ifndef`).
pub const CONDITIONAL_MARKER: &str = "#if";

/// Reserved words and common terms of one programming language.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Load a stop-word list, one token per line.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::StopWords {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(text.lines().collect())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for StopWords {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let words = iter
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { words }
    }
}

/// Tokenize text into lowercase runs of word characters and apostrophes.
///
/// Stop words are kept; filtering happens while indexing so that feature
/// substring matching still sees every raw token.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// Drop every line containing a conditional-compilation marker.
///
/// `\r\n`, `\r` and `\n` all end a line; kept lines are rejoined with `\n`.
pub fn strip_conditional_lines(text: &str) -> String {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix(|c: char| c == '\r' || c == '\n'))
        .unwrap_or(text);
    LINE_BREAK
        .split(text)
        .filter(|line| !line.contains(CONDITIONAL_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}
