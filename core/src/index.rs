use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Documents are identified by their file path.
pub type DocId = PathBuf;

/// Occurrence data for one (term, document) pair. Built once, never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Posting {
    pub frequency: u32,
    /// Reserved for precomputed weights; unused by the extended boolean scorer.
    pub weight: f32,
}

impl Posting {
    pub fn new(frequency: u32) -> Self {
        Self { frequency, weight: 0.0 }
    }
}

/// A file that was discovered but could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

/// term -> (document -> posting), plus per-document lengths and corpus size.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, HashMap<DocId, Posting>>,
    documents: HashMap<DocId, usize>,
    index_terms: HashSet<String>,
    skipped: Vec<SkippedDocument>,
    num_files: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a posting. Zero frequencies are never stored.
    pub(crate) fn insert(&mut self, term: &str, doc: &Path, frequency: u32) {
        if frequency == 0 {
            return;
        }
        self.postings
            .entry(term.to_string())
            .or_default()
            .insert(doc.to_path_buf(), Posting::new(frequency));
    }

    pub(crate) fn add_document(&mut self, doc: &Path, length: usize) {
        self.documents.insert(doc.to_path_buf(), length);
    }

    pub(crate) fn add_index_term(&mut self, term: &str) {
        if !self.index_terms.contains(term) {
            self.index_terms.insert(term.to_string());
        }
    }

    pub(crate) fn count_file(&mut self) {
        self.num_files += 1;
    }

    pub(crate) fn skip(&mut self, path: &Path, reason: String) {
        self.skipped.push(SkippedDocument { path: path.to_path_buf(), reason });
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<DocId, Posting>> {
        self.postings.get(term)
    }

    pub fn posting(&self, term: &str, doc: &Path) -> Option<&Posting> {
        self.postings.get(term).and_then(|p| p.get(doc))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Every discovered source file, including the ones that could not be read.
    pub fn num_files(&self) -> usize {
        self.num_files
    }

    pub fn docs_per_term(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashMap::len)
    }

    /// `log2(numFiles / docsContainingTerm)`, or `None` for a term with no postings.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let df = self.docs_per_term(term);
        if df == 0 || self.num_files == 0 {
            return None;
        }
        Some((self.num_files as f64 / df as f64).log2())
    }

    pub fn max_idf(&self) -> f64 {
        self.terms()
            .filter_map(|t| self.idf(t))
            .fold(0.0, f64::max)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Path> {
        self.documents.keys().map(PathBuf::as_path)
    }

    pub fn contains_document(&self, doc: &Path) -> bool {
        self.documents.contains_key(doc)
    }

    /// Token count of an indexed document.
    pub fn document_length(&self, doc: &Path) -> Option<usize> {
        self.documents.get(doc).copied()
    }

    pub fn document_lengths(&self) -> &HashMap<DocId, usize> {
        &self.documents
    }

    /// Raw terms seen in any document, stop words included.
    pub fn index_terms(&self) -> &HashSet<String> {
        &self.index_terms
    }

    pub fn skipped(&self) -> &[SkippedDocument] {
        &self.skipped
    }
}
