use crate::error::ConfigError;
use crate::features::FeatureDictionary;
use crate::index::InvertedIndex;
use crate::language::Language;
use crate::tokenizer::{strip_conditional_lines, tokenize, StopWords};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Read a source file as UTF-8, falling back to Latin-1 when the bytes do not decode.
pub fn read_source(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => Ok(err.into_bytes().iter().map(|&b| b as char).collect()),
    }
}

/// Builds the inverted index of one product's source tree.
pub struct DocumentIndexer<'a> {
    pub language: Language,
    pub stop_words: &'a StopWords,
    pub features: &'a FeatureDictionary,
    pub remove_ifdefs: bool,
}

impl<'a> DocumentIndexer<'a> {
    pub fn new(language: Language, stop_words: &'a StopWords, features: &'a FeatureDictionary) -> Self {
        Self { language, stop_words, features, remove_ifdefs: false }
    }

    pub fn remove_ifdefs(mut self, yes: bool) -> Self {
        self.remove_ifdefs = yes;
        self
    }

    /// Index every file under `project` matching the language's extensions.
    ///
    /// Each discovered file counts toward `num_files` before it is read, so a file
    /// that cannot be read still widens the IDF denominator.
    pub fn build_index(&self, project: &Path) -> InvertedIndex {
        let root = project.canonicalize().unwrap_or_else(|_| project.to_path_buf());
        let mut index = InvertedIndex::new();
        let synonyms: BTreeSet<&str> = self
            .features
            .values()
            .flat_map(|s| s.distinct())
            .collect();

        for ext in self.language.extensions() {
            for file in source_files(&root, ext) {
                index.count_file();
                match read_source(&file) {
                    Ok(text) => self.index_document(&mut index, &file, &text, &synonyms),
                    Err(err) => {
                        tracing::warn!(path = %file.display(), error = %err, "skipping unreadable file");
                        index.skip(&file, err.to_string());
                    }
                }
            }
        }

        tracing::info!(
            project = %root.display(),
            language = %self.language,
            num_files = index.num_files(),
            num_terms = index.num_terms(),
            skipped = index.skipped().len(),
            "indexed project"
        );
        index
    }

    fn index_document(&self, index: &mut InvertedIndex, doc: &Path, text: &str, synonyms: &BTreeSet<&str>) {
        let tokens = if self.remove_ifdefs {
            tokenize(&strip_conditional_lines(text))
        } else {
            tokenize(text)
        };
        index.add_document(doc, tokens.len());

        let mut tf_counts: HashMap<&str, u32> = HashMap::new();
        for token in &tokens {
            *tf_counts.entry(token.as_str()).or_insert(0) += 1;
        }

        for (term, tf) in &tf_counts {
            index.add_index_term(term);
            if *tf > 0 && !self.stop_words.contains(term) {
                index.insert(term, doc, *tf);
            }
        }

        // Synonyms that never occur as a whole token are counted by substring,
        // so "log" picks up "logging_init".
        for synonym in synonyms {
            if tf_counts.contains_key(synonym) || self.stop_words.contains(synonym) {
                continue;
            }
            let tf = tokens.iter().filter(|t| t.contains(synonym)).count() as u32;
            index.insert(synonym, doc, tf);
        }

        tracing::debug!(path = %doc.display(), tokens = tokens.len(), "indexed document");
    }
}

/// Entries below `root` with extension `ext`, in a stable order.
///
/// Hidden files and directories are not entered. Directory symlinks are
/// followed; a link whose target is gone is still listed so that reading it
/// reports a skipped document.
fn source_files(root: &Path, ext: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_dir() => None,
            Ok(e) => Some(e.into_path()),
            Err(err) if err.loop_ancestor().is_none() => err.path().map(Path::to_path_buf),
            Err(_) => None,
        })
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(ext))
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

/// Index a project, loading the language's stop-word list from `resources_dir`.
///
/// A missing stop-word list fails before any file is touched.
pub fn build_index(
    project: &Path,
    language: Language,
    features: &FeatureDictionary,
    resources_dir: &Path,
    remove_ifdefs: bool,
) -> Result<InvertedIndex, ConfigError> {
    let stop_words = StopWords::load(resources_dir.join(language.stopwords_file()))?;
    Ok(DocumentIndexer::new(language, &stop_words, features)
        .remove_ifdefs(remove_ifdefs)
        .build_index(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_fallback_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.c");
        fs::write(&path, [b'c', b'a', b'f', 0xE9]).unwrap();
        assert_eq!(read_source(&path).unwrap(), "caf\u{e9}");
    }

    #[test]
    fn only_language_extensions_are_walked() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/sub")).unwrap();
        fs::write(dir.path().join("src/a.c"), "x").unwrap();
        fs::write(dir.path().join("src/sub/b.c"), "x").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "x").unwrap();
        let files = source_files(dir.path(), "c");
        assert_eq!(files.len(), 2);
        assert!(source_files(dir.path(), "h").is_empty());
    }
}
