use crate::analyzer::Analyzer;
use crate::config::LemmatizerKind;
use crate::error::Result;
use crate::index::{IndexDocument, InvertedIndex};
use crate::parser::{parse_corpus_dir, ParseResult};
use crate::persist::{reset_dir, save_dictionary, save_docs, save_meta, save_postings, IndexPaths, MetaFile};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub pages: usize,
    pub aliases: usize,
    pub terms: usize,
}

/// Writes a fresh index generation. Not safe to run twice concurrently
/// against the same location.
pub struct IndexBuilder {
    analyzer: Analyzer,
}

impl IndexBuilder {
    pub fn new(kind: LemmatizerKind) -> Self {
        Self { analyzer: Analyzer::new(kind) }
    }

    /// Delete whatever lives at `location`, then index every page and every
    /// alias that redirects to a page of the corpus.
    pub fn build(&self, parsed: &ParseResult, location: &Path) -> Result<BuildStats> {
        let paths = IndexPaths::new(location);
        reset_dir(&paths)?;

        tracing::info!(pages = parsed.pages.len(), "saving pages to index");
        let mut index = InvertedIndex::new();
        let mut aliases = 0;
        // Several pages may share a title; their aliases are indexed once.
        let mut aliased: HashSet<&str> = HashSet::new();
        for page in &parsed.pages {
            index.add_document(&IndexDocument::from_page(page), &self.analyzer);
            if !aliased.insert(page.title.as_str()) {
                continue;
            }
            for alias in parsed.redirects.get(&page.title).into_iter().flatten() {
                index.add_document(&IndexDocument::alias(alias, page), &self.analyzer);
                aliases += 1;
            }
        }
        tracing::info!(num_docs = index.num_docs(), aliases, terms = index.postings.len(), "finished saving pages");

        let dictionary = save_postings(&paths, &index.postings)?;
        save_docs(&paths, &index.docs)?;
        save_dictionary(&paths, &dictionary)?;
        save_meta(&paths, &MetaFile::new(index.num_docs(), self.analyzer.kind(), index.avg_field_lengths()))?;
        tracing::info!(location = %location.display(), "index committed");

        Ok(BuildStats { pages: parsed.pages.len(), aliases, terms: dictionary.len() })
    }
}

impl Default for IndexBuilder {
    fn default() -> Self { Self::new(LemmatizerKind::default()) }
}

/// Parse a corpus directory and build the index from it.
pub fn create_index(corpus_dir: &Path, location: &Path, kind: LemmatizerKind) -> Result<BuildStats> {
    let parsed = parse_corpus_dir(corpus_dir)?;
    IndexBuilder::new(kind).build(&parsed, location)
}
