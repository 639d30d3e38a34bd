use crate::analyzer::{Analyzer, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DocId = u32;

/// Fixed schema of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    /// Stored and analyzed.
    Title,
    /// Analyzed, not stored.
    Content,
    /// Stored; every category is one verbatim keyword term.
    Category,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Content, Field::Category];

    pub fn slot(self) -> usize {
        match self {
            Field::Title => 0,
            Field::Content => 1,
            Field::Category => 2,
        }
    }
}

/// A parsed article. Equality and ordering cover every field, so two records
/// built separately from identical text deduplicate in a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageRecord {
    pub title: String,
    pub categories: Vec<String>,
    pub content: String,
}

/// Canonical title -> alias titles that redirect to it.
pub type RedirectMap = BTreeMap<String, Vec<String>>;

/// Unit handed to the index writer.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocument<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub categories: &'a [String],
}

impl<'a> IndexDocument<'a> {
    pub fn from_page(page: &'a PageRecord) -> Self {
        Self { title: &page.title, content: &page.content, categories: &page.categories }
    }

    /// Stand-in document for a redirect alias: no body, the target's categories.
    pub fn alias(alias: &'a str, target: &'a PageRecord) -> Self {
        Self { title: alias, content: "", categories: &target.categories }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDoc {
    pub title: String,
    pub categories: Vec<String>,
    /// Number of indexed terms per field, in [`Field::slot`] order.
    pub field_lengths: [u32; 3],
}

impl StoredDoc {
    pub fn category_display(&self) -> String { self.categories.join(", ") }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_freq: u32,
    pub positions: Vec<u32>,
}

/// Where a term's postings live inside `postings.bin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfo {
    pub doc_freq: u32,
    pub offset: u64,
    pub len: u32,
}

pub type TermKey = (Field, String);

/// Postings and stored fields accumulated in memory during a build.
#[derive(Default)]
pub struct InvertedIndex {
    pub postings: BTreeMap<TermKey, Vec<Posting>>, // postings sorted by doc_id
    pub docs: Vec<StoredDoc>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    pub fn num_docs(&self) -> u32 { self.docs.len() as u32 }

    pub fn add_document(&mut self, doc: &IndexDocument<'_>, analyzer: &Analyzer) -> DocId {
        let doc_id = self.docs.len() as DocId;
        let mut field_lengths = [0u32; 3];

        for (field, text) in [(Field::Title, doc.title), (Field::Content, doc.content)] {
            let mut terms: BTreeMap<String, Vec<u32>> = BTreeMap::new();
            for token in analyzer.analyze(text, Mode::Index) {
                field_lengths[field.slot()] += 1;
                terms.entry(token.text).or_default().push(token.position);
            }
            self.push_terms(field, doc_id, terms);
        }

        let mut categories: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for (pos, category) in doc.categories.iter().map(|c| c.trim()).filter(|c| !c.is_empty()).enumerate() {
            field_lengths[Field::Category.slot()] += 1;
            categories.entry(category.to_string()).or_default().push(pos as u32);
        }
        self.push_terms(Field::Category, doc_id, categories);

        self.docs.push(StoredDoc {
            title: doc.title.to_string(),
            categories: doc.categories.to_vec(),
            field_lengths,
        });
        doc_id
    }

    fn push_terms(&mut self, field: Field, doc_id: DocId, terms: BTreeMap<String, Vec<u32>>) {
        for (term, positions) in terms {
            self.postings.entry((field, term)).or_default().push(Posting {
                doc_id,
                term_freq: positions.len() as u32,
                positions,
            });
        }
    }

    /// Mean indexed length of each field across all documents.
    pub fn avg_field_lengths(&self) -> [f32; 3] {
        let mut avg = [0f32; 3];
        if self.docs.is_empty() {
            return avg;
        }
        for doc in &self.docs {
            for (slot, len) in doc.field_lengths.iter().enumerate() {
                avg[slot] += *len as f32;
            }
        }
        let n = self.docs.len() as f32;
        avg.iter_mut().for_each(|a| *a /= n);
        avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, categories: &[&str], content: &str) -> PageRecord {
        PageRecord {
            title: title.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            content: content.into(),
        }
    }

    #[test]
    fn add_document_records_fields() {
        let analyzer = Analyzer::default();
        let mut idx = InvertedIndex::new();
        let p = page("Paris", &["Capitals in Europe", "Cities"], "Paris is the capital city; the city of light.");
        let id = idx.add_document(&IndexDocument::from_page(&p), &analyzer);
        assert_eq!(id, 0);

        let city = &idx.postings[&(Field::Content, "city".to_string())];
        assert_eq!(city[0].term_freq, 2);
        assert!(idx.postings.contains_key(&(Field::Title, "paris".to_string())));
        assert!(idx.postings.contains_key(&(Field::Category, "Capitals in Europe".to_string())));
        assert!(!idx.postings.contains_key(&(Field::Content, "the".to_string())));
        assert_eq!(idx.docs[0].field_lengths, [1, 5, 2]);
        assert_eq!(idx.docs[0].category_display(), "Capitals in Europe, Cities");
    }

    #[test]
    fn alias_document_shares_categories() {
        let analyzer = Analyzer::default();
        let mut idx = InvertedIndex::new();
        let p = page("United Kingdom", &["Countries"], "An island nation.");
        idx.add_document(&IndexDocument::from_page(&p), &analyzer);
        idx.add_document(&IndexDocument::alias("UK", &p), &analyzer);

        assert_eq!(idx.docs[1].title, "UK");
        assert_eq!(idx.docs[1].categories, vec!["Countries".to_string()]);
        assert_eq!(idx.docs[1].field_lengths[Field::Content.slot()], 0);
        let postings = &idx.postings[&(Field::Category, "Countries".to_string())];
        assert_eq!(postings.iter().map(|p| p.doc_id).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn identical_pages_are_equal() {
        let a = page("A", &["x"], "body");
        let b = page("A", &["x"], "body");
        let set: std::collections::BTreeSet<PageRecord> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn average_field_lengths() {
        let analyzer = Analyzer::default();
        let mut idx = InvertedIndex::new();
        assert_eq!(idx.avg_field_lengths(), [0.0; 3]);
        let a = page("One", &["c"], "alpha beta");
        let b = page("Two", &[], "gamma delta epsilon zeta");
        idx.add_document(&IndexDocument::from_page(&a), &analyzer);
        idx.add_document(&IndexDocument::from_page(&b), &analyzer);
        assert_eq!(idx.avg_field_lengths(), [1.0, 3.0, 0.5]);
    }
}
