//! Ranked retrieval over a committed index.

use crate::analyzer::{Analyzer, Mode};
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::index::{DocId, Field, Posting, StoredDoc, TermInfo};
use crate::metrics::RankOutcome;
use crate::persist::{load_postings, open_snapshot, Dictionary, IndexPaths, MetaFile};
use crate::query::{ClueQuery, MultiFieldParser};
use ordered_float::OrderedFloat;
use parking_lot::Mutex;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use std::fs::File;
use std::path::Path;

const NOT_FOUND: &str = "Not found";

/// Read-only view of one committed index generation. Everything but the
/// postings is loaded at open time, and the postings file handle stays open,
/// so the view survives a later rebuild of the same location.
pub struct IndexReader {
    meta: MetaFile,
    dictionary: Dictionary,
    docs: Vec<StoredDoc>,
    postings: Mutex<File>,
    analyzer: Analyzer,
}

impl IndexReader {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let snapshot = open_snapshot(&IndexPaths::new(root))?;
        let analyzer = Analyzer::new(snapshot.meta.lemmatizer);
        Ok(Self {
            meta: snapshot.meta,
            dictionary: snapshot.dictionary,
            docs: snapshot.docs,
            postings: Mutex::new(snapshot.postings),
            analyzer,
        })
    }

    pub fn num_docs(&self) -> u32 { self.meta.num_docs }

    pub fn analyzer(&self) -> &Analyzer { &self.analyzer }

    pub fn doc(&self, doc_id: DocId) -> Option<&StoredDoc> { self.docs.get(doc_id as usize) }

    pub fn term_info(&self, field: Field, term: &str) -> Option<&TermInfo> {
        self.dictionary.get(&(field, term.to_string()))
    }

    pub fn postings(&self, field: Field, term: &str) -> Result<Vec<Posting>> {
        match self.term_info(field, term) {
            Some(info) => load_postings(&mut self.postings.lock(), info),
            None => Ok(Vec::new()),
        }
    }

    /// Score every document matching `query` and return the best `config.top_k`.
    pub fn search(&self, query: &ClueQuery, config: &SearchConfig) -> Result<Vec<Hit>> {
        let mut totals: HashMap<DocId, f32> = HashMap::new();
        for group in query.groups.iter().filter(|g| !g.is_empty()) {
            let mut group_scores: HashMap<DocId, (f32, usize)> = HashMap::new();
            for clause in &group.clauses {
                let mut clause_scores: HashMap<DocId, f32> = HashMap::new();
                for tq in &clause.terms {
                    let Some(info) = self.term_info(tq.field, &tq.term) else { continue };
                    let term_idf = idf(self.meta.num_docs, info.doc_freq);
                    let avg_len = self.meta.avg_field_lengths[tq.field.slot()];
                    let postings = load_postings(&mut self.postings.lock(), info)?;
                    for p in postings {
                        let doc = self
                            .doc(p.doc_id)
                            .ok_or_else(|| Error::Corrupt(format!("posting for unknown doc {}", p.doc_id)))?;
                        let field_len = doc.field_lengths[tq.field.slot()] as f32;
                        *clause_scores.entry(p.doc_id).or_insert(0.0) +=
                            bm25(term_idf, p.term_freq as f32, field_len, avg_len, config);
                    }
                }
                for (doc_id, score) in clause_scores {
                    let entry = group_scores.entry(doc_id).or_insert((0.0, 0));
                    entry.0 += score;
                    entry.1 += 1;
                }
            }
            for (doc_id, (score, matched)) in group_scores {
                *totals.entry(doc_id).or_insert(0.0) += score * group.coordination(matched);
            }
        }
        Ok(self.top_k(totals, config.top_k))
    }

    fn top_k(&self, scores: HashMap<DocId, f32>, k: usize) -> Vec<Hit> {
        if k == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Reverse<Candidate<'_>>> = BinaryHeap::with_capacity(k + 1);
        for (doc_id, score) in scores {
            let Some(doc) = self.doc(doc_id) else { continue };
            heap.push(Reverse(Candidate { score: OrderedFloat(score), title: &doc.title, doc_id }));
            if heap.len() > k {
                heap.pop();
            }
        }
        let mut best: Vec<Candidate<'_>> = heap.into_iter().map(|Reverse(c)| c).collect();
        best.sort_unstable_by(|a, b| b.cmp(a));
        best.into_iter()
            .map(|c| Hit { doc_id: c.doc_id, score: c.score.0, title: c.title.to_string() })
            .collect()
    }
}

/// Ordering: higher score first, then title ascending, then doc id ascending.
#[derive(PartialEq, Eq)]
struct Candidate<'a> {
    score: OrderedFloat<f32>,
    title: &'a str,
    doc_id: DocId,
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.title.cmp(self.title))
            .then_with(|| other.doc_id.cmp(&self.doc_id))
    }
}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub doc_id: DocId,
    pub score: f32,
    pub title: String,
}

fn idf(num_docs: u32, doc_freq: u32) -> f32 {
    (num_docs as f32 / (doc_freq as f32 + 1.0)).ln() + 1.0
}

fn bm25(idf: f32, tf: f32, field_len: f32, avg_len: f32, config: &SearchConfig) -> f32 {
    let norm = if avg_len > 0.0 { field_len / avg_len } else { 1.0 };
    idf * (tf * (config.k1 + 1.0)) / (tf + config.k1 * (1.0 - config.b + config.b * norm))
}

/// One trivia question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub category: String,
    pub clue: String,
    /// Raw answer line, `|`-separated alternatives.
    pub answer: String,
    pub admissible_answers: BTreeSet<String>,
}

impl QueryRecord {
    pub fn new(category: &str, clue: &str, answer: &str) -> Self {
        Self {
            category: category.to_string(),
            clue: clue.to_string(),
            answer: answer.to_string(),
            admissible_answers: answer.split('|').map(str::to_string).collect(),
        }
    }
}

/// Drop any parenthetical qualifier and embedded double quotes.
pub fn normalize_category(category: &str) -> String {
    category.split('(').next().unwrap_or_default().trim().replace('"', "")
}

/// Answers questions against one pooled reader.
pub struct QueryRunner {
    reader: IndexReader,
    config: SearchConfig,
}

impl QueryRunner {
    pub fn open<P: AsRef<Path>>(index: P, config: SearchConfig) -> Result<Self> {
        Ok(Self { reader: IndexReader::open(index)?, config })
    }

    pub fn reader(&self) -> &IndexReader { &self.reader }

    pub fn build_query(&self, category: &str, clue: &str) -> ClueQuery {
        let clue = self.reader.analyzer().normalize(clue, Mode::Query);
        let category = normalize_category(category);
        let parser = MultiFieldParser::new(&[Field::Content, Field::Category], self.reader.analyzer(), self.config.coord);
        parser.parse(&[clue.as_str(), category.as_str()])
    }

    /// Rank of the first hit whose title is an admissible answer, or
    /// [`RankOutcome::NOT_FOUND`] when none of the top hits is.
    pub fn run_single_query(&self, record: &QueryRecord) -> Result<RankOutcome> {
        let query = self.build_query(&record.category, &record.clue);
        let hits = self.reader.search(&query, &self.config)?;
        let found = hits
            .iter()
            .enumerate()
            .find(|(_, hit)| record.admissible_answers.contains(&hit.title));

        let (outcome, answer) = match found {
            Some((i, hit)) => (RankOutcome::found(i + 1), hit.title.as_str()),
            None => (RankOutcome::NOT_FOUND, NOT_FOUND),
        };
        tracing::info!(
            clue = %record.clue,
            category = %record.category,
            expected = %record.answer,
            answer,
            rank = outcome.rank(),
            "query evaluated"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_loses_qualifier_and_quotes() {
        assert_eq!(normalize_category("\"CAPITAL\" CITIES (Alex: not countries)"), "CAPITAL CITIES");
        assert_eq!(normalize_category("Rivers"), "Rivers");
        assert_eq!(normalize_category("(only a qualifier)"), "");
    }

    #[test]
    fn answers_split_on_pipe() {
        let r = QueryRecord::new("c", "q", "Paris|Paris, France");
        assert_eq!(r.admissible_answers.len(), 2);
        assert!(r.admissible_answers.contains("Paris, France"));
    }

    #[test]
    fn rarer_terms_weigh_more() {
        assert!(idf(100, 1) > idf(100, 50));
        assert!(idf(10, 10) > 0.0);
    }

    #[test]
    fn bm25_saturates_and_normalizes_length() {
        let cfg = SearchConfig::default();
        assert!(bm25(1.0, 2.0, 10.0, 10.0, &cfg) > bm25(1.0, 1.0, 10.0, 10.0, &cfg));
        assert!(bm25(1.0, 1.0, 5.0, 10.0, &cfg) > bm25(1.0, 1.0, 20.0, 10.0, &cfg));
        assert!(bm25(1.0, 100.0, 10.0, 10.0, &cfg) < cfg.k1 + 1.0);
    }

    #[test]
    fn candidate_ties_break_on_title() {
        let a = Candidate { score: OrderedFloat(1.0), title: "Alpha", doc_id: 9 };
        let b = Candidate { score: OrderedFloat(1.0), title: "Beta", doc_id: 0 };
        let c = Candidate { score: OrderedFloat(2.0), title: "Zeta", doc_id: 5 };
        let mut v = vec![&b, &a, &c];
        v.sort_by(|x, y| y.cmp(x));
        assert_eq!(v.iter().map(|c| c.title).collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Beta"]);
    }
}
