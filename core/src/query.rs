//! Query model and the multi-field parser that builds it from free text.

use crate::analyzer::{Analyzer, Mode};
use crate::index::Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermQuery {
    pub field: Field,
    pub term: String,
}

/// One query word: matches when any of its field terms matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub terms: Vec<TermQuery>,
}

/// Optional clauses combined with a coordination factor.
#[derive(Debug, Clone, PartialEq)]
pub struct OrGroup {
    pub clauses: Vec<Clause>,
    pub coord: f32,
}

impl OrGroup {
    /// Score multiplier for a document matching `matched` of the group's clauses.
    pub fn coordination(&self, matched: usize) -> f32 {
        if self.clauses.is_empty() {
            return 0.0;
        }
        (1.0 - self.coord) + self.coord * matched as f32 / self.clauses.len() as f32
    }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }
}

/// `(group) OR (group) ...`; a document scores the sum of its group scores.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClueQuery {
    pub groups: Vec<OrGroup>,
}

impl ClueQuery {
    pub fn is_empty(&self) -> bool { self.groups.iter().all(OrGroup::is_empty) }
}

/// Parses text against several fields at once. Analyzed fields run each word
/// through the analyzer in query mode; the category field takes words verbatim.
pub struct MultiFieldParser<'a> {
    fields: Vec<Field>,
    analyzer: &'a Analyzer,
    coord: f32,
}

impl<'a> MultiFieldParser<'a> {
    pub fn new(fields: &[Field], analyzer: &'a Analyzer, coord: f32) -> Self {
        Self { fields: fields.to_vec(), analyzer, coord }
    }

    pub fn parse_group(&self, text: &str) -> OrGroup {
        let clauses = text
            .split_whitespace()
            .map(|word| self.clause(word))
            .filter(|c| !c.terms.is_empty())
            .collect();
        OrGroup { clauses, coord: self.coord }
    }

    /// Every part becomes one group of the resulting query.
    pub fn parse(&self, parts: &[&str]) -> ClueQuery {
        ClueQuery { groups: parts.iter().map(|p| self.parse_group(p)).filter(|g| !g.is_empty()).collect() }
    }

    fn clause(&self, word: &str) -> Clause {
        let mut terms: Vec<TermQuery> = Vec::new();
        for &field in &self.fields {
            let field_terms = match field {
                Field::Category => vec![word.to_string()],
                Field::Title | Field::Content => self.analyzer.terms(word, Mode::Query),
            };
            for term in field_terms {
                let tq = TermQuery { field, term };
                if !terms.contains(&tq) {
                    terms.push(tq);
                }
            }
        }
        Clause { terms }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_become_clauses_over_both_fields() {
        let analyzer = Analyzer::default();
        let parser = MultiFieldParser::new(&[Field::Content, Field::Category], &analyzer, 0.9);
        let group = parser.parse_group("Rivers Cities");
        assert_eq!(group.clauses.len(), 2);
        assert_eq!(group.clauses[0].terms, vec![
            TermQuery { field: Field::Content, term: "river".into() },
            TermQuery { field: Field::Category, term: "Rivers".into() },
        ]);
    }

    #[test]
    fn stopwords_still_reach_the_keyword_field() {
        let analyzer = Analyzer::default();
        let parser = MultiFieldParser::new(&[Field::Content, Field::Category], &analyzer, 0.9);
        let group = parser.parse_group("the");
        assert_eq!(group.clauses[0].terms, vec![TermQuery { field: Field::Category, term: "the".into() }]);

        let content_only = MultiFieldParser::new(&[Field::Content], &analyzer, 0.9);
        assert!(content_only.parse_group("the of and").is_empty());
    }

    #[test]
    fn coordination_rewards_more_matches() {
        let clause = Clause { terms: vec![TermQuery { field: Field::Content, term: "x".into() }] };
        let group = OrGroup { clauses: vec![clause.clone(), clause.clone(), clause.clone(), clause], coord: 0.9 };
        assert!((group.coordination(4) - 1.0).abs() < 1e-6);
        assert!((group.coordination(1) - 0.325).abs() < 1e-6);
        assert!(group.coordination(2) > group.coordination(1));
    }

    #[test]
    fn empty_parts_are_dropped() {
        let analyzer = Analyzer::default();
        let parser = MultiFieldParser::new(&[Field::Content, Field::Category], &analyzer, 0.9);
        let q = parser.parse(&["paris capital", ""]);
        assert_eq!(q.groups.len(), 1);
        assert!(!q.is_empty());
        assert!(parser.parse(&["", "  "]).is_empty());
    }
}
