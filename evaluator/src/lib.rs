//! Runs a question file against an index and scores the result.

use anyhow::Result;
use lazy_static::lazy_static;
use quiz_core::metrics::HISTOGRAM_SLOTS;
use quiz_core::{EvaluationSummary, QueryRecord, QueryRunner, RankOutcome};
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[.,:;!?-]").expect("valid regex");
}

/// Questions are blank-line separated blocks of category, clue and answer
/// lines. Shorter blocks are skipped.
pub fn parse_questions(text: &str) -> Vec<QueryRecord> {
    let text = text.replace("\r\n", "\n");
    let mut questions = Vec::new();
    for block in text.trim().split("\n\n") {
        let lines: Vec<&str> = block.split('\n').collect();
        if lines.len() < 3 {
            tracing::warn!(block, "skipping malformed question");
            continue;
        }
        let category = PUNCTUATION.replace_all(lines[0].trim(), "");
        let clue = PUNCTUATION.replace_all(lines[1].trim(), "");
        questions.push(QueryRecord::new(&category, &clue, lines[2].trim()));
    }
    questions
}

pub fn read_questions(path: &Path) -> Result<Vec<QueryRecord>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_questions(&text))
}

pub fn evaluate(runner: &QueryRunner, questions: &[QueryRecord]) -> Result<EvaluationSummary> {
    let ranks = questions
        .iter()
        .map(|q| runner.run_single_query(q))
        .collect::<quiz_core::Result<Vec<RankOutcome>>>()?;
    Ok(EvaluationSummary::from_ranks(&ranks)?)
}

pub fn report(summary: &EvaluationSummary) -> String {
    debug_assert_eq!(summary.histogram.len(), HISTOGRAM_SLOTS);
    format!(
        "The MRR is: {:.3}\nThe correct number of top positions: {}/{}\nThe top 10 answer ranks: {:?}",
        summary.mrr, summary.top1, summary.total, summary.histogram
    )
}
