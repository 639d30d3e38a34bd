//! Tuning defaults shared by the index builder and the query engine.

use serde::{Deserialize, Serialize};

/// Number of ranked hits inspected per query.
pub const DEFAULT_TOP_K: usize = 10;

/// Coordination factor applied to each OR group of a clue query.
///
/// A group's score is multiplied by `(1 - c) + c * matched / total`, so documents
/// matching more clauses of the group rank above documents matching fewer.
pub const DEFAULT_COORD: f32 = 0.9;

/// BM25 term frequency saturation.
pub const BM25_K1: f32 = 1.2;

/// BM25 field length normalization.
pub const BM25_B: f32 = 0.75;

/// Bumped whenever the on-disk layout changes.
pub const INDEX_FORMAT_VERSION: u32 = 2;

/// Strategy used by the lemmatizing stage of the analyzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LemmatizerKind {
    /// Dictionary lookup of base forms.
    #[default]
    Lexicon,
    /// Snowball English stemmer.
    Porter,
}

impl std::str::FromStr for LemmatizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexicon" => Ok(Self::Lexicon),
            "porter" => Ok(Self::Porter),
            other => Err(format!("unknown lemmatizer `{other}` (expected lexicon or porter)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub top_k: usize,
    pub coord: f32,
    pub k1: f32,
    pub b: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K, coord: DEFAULT_COORD, k1: BM25_K1, b: BM25_B }
    }
}
