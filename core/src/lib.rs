//! Trivia answering by ranked retrieval over an encyclopedia dump.
//!
//! Build time: [`parser`] turns dump files into page records, [`builder`] writes
//! them into an on-disk inverted index through the [`analyzer`] pipeline.
//! Query time: [`search`] analyzes a clue, runs a two-field OR query and reports
//! the rank of the expected answer, which [`metrics`] aggregates into MRR.

pub mod analyzer;
pub mod builder;
pub mod config;
pub mod error;
pub mod index;
pub mod lemma;
pub mod metrics;
pub mod parser;
pub mod persist;
pub mod query;
pub mod search;
pub mod tokenizer;

pub use analyzer::{Analyzer, Mode, Token};
pub use builder::{create_index, BuildStats, IndexBuilder};
pub use config::{LemmatizerKind, SearchConfig};
pub use error::{Error, Result};
pub use index::{DocId, Field, IndexDocument, InvertedIndex, PageRecord, Posting, RedirectMap, StoredDoc};
pub use metrics::{mean_reciprocal_rank, EvaluationSummary, RankOutcome};
pub use parser::ParseResult;
pub use search::{Hit, IndexReader, QueryRecord, QueryRunner};
