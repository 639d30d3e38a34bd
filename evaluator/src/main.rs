use anyhow::Result;
use clap::Parser;
use evaluator::{evaluate, read_questions, report};
use quiz_core::config::{SearchConfig, DEFAULT_COORD, DEFAULT_TOP_K};
use quiz_core::QueryRunner;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "evaluator")]
#[command(about = "Answer every question of a file against the index and report MRR")]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "indexdir")]
    index: PathBuf,
    /// Question file
    #[arg(long, default_value = "questions.txt")]
    questions: PathBuf,
    /// Number of hits inspected per question
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
    /// Coordination factor of the OR groups
    #[arg(long, default_value_t = DEFAULT_COORD)]
    coord: f32,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = SearchConfig { top_k: args.top_k, coord: args.coord, ..SearchConfig::default() };

    let runner = QueryRunner::open(&args.index, config)?;
    let questions = read_questions(&args.questions)?;
    tracing::info!(questions = questions.len(), index = %args.index.display(), "running questions");

    let summary = evaluate(&runner, &questions)?;
    println!("{}", report(&summary));
    Ok(())
}
