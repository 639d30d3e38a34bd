use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quiz_core::config::LemmatizerKind;
use quiz_core::create_index;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the inverted index over an encyclopedia dump", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every dump file in a directory and rebuild the index from scratch
    Build {
        /// Directory holding the dump files
        #[arg(long, default_value = "wikipedia_pages")]
        input: PathBuf,
        /// Index directory; its previous contents are deleted
        #[arg(long, default_value = "indexdir")]
        output: PathBuf,
        /// Lemmatizing strategy: lexicon or porter
        #[arg(long, default_value = "lexicon")]
        lemmatizer: LemmatizerKind,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, lemmatizer } => {
            let stats = create_index(&input, &output, lemmatizer)
                .with_context(|| format!("building index from {}", input.display()))?;
            tracing::info!(pages = stats.pages, aliases = stats.aliases, terms = stats.terms, output = %output.display(), "index build complete");
            Ok(())
        }
    }
}
