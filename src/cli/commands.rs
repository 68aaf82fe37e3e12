use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "finsent", about = "Financial news sentiment: FinBERT with an LLM fallback chain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single piece of text
    Analyze {
        text: String,
        /// Article category (repeatable), e.g. earnings, m&a, regulatory
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Force LLM escalation regardless of FinBERT confidence
        #[arg(long)]
        important: bool,
        /// Ask the LLM chain directly with this context, skipping FinBERT
        #[arg(long)]
        context: Option<String>,
    },
    /// Analyze a JSON array of articles (title, summary, symbols, categories, published_at)
    Batch {
        /// Path to the JSON file, or - for stdin
        file: PathBuf,
        /// Print per-symbol aggregates instead of per-article results
        #[arg(long)]
        aggregate: bool,
    },
    /// Show the LLM providers in priority order and whether each has a key
    Providers,
}
