use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

mod ask;
mod chat;
mod ingest;
mod status;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "Question answering over a local PDF corpus")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, global = true, help = "Index directory (overrides config)")]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Extract, chunk, embed, and index a PDF document")]
    Ingest {
        #[arg(help = "Path to the PDF document")]
        file: PathBuf,

        #[arg(long, help = "Maximum segment size in characters")]
        chunk_size: Option<usize>,

        #[arg(long, help = "Characters shared between consecutive segments")]
        overlap: Option<usize>,
    },

    #[command(about = "Answer a single question against the index")]
    Ask {
        #[arg(help = "Question to answer")]
        question: String,

        #[arg(long, help = "Number of segments to retrieve")]
        top_k: Option<usize>,

        #[arg(long, help = "Print retrieved segments instead of calling the model")]
        retrieve_only: bool,
    },

    #[command(about = "Interactive question-answering session")]
    Chat {
        #[arg(long, help = "Number of segments to retrieve per question")]
        top_k: Option<usize>,
    },

    #[command(about = "Show index statistics")]
    Status,
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }

    match cli.command {
        Commands::Ingest {
            file,
            chunk_size,
            overlap,
        } => ingest::run(&config, &file, chunk_size, overlap, cli.json).await,
        Commands::Ask {
            question,
            top_k,
            retrieve_only,
        } => ask::run(&config, &question, top_k, retrieve_only, cli.json).await,
        Commands::Chat { top_k } => chat::run(&config, top_k).await,
        Commands::Status => status::run(&config, cli.json).await,
    }
}
