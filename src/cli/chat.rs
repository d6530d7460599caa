use std::io::Write;
use std::sync::Arc;

use console::style;

use crate::adapters::{FastEmbedder, GroqSynthesizer, LanceReader};
use crate::config::Config;
use crate::error::Result;
use crate::ports::{EmbeddingGenerator, IndexReader};
use crate::services::QueryService;

/// Interactive driver around the pure `answer_query` boundary. Setup
/// failures (missing index, missing API key) terminate the session;
/// per-question failures are reported and the loop continues.
pub async fn run(config: &Config, top_k: Option<usize>) -> Result<()> {
    let k = top_k.unwrap_or(config.retrieval.top_k);

    let embedder = Arc::new(FastEmbedder::load(&config.embedding).await?);
    let reader = Arc::new(LanceReader::open(&config.db_path, embedder.model_name()).await?);
    let service = QueryService::new(embedder, Arc::clone(&reader));
    let synthesizer = GroqSynthesizer::new(&config.synthesizer)?;

    println!(
        "{} {} segments indexed. Type 'exit' to quit.\n",
        style("Ready:").green().bold(),
        reader.segment_count().await?
    );

    let stdin = std::io::stdin();
    loop {
        print!("Query: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        println!("\n Searching documents...");
        match service.answer_query(&synthesizer, question, k).await {
            Ok(answer) => super::ask::print_answer(&answer),
            Err(e) => eprintln!("{}", style(format!(" Error: {e}")).red()),
        }
    }

    Ok(())
}
