use std::sync::Arc;

use console::style;

use crate::adapters::{FastEmbedder, GroqSynthesizer, LanceReader};
use crate::config::Config;
use crate::domain::Answer;
use crate::error::Result;
use crate::ports::EmbeddingGenerator;
use crate::services::QueryService;

pub async fn run(
    config: &Config,
    question: &str,
    top_k: Option<usize>,
    retrieve_only: bool,
    json: bool,
) -> Result<()> {
    let k = top_k.unwrap_or(config.retrieval.top_k);

    let embedder = Arc::new(FastEmbedder::load(&config.embedding).await?);
    let reader = Arc::new(LanceReader::open(&config.db_path, embedder.model_name()).await?);
    let service = QueryService::new(embedder, reader);

    if retrieve_only {
        let results = service.retrieve(question, k).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            for (rank, result) in results.iter().enumerate() {
                println!(
                    "[{}] {} (page {}, distance {:.4})",
                    rank + 1,
                    result.segment.source,
                    result.segment.page + 1,
                    result.distance
                );
                println!("    {}\n", result.segment.text.replace('\n', " "));
            }
        }
        return Ok(());
    }

    let synthesizer = GroqSynthesizer::new(&config.synthesizer)?;
    let answer = service.answer_query(&synthesizer, question, k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        print_answer(&answer);
    }

    Ok(())
}

pub fn print_answer(answer: &Answer) {
    println!("\n{} {}\n", style("Agent:").green().bold(), answer.text);
    println!("--- Sources ---");
    for citation in &answer.citations {
        println!("{citation}");
    }
    println!("{}\n", "-".repeat(20));
}
