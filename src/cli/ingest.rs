use std::path::Path;
use std::sync::Arc;

use console::style;
use indicatif::ProgressBar;

use crate::adapters::{FastEmbedder, LanceWriter, PdfPageSource};
use crate::config::Config;
use crate::error::Result;
use crate::services::IngestionService;

pub async fn run(
    config: &Config,
    file: &Path,
    chunk_size: Option<usize>,
    overlap: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut chunking = config.chunking;
    if let Some(size) = chunk_size {
        chunking.max_size = size;
    }
    if let Some(overlap) = overlap {
        chunking.overlap = overlap;
    }
    chunking.validate()?;

    if !json {
        println!("Loading embedding model {}...", style(&config.embedding.model).cyan());
    }
    let embedder = Arc::new(FastEmbedder::load(&config.embedding).await?);
    let writer = Arc::new(LanceWriter::new(&config.db_path));
    let service = IngestionService::new(Arc::new(PdfPageSource), embedder, writer);

    let bar = if json {
        ProgressBar::hidden()
    } else {
        println!("Ingesting {}...", style(file.display()).cyan());
        ProgressBar::new(0)
    };

    let stats = service
        .rebuild_with_progress(file, &chunking, |embedded, total| {
            bar.set_length(total as u64);
            bar.set_position(embedded as u64);
        })
        .await?;
    bar.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "{} {} pages, {} segments indexed at {}",
            style("Done:").green().bold(),
            stats.pages,
            stats.segments,
            config.db_path.display()
        );
    }

    Ok(())
}
