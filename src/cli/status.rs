use console::style;

use crate::adapters::LanceReader;
use crate::adapters::lance;
use crate::config::Config;
use crate::error::Result;
use crate::ports::IndexReader;

pub async fn run(config: &Config, json: bool) -> Result<()> {
    // Open against the manifest's own model so status still works when the
    // configured model differs; the mismatch is reported instead.
    let manifest = lance::read_manifest(&config.db_path)?;
    let reader = LanceReader::open(&config.db_path, &manifest.model).await?;
    let segments = reader.segment_count().await?;

    if json {
        let status = serde_json::json!({
            "db_path": config.db_path,
            "model": manifest.model,
            "dimension": manifest.dimension,
            "segments": segments,
            "built_at": manifest.built_at,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Index:     {}", config.db_path.display());
    println!(
        "Model:     {} ({} dims)",
        manifest.model, manifest.dimension
    );
    println!("Segments:  {segments}");
    println!("Built:     {}", manifest.built_at.format("%Y-%m-%d %H:%M:%S UTC"));

    if manifest.model != config.embedding.model {
        println!(
            "{}",
            style(format!(
                "Warning: configured model '{}' differs; queries will be refused until re-ingestion",
                config.embedding.model
            ))
            .yellow()
        );
    }

    Ok(())
}
