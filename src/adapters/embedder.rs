//! Local embedding inference via fastembed (ONNX runtime).

use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::config::EmbeddingConfig;
use crate::error::{DocqaError, Result};
use crate::ports::EmbeddingGenerator;

/// Known model names and their output dimensions. The name doubles as the
/// identity persisted in the index manifest, so renaming an entry here would
/// invalidate existing indices.
fn model_spec(name: &str) -> Result<(EmbeddingModel, usize)> {
    match name {
        "all-MiniLM-L6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        other => Err(DocqaError::Config(format!(
            "unsupported embedding model '{other}' (known: all-MiniLM-L6-v2, bge-small-en-v1.5)"
        ))),
    }
}

pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
    name: String,
    dimension: usize,
}

impl FastEmbedder {
    /// Load the model, downloading it on first use. Inference is blocking
    /// ONNX work, so both loading and embedding run on the blocking pool.
    pub async fn load(config: &EmbeddingConfig) -> Result<Self> {
        let (model_name, dimension) = model_spec(&config.model)?;

        info!(model = %config.model, "loading embedding model");
        let model = tokio::task::spawn_blocking(move || {
            let mut options = InitOptions::default();
            options.model_name = model_name;
            options.show_download_progress = false;
            TextEmbedding::try_new(options)
        })
        .await
        .map_err(|e| DocqaError::Embedding(format!("model load task failed: {e}")))?
        .map_err(|e| DocqaError::Embedding(format!("failed to load model: {e}")))?;

        Ok(Self {
            model: Arc::new(model),
            name: config.model.clone(),
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingGenerator for FastEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| DocqaError::Embedding("model returned no vector".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();

        let embeddings = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| DocqaError::Embedding(format!("embedding task failed: {e}")))?
            .map_err(|e| DocqaError::Embedding(e.to_string()))?;

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
