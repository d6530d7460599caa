use async_trait::async_trait;

use crate::error::Result;

/// Maps text to a fixed-dimension vector. Deterministic per (text, model):
/// the same model identity must be used at index-build time and query time,
/// which the index manifest enforces.
#[async_trait]
pub trait EmbeddingGenerator: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed many texts in one call. Implementations may batch or
    /// parallelize internally; segment order in the output must match the
    /// input.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}
