//! Index building: extract pages, chunk, embed, and atomically replace the
//! persisted index. Any failure before the final write leaves a prior index
//! untouched, because nothing touches the store until every segment has an
//! embedding.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::chunker;
use crate::config::ChunkConfig;
use crate::domain::{IndexManifest, IndexStats, IndexedSegment};
use crate::error::{DocqaError, Result};
use crate::ports::{EmbeddingGenerator, IndexWriter, PageSource};

/// Segments embedded per model invocation.
const EMBED_BATCH_SIZE: usize = 32;

pub struct IngestionService<P, E, W>
where
    P: PageSource,
    E: EmbeddingGenerator,
    W: IndexWriter,
{
    pages: Arc<P>,
    embedder: Arc<E>,
    writer: Arc<W>,
}

impl<P, E, W> IngestionService<P, E, W>
where
    P: PageSource,
    E: EmbeddingGenerator,
    W: IndexWriter,
{
    pub const fn new(pages: Arc<P>, embedder: Arc<E>, writer: Arc<W>) -> Self {
        Self {
            pages,
            embedder,
            writer,
        }
    }

    /// Rebuild the whole index from one document. Re-ingesting replaces any
    /// previously indexed content; this pipeline has no incremental mode.
    pub async fn rebuild(&self, document: &Path, chunking: &ChunkConfig) -> Result<IndexStats> {
        self.rebuild_with_progress(document, chunking, |_, _| {}).await
    }

    /// Like [`Self::rebuild`], reporting `(embedded, total)` after each
    /// embedding batch.
    pub async fn rebuild_with_progress<F>(
        &self,
        document: &Path,
        chunking: &ChunkConfig,
        progress: F,
    ) -> Result<IndexStats>
    where
        F: Fn(usize, usize),
    {
        chunking.validate()?;

        let pages = self.pages.extract(document)?;
        let page_count = pages.len();

        let segments = chunker::split(&pages, chunking)?;
        let segment_count = segments.len();
        info!(
            document = %document.display(),
            pages = page_count,
            segments = segment_count,
            "document chunked"
        );

        let mut entries = Vec::with_capacity(segment_count);
        for batch in segments.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|s| s.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(DocqaError::Embedding(format!(
                    "model returned {} vectors for {} segments",
                    vectors.len(),
                    batch.len()
                )));
            }
            entries.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(vectors)
                    .map(|(segment, vector)| IndexedSegment { segment, vector }),
            );
            progress(entries.len(), segment_count);
        }

        let manifest = IndexManifest::new(
            self.embedder.model_name(),
            self.embedder.dimension(),
            entries.len(),
        );
        self.writer.rebuild(&manifest, entries).await?;

        Ok(IndexStats {
            pages: page_count,
            segments: segment_count,
        })
    }
}
