//! Query-time retrieval and answer assembly.
//!
//! `retrieve` embeds the question with the same model the index was built
//! with and returns the nearest segments. `answer_query` is the pure
//! question-in, answer-out boundary: the interactive read loop lives in the
//! CLI driver, not here.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Answer, ScoredSegment, citation};
use crate::error::Result;
use crate::ports::{AnswerSynthesizer, EmbeddingGenerator, IndexReader};

pub struct QueryService<E, I>
where
    E: EmbeddingGenerator,
    I: IndexReader,
{
    embedder: Arc<E>,
    index: Arc<I>,
}

impl<E, I> QueryService<E, I>
where
    E: EmbeddingGenerator,
    I: IndexReader,
{
    pub const fn new(embedder: Arc<E>, index: Arc<I>) -> Self {
        Self { embedder, index }
    }

    /// Top-k nearest segments for a question, ascending by distance.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<ScoredSegment>> {
        let embedding = self.embedder.embed(question).await?;
        let results = self.index.search(&embedding, k).await?;
        debug!(k, hits = results.len(), "retrieval complete");
        Ok(results)
    }

    /// Answer a question: retrieve, assemble context in rank order, hand it
    /// to the synthesizer, and reconcile citations from the sources used.
    pub async fn answer_query<S>(&self, synthesizer: &S, question: &str, k: usize) -> Result<Answer>
    where
        S: AnswerSynthesizer,
    {
        let sources = self.retrieve(question, k).await?;
        let context = assemble_context(&sources);
        let text = synthesizer.synthesize(&context, question).await?;
        let citations = citation::reconcile(&sources);

        Ok(Answer {
            text,
            citations,
            sources,
        })
    }
}

/// Concatenate retrieved segment texts in retrieval rank order.
fn assemble_context(sources: &[ScoredSegment]) -> String {
    sources
        .iter()
        .map(|s| s.segment.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{IndexedSegment, Segment};
    use crate::error::DocqaError;
    use crate::testing::{MemoryIndex, StubEmbedder, StubSynthesizer};

    fn indexed(text: &str, source: &str, page: u32, vector: Vec<f32>) -> IndexedSegment {
        IndexedSegment {
            segment: Segment::new(text, source, page),
            vector,
        }
    }

    fn three_segment_service() -> QueryService<StubEmbedder, MemoryIndex> {
        let index = MemoryIndex::with_entries(
            3,
            vec![
                indexed("near", "report.pdf", 4, vec![1.0, 0.0, 0.0]),
                indexed("mid", "report.pdf", 4, vec![0.5, 0.5, 0.0]),
                indexed("far", "notes.pdf", 0, vec![0.0, 0.0, 1.0]),
            ],
        );
        let embedder = StubEmbedder::new(3).with("question", vec![1.0, 0.0, 0.0]);
        QueryService::new(Arc::new(embedder), Arc::new(index))
    }

    #[tokio::test]
    async fn retrieval_orders_by_ascending_distance() {
        let service = three_segment_service();
        let results = service.retrieve("question", 3).await.unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.segment.text.as_str()).collect();
        assert_eq!(texts, vec!["near", "mid", "far"]);
    }

    #[tokio::test]
    async fn retrieval_is_deterministic() {
        let service = three_segment_service();
        let first = service.retrieve("question", 3).await.unwrap();
        let second = service.retrieve("question", 3).await.unwrap();
        let ids = |results: &[ScoredSegment]| {
            results
                .iter()
                .map(|r| r.segment.id.to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn k_bounds_the_result_count() {
        let service = three_segment_service();
        assert_eq!(service.retrieve("question", 2).await.unwrap().len(), 2);
        // More than the index holds: all segments, no error.
        assert_eq!(service.retrieve("question", 10).await.unwrap().len(), 3);
        assert!(service.retrieve("question", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn context_follows_retrieval_rank() {
        let service = three_segment_service();
        let answer = service
            .answer_query(&StubSynthesizer, "question", 3)
            .await
            .unwrap();
        assert_eq!(answer.text, "Q[question] CTX[near\n\nmid\n\nfar]");
    }

    #[tokio::test]
    async fn citations_are_deduplicated_in_rank_order() {
        // "near" and "mid" share (report.pdf, page 4) and collapse to one
        // citation, displayed 1-based.
        let service = three_segment_service();
        let answer = service
            .answer_query(&StubSynthesizer, "question", 3)
            .await
            .unwrap();
        let displays: Vec<&str> = answer.citations.iter().map(|c| c.display.as_str()).collect();
        assert_eq!(displays, vec![" report.pdf (Page 5)", " notes.pdf (Page 1)"]);
    }

    #[tokio::test]
    async fn embedding_errors_propagate_unchanged() {
        let index = MemoryIndex::new(3);
        let embedder = StubEmbedder::new(3).failing_on("question");
        let service = QueryService::new(Arc::new(embedder), Arc::new(index));

        let err = service.retrieve("question", 3).await.unwrap_err();
        assert!(matches!(err, DocqaError::Embedding(_)));
    }

    #[tokio::test]
    async fn empty_index_yields_empty_answer_sources() {
        let index = MemoryIndex::new(3);
        let service = QueryService::new(Arc::new(StubEmbedder::new(3)), Arc::new(index));
        let answer = service
            .answer_query(&StubSynthesizer, "anything", 7)
            .await
            .unwrap();
        assert!(answer.sources.is_empty());
        assert!(answer.citations.is_empty());
    }
}
