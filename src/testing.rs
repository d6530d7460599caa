//! Deterministic test doubles for the service layer: a canned page source,
//! an embedder with table-driven vectors, and an in-memory index with
//! brute-force distance ranking.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{IndexManifest, IndexedSegment, Page, ScoredSegment};
use crate::error::{DocqaError, Result};
use crate::ports::{AnswerSynthesizer, EmbeddingGenerator, IndexReader, IndexWriter, PageSource};

pub struct StubPages(pub Vec<Page>);

impl PageSource for StubPages {
    fn extract(&self, _path: &Path) -> Result<Vec<Page>> {
        Ok(self.0.clone())
    }
}

pub struct StubEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
    fail_on: Option<String>,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: HashMap::new(),
            fail_on: None,
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    fn lookup(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail_on.as_deref() == Some(text) {
            return Err(DocqaError::Embedding(format!("stub failure on '{text}'")));
        }
        Ok(self.vectors.get(text).cloned().unwrap_or_else(|| {
            // Deterministic fallback so unregistered texts still embed.
            let mut vector = vec![0.0; self.dimension];
            for (i, byte) in text.bytes().enumerate() {
                vector[(i + byte as usize) % self.dimension] += 1.0;
            }
            vector
        }))
    }
}

#[async_trait]
impl EmbeddingGenerator for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.lookup(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.lookup(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }
}

pub struct MemoryIndex {
    manifest: IndexManifest,
    pub entries: Mutex<Vec<IndexedSegment>>,
    pub rebuilds: Mutex<usize>,
}

impl MemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            manifest: IndexManifest::new("stub-embedder", dimension, 0),
            entries: Mutex::new(Vec::new()),
            rebuilds: Mutex::new(0),
        }
    }

    pub fn with_entries(dimension: usize, entries: Vec<IndexedSegment>) -> Self {
        let index = Self::new(dimension);
        *index.entries.lock().unwrap() = entries;
        index
    }

    pub fn rebuild_count(&self) -> usize {
        *self.rebuilds.lock().unwrap()
    }
}

#[async_trait]
impl IndexWriter for MemoryIndex {
    async fn rebuild(&self, _manifest: &IndexManifest, entries: Vec<IndexedSegment>) -> Result<()> {
        *self.entries.lock().unwrap() = entries;
        *self.rebuilds.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait]
impl IndexReader for MemoryIndex {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredSegment>> {
        let entries = self.entries.lock().unwrap();
        let mut scored: Vec<ScoredSegment> = entries
            .iter()
            .map(|entry| ScoredSegment {
                segment: entry.segment.clone(),
                distance: l2_distance(query, &entry.vector),
            })
            .collect();
        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn segment_count(&self) -> Result<usize> {
        Ok(self.entries.lock().unwrap().len())
    }

    fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

pub struct StubSynthesizer;

#[async_trait]
impl AnswerSynthesizer for StubSynthesizer {
    async fn synthesize(&self, context: &str, question: &str) -> Result<String> {
        Ok(format!("Q[{question}] CTX[{context}]"))
    }
}
