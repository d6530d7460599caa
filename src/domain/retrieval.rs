use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Citation, Segment};

/// A segment paired with its embedding, as persisted in the index. Owned by
/// the index from build time until the next full rebuild.
#[derive(Debug, Clone)]
pub struct IndexedSegment {
    pub segment: Segment,
    pub vector: Vec<f32>,
}

/// One retrieval hit. Lower distance means more similar; result lists are
/// ordered ascending by distance.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredSegment {
    pub segment: Segment,
    pub distance: f32,
}

/// Index-level metadata persisted alongside the vectors. The embedding model
/// recorded here must match the query-time model; `LanceReader::open`
/// rejects the index otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexManifest {
    pub model: String,
    pub dimension: usize,
    pub segment_count: usize,
    pub built_at: DateTime<Utc>,
}

impl IndexManifest {
    pub fn new(model: impl Into<String>, dimension: usize, segment_count: usize) -> Self {
        Self {
            model: model.into(),
            dimension,
            segment_count,
            built_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndexStats {
    pub pages: usize,
    pub segments: usize,
}

/// The result of answering one question: the synthesized text plus the
/// retrieved segments it was grounded on and their deduplicated citations.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,
    #[serde(skip)]
    pub sources: Vec<ScoredSegment>,
}
