use async_trait::async_trait;

use crate::domain::{IndexManifest, IndexedSegment, ScoredSegment};
use crate::error::Result;

/// Write side of the persistent vector index. `rebuild` replaces the entire
/// store: a failed rebuild must leave any prior index untouched, and
/// concurrent readers must never observe a half-written state.
#[async_trait]
pub trait IndexWriter: Send + Sync {
    async fn rebuild(&self, manifest: &IndexManifest, entries: Vec<IndexedSegment>) -> Result<()>;
}

/// Read side of the index: nearest-neighbor search over the persisted
/// vectors. An open reader is pinned to the manifest captured at open time.
#[async_trait]
pub trait IndexReader: Send + Sync {
    /// Up to `k` nearest segments, ordered ascending by distance. An empty
    /// index yields an empty result, not an error.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredSegment>>;

    async fn segment_count(&self) -> Result<usize>;

    fn manifest(&self) -> &IndexManifest;
}
