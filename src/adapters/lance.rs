//! Persistent vector index on LanceDB.
//!
//! The index directory holds one `segments` table plus a `manifest.json`
//! recording the embedding model identity, vector dimension, and build
//! metadata. `LanceWriter::rebuild` stages the new index in a sibling
//! directory and swaps it into place, so readers never observe a
//! half-written index and a failed build leaves any prior index intact.
//! `LanceReader::open` refuses an index whose manifest names a different
//! embedding model than the one configured.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, Int64Array, RecordBatch, RecordBatchIterator,
    StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Table, connect};
use tracing::{debug, info};

use crate::domain::{IndexManifest, IndexedSegment, ScoredSegment, Segment, SegmentId};
use crate::error::{DocqaError, Result};
use crate::ports::{IndexReader, IndexWriter};

const SEGMENTS_TABLE: &str = "segments";
const MANIFEST_FILE: &str = "manifest.json";

fn segments_schema(dimension: usize) -> Arc<Schema> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let dim = dimension as i32;
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("page", DataType::Int64, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim),
            true,
        ),
    ]))
}

pub struct LanceWriter {
    db_path: PathBuf,
}

impl LanceWriter {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    async fn build_staging(
        &self,
        staging: &Path,
        manifest: &IndexManifest,
        entries: Vec<IndexedSegment>,
    ) -> Result<()> {
        let db = connect(&staging.to_string_lossy()).execute().await?;

        let schema = segments_schema(manifest.dimension);
        let batch = if entries.is_empty() {
            RecordBatch::new_empty(schema.clone())
        } else {
            segments_batch(&schema, manifest.dimension, entries)?
        };

        let table = db
            .create_table(
                SEGMENTS_TABLE,
                RecordBatchIterator::new(vec![Ok(batch)], schema),
            )
            .execute()
            .await?;
        drop(table);
        drop(db);

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        std::fs::write(staging.join(MANIFEST_FILE), manifest_json)?;

        Ok(())
    }
}

#[async_trait]
impl IndexWriter for LanceWriter {
    async fn rebuild(&self, manifest: &IndexManifest, entries: Vec<IndexedSegment>) -> Result<()> {
        for entry in &entries {
            if entry.vector.len() != manifest.dimension {
                return Err(DocqaError::Embedding(format!(
                    "segment {} has dimension {} but the index expects {}",
                    entry.segment.id,
                    entry.vector.len(),
                    manifest.dimension
                )));
            }
        }

        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file_name = self
            .db_path
            .file_name()
            .map_or_else(|| "index".to_string(), |n| n.to_string_lossy().to_string());
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let staging = self
            .db_path
            .with_file_name(format!("{file_name}.build-{}", &suffix[..8]));

        let segment_count = entries.len();
        let built = self.build_staging(&staging, manifest, entries).await;
        if let Err(e) = built {
            // A failed build must not disturb the live index.
            let _ = std::fs::remove_dir_all(&staging);
            return Err(e);
        }

        if self.db_path.exists() {
            std::fs::remove_dir_all(&self.db_path)?;
        }
        std::fs::rename(&staging, &self.db_path)?;

        info!(
            path = %self.db_path.display(),
            segments = segment_count,
            model = %manifest.model,
            "index rebuilt"
        );
        Ok(())
    }
}

fn segments_batch(
    schema: &Arc<Schema>,
    dimension: usize,
    entries: Vec<IndexedSegment>,
) -> Result<RecordBatch> {
    let mut ids = Vec::with_capacity(entries.len());
    let mut texts = Vec::with_capacity(entries.len());
    let mut sources = Vec::with_capacity(entries.len());
    let mut pages = Vec::with_capacity(entries.len());
    let mut vectors = Vec::with_capacity(entries.len());

    for entry in entries {
        ids.push(entry.segment.id.to_string());
        texts.push(entry.segment.text);
        sources.push(entry.segment.source);
        pages.push(i64::from(entry.segment.page));
        vectors.push(Some(
            entry.vector.into_iter().map(Some).collect::<Vec<_>>(),
        ));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let vector_array =
        FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(vectors, dimension as i32);

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(texts)),
            Arc::new(StringArray::from(sources)),
            Arc::new(Int64Array::from(pages)),
            Arc::new(vector_array),
        ],
    )?;
    Ok(batch)
}

/// Read the manifest persisted next to the vectors. A missing directory or
/// manifest means no valid index exists at the path.
pub fn read_manifest(db_path: &Path) -> Result<IndexManifest> {
    let manifest_path = db_path.join(MANIFEST_FILE);
    if !db_path.exists() || !manifest_path.exists() {
        return Err(DocqaError::IndexNotFound(db_path.to_path_buf()));
    }
    Ok(serde_json::from_str(&std::fs::read_to_string(
        &manifest_path,
    )?)?)
}

pub struct LanceReader {
    table: Table,
    manifest: IndexManifest,
}

impl LanceReader {
    /// Open an existing index, verifying that it was built with the
    /// configured embedding model.
    pub async fn open(db_path: &Path, expected_model: &str) -> Result<Self> {
        let manifest = read_manifest(db_path)?;

        if manifest.model != expected_model {
            return Err(DocqaError::ModelMismatch {
                indexed: manifest.model.clone(),
                configured: expected_model.to_string(),
            });
        }

        let db = connect(&db_path.to_string_lossy()).execute().await?;
        let table = db
            .open_table(SEGMENTS_TABLE)
            .execute()
            .await
            .map_err(|_| DocqaError::IndexNotFound(db_path.to_path_buf()))?;

        debug!(path = %db_path.display(), model = %manifest.model, "index opened");
        Ok(Self { table, manifest })
    }
}

#[async_trait]
impl IndexReader for LanceReader {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredSegment>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut stream = self
            .table
            .query()
            .nearest_to(query.to_vec())?
            .limit(k)
            .execute()
            .await?;

        let mut results = Vec::new();

        while let Some(batch) = stream.next().await {
            let batch = batch.map_err(|e| DocqaError::CorruptIndex(e.to_string()))?;
            let ids = string_column(&batch, "id")?;
            let texts = string_column(&batch, "text")?;
            let sources = string_column(&batch, "source")?;
            let pages = batch
                .column_by_name("page")
                .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
                .ok_or_else(|| column_error("page"))?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| column_error("_distance"))?;

            for i in 0..batch.num_rows() {
                let segment = Segment {
                    id: SegmentId::from_string(ids.value(i)),
                    text: texts.value(i).to_string(),
                    source: sources.value(i).to_string(),
                    page: u32::try_from(pages.value(i)).unwrap_or(0),
                };
                results.push(ScoredSegment {
                    segment,
                    distance: distances.value(i),
                });
            }
        }

        // Batches arrive sorted, but merging across batches keeps the
        // ascending-distance contract explicit.
        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    async fn segment_count(&self) -> Result<usize> {
        Ok(self.table.count_rows(None).await?)
    }

    fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| column_error(name))
}

fn column_error(name: &str) -> DocqaError {
    DocqaError::CorruptIndex(format!("segments table is missing column '{name}'"))
}
