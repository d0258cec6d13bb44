use crate::embedding::Embedder;
use crate::error::{Result, TrdError};
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata content is capped, as the original store capped payload size.
const MAX_CONTENT_LEN: usize = 5000;

// ---------------------------------------------------------------------------
// VectorRecord / SearchHit
// ---------------------------------------------------------------------------

/// One embedded chunk in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub document_id: String,
    pub document_name: String,
    pub content: String,
    pub lob: String,
    pub source: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub document_id: String,
    pub document_name: String,
    pub content: String,
    pub score: f32,
    pub lob: String,
}

// ---------------------------------------------------------------------------
// VectorIndex
// ---------------------------------------------------------------------------

/// File-backed vector index: JSON rows on disk, brute-force cosine search
/// in memory. The trait seams above it (embedder, writer) are where a
/// managed store would plug in.
#[derive(Debug)]
pub struct VectorIndex {
    path: PathBuf,
    records: Vec<VectorRecord>,
}

impl VectorIndex {
    /// Open the index for `root`, loading any persisted rows.
    pub fn open(root: &Path) -> Result<Self> {
        let path = paths::vectors_path(root);
        let records = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Vec::new()
        };
        Ok(Self { path, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace by record id, then persist.
    pub fn upsert(&mut self, mut record: VectorRecord) -> Result<()> {
        if record.embedding.is_empty() {
            return Err(TrdError::InvalidRequest(format!(
                "record '{}' has an empty embedding",
                record.id
            )));
        }
        record.content = truncate_chars(&record.content, MAX_CONTENT_LEN);
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            self.records.push(record);
        }
        self.persist()
    }

    /// Cosine top-k over all rows, optionally filtered to an exact LOB match.
    pub fn search(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        lob: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        let query_vec = embedder.embed(query)?;
        let mut hits: Vec<SearchHit> = self
            .records
            .iter()
            .filter(|r| lob.map_or(true, |l| r.lob == l))
            .map(|r| SearchHit {
                id: r.id.clone(),
                document_id: r.document_id.clone(),
                document_name: r.document_name.clone(),
                content: r.content.clone(),
                score: cosine(&query_vec, &r.embedding),
                lob: r.lob.clone(),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    pub fn delete(&mut self, ids: &[String]) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        let removed = before - self.records.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Remove every chunk belonging to a document.
    pub fn delete_by_document(&mut self, document_id: &str) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| r.document_id != document_id);
        let removed = before - self.records.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        let data = serde_json::to_vec(&self.records)?;
        io::atomic_write(&self.path, &data)
    }
}

/// Cosine similarity; zero or mismatched vectors score 0.0, never NaN.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use tempfile::TempDir;

    fn record(id: &str, doc: &str, lob: &str, embedding: Vec<f32>, content: &str) -> VectorRecord {
        VectorRecord {
            id: id.into(),
            document_id: doc.into(),
            document_name: format!("{doc}.txt"),
            content: content.into(),
            lob: lob.into(),
            source: "upload".into(),
            chunk_index: 0,
            total_chunks: 1,
            embedding,
        }
    }

    fn embed(text: &str) -> Vec<f32> {
        HashEmbedder::new(64).embed(text).unwrap()
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn cosine_identical_is_one() {
        let v = vec![0.3, -0.4, 0.5];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn upsert_replaces_same_id() {
        let dir = TempDir::new().unwrap();
        let mut index = VectorIndex::open(dir.path()).unwrap();
        index
            .upsert(record("c1", "d1", "auto", embed("first"), "first"))
            .unwrap();
        index
            .upsert(record("c1", "d1", "auto", embed("second"), "second"))
            .unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn empty_embedding_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut index = VectorIndex::open(dir.path()).unwrap();
        assert!(index
            .upsert(record("c1", "d1", "auto", Vec::new(), "x"))
            .is_err());
    }

    #[test]
    fn search_filters_by_lob() {
        let dir = TempDir::new().unwrap();
        let mut index = VectorIndex::open(dir.path()).unwrap();
        index
            .upsert(record("c1", "d1", "personal_auto", embed("collision coverage"), "collision"))
            .unwrap();
        index
            .upsert(record("c2", "d2", "homeowners", embed("collision coverage"), "collision"))
            .unwrap();

        let embedder = HashEmbedder::new(64);
        let hits = index
            .search(&embedder, "collision coverage", Some("personal_auto"), 10)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].lob, "personal_auto");
    }

    #[test]
    fn search_scores_descend_and_truncate() {
        let dir = TempDir::new().unwrap();
        let mut index = VectorIndex::open(dir.path()).unwrap();
        index
            .upsert(record("c1", "d1", "auto", embed("collision deductible terms"), "a"))
            .unwrap();
        index
            .upsert(record("c2", "d1", "auto", embed("completely unrelated topic"), "b"))
            .unwrap();
        index
            .upsert(record("c3", "d1", "auto", embed("collision deductible"), "c"))
            .unwrap();

        let embedder = HashEmbedder::new(64);
        let hits = index
            .search(&embedder, "collision deductible", None, 2)
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn rows_survive_reload() {
        let dir = TempDir::new().unwrap();
        {
            let mut index = VectorIndex::open(dir.path()).unwrap();
            index
                .upsert(record("c1", "d1", "auto", embed("persisted row"), "row"))
                .unwrap();
        }
        let index = VectorIndex::open(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn delete_by_document_removes_all_chunks() {
        let dir = TempDir::new().unwrap();
        let mut index = VectorIndex::open(dir.path()).unwrap();
        index
            .upsert(record("c1", "d1", "auto", embed("one"), "one"))
            .unwrap();
        index
            .upsert(record("c2", "d1", "auto", embed("two"), "two"))
            .unwrap();
        index
            .upsert(record("c3", "d2", "auto", embed("three"), "three"))
            .unwrap();

        let removed = index.delete_by_document("d1").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn content_is_truncated_on_upsert() {
        let dir = TempDir::new().unwrap();
        let mut index = VectorIndex::open(dir.path()).unwrap();
        let long = "x".repeat(6000);
        index
            .upsert(record("c1", "d1", "auto", embed("long"), &long))
            .unwrap();
        let embedder = HashEmbedder::new(64);
        let hits = index.search(&embedder, "long", None, 1).unwrap();
        assert_eq!(hits[0].content.len(), 5000);
    }
}
