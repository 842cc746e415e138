use crate::error::{Result, VectorStoreError};
use crate::similarity::{cosine_with_norms, l2_norm_f64};
use crate::types::{Document, MetadataFilter, SearchResult};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Entry {
    document: Document,
    vector: Vec<f32>,
    norm: f64,
}

/// Exact, brute-force in-memory vector store.
///
/// Entries keep their insertion order; the insertion index is both the
/// identity of a document and the tie-break for equal scores. The
/// dimensionality is fixed by the first successful [`VectorStore::add`].
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    entries: Vec<Entry>,
    dimension: Option<usize>,
}

impl VectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document with its embedding and return its insertion index.
    ///
    /// Fails without touching the store if the vector is empty (first insert),
    /// has the wrong length, or contains NaN/infinite components.
    pub fn add(&mut self, document: Document, vector: Vec<f32>) -> Result<usize> {
        let dimension = validate_vector(self.dimension, &vector)?;
        let norm = l2_norm_f64(&vector);
        let index = self.entries.len();
        self.entries.push(Entry {
            document,
            vector,
            norm,
        });
        self.dimension = Some(dimension);
        log::trace!("Added entry {index} (dimension {dimension})");
        Ok(index)
    }

    /// Return the `k` entries most similar to `query`, best first.
    ///
    /// Scores are cosine similarities; equal scores keep insertion order.
    /// An empty store or `k == 0` yields no results without inspecting the
    /// query; otherwise the query must be finite and have the store's length.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.search_matching(query, k, |_| true)
    }

    /// Like [`VectorStore::search`], restricted to documents matching `filter`.
    pub fn search_filtered(
        &self,
        query: &[f32],
        k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<SearchResult>> {
        self.search_matching(query, k, |document| filter.matches(document))
    }

    fn search_matching(
        &self,
        query: &[f32],
        k: usize,
        keep: impl Fn(&Document) -> bool,
    ) -> Result<Vec<SearchResult>> {
        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }
        validate_vector(Some(dimension), query)?;

        log::debug!(
            "Searching {} entries (dimension {dimension}, k {k})",
            self.entries.len()
        );

        let query_norm = l2_norm_f64(query);
        let mut scores: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| keep(&entry.document))
            .map(|(index, entry)| {
                (
                    index,
                    cosine_with_norms(query, query_norm, &entry.vector, entry.norm),
                )
            })
            .collect();

        scores.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scores.truncate(k);

        let results: Vec<SearchResult> = scores
            .into_iter()
            .map(|(index, score)| SearchResult {
                index,
                document: self.entries[index].document.clone(),
                score,
            })
            .collect();

        log::debug!("Found {} results", results.len());
        Ok(results)
    }

    /// Check that `vector` could be added right now, without adding it.
    pub fn check_insertable(&self, vector: &[f32]) -> Result<()> {
        validate_vector(self.dimension, vector).map(|_| ())
    }

    /// Get a document and its embedding by insertion index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<(&Document, &[f32])> {
        self.entries
            .get(index)
            .map(|entry| (&entry.document, entry.vector.as_slice()))
    }

    /// Iterate over stored documents in insertion order
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|entry| &entry.document)
    }

    /// Established dimensionality, `None` while the store is empty
    #[must_use]
    pub const fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validate `vector` against an expected dimensionality (or, if none is
/// established yet, against the non-empty rule) and return its dimension.
pub(crate) fn validate_vector(expected: Option<usize>, vector: &[f32]) -> Result<usize> {
    match expected {
        None if vector.is_empty() => return Err(VectorStoreError::EmptyVector),
        Some(expected) if vector.len() != expected => {
            return Err(VectorStoreError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }
        _ => {}
    }
    if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
        return Err(VectorStoreError::NonFiniteComponent { index });
    }
    Ok(vector.len())
}
