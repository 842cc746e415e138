use crate::error::{Result, VectorStoreError};
use crate::store::VectorStore;
use crate::types::{Document, MetadataFilter, SearchResult};
use std::sync::{Arc, Mutex, MutexGuard};

/// A [`VectorStore`] behind one store-wide lock.
///
/// Clones share the same underlying store. Every call holds the lock for its
/// whole duration, so `add` and `search` are serialized.
#[derive(Debug, Clone, Default)]
pub struct SharedVectorStore {
    inner: Arc<Mutex<VectorStore>>,
}

impl SharedVectorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, document: Document, vector: Vec<f32>) -> Result<usize> {
        self.lock()?.add(document, vector)
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.lock()?.search(query, k)
    }

    pub fn search_filtered(
        &self,
        query: &[f32],
        k: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<SearchResult>> {
        self.lock()?.search_filtered(query, k, filter)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    pub fn dimension(&self) -> Result<Option<usize>> {
        Ok(self.lock()?.dimension())
    }

    /// Run `f` with exclusive access to the store.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut VectorStore) -> T) -> Result<T> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    fn lock(&self) -> Result<MutexGuard<'_, VectorStore>> {
        self.inner.lock().map_err(|_| VectorStoreError::LockPoisoned)
    }
}
