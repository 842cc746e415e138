use crate::embeddings::Embedder;
use crate::error::{Result, VectorStoreError};
use crate::shared::SharedVectorStore;
use crate::store::{validate_vector, VectorStore};
use crate::types::{Document, SearchResult};

/// Embed `documents` in one batch and add all of them to `store`.
///
/// Every vector is validated before the first insertion, so on error the
/// store is left exactly as it was. Returns the insertion indices in order.
pub async fn add_documents(
    store: &mut VectorStore,
    embedder: &dyn Embedder,
    documents: Vec<Document>,
) -> Result<Vec<usize>> {
    let vectors = embed_documents(store.dimension(), embedder, &documents).await?;
    insert_all(store, documents, vectors)
}

/// Embed `query` and return its `k` nearest documents in `store`.
pub async fn similarity_search(
    store: &VectorStore,
    embedder: &dyn Embedder,
    query: &str,
    k: usize,
) -> Result<Vec<SearchResult>> {
    log::debug!("Searching for: '{query}' (k: {k})");
    let query_vector = embedder.embed(query).await?;
    store.search(&query_vector, k)
}

/// [`add_documents`] for a shared store. Embedding runs outside the lock;
/// validation and insertion happen under a single acquisition.
pub async fn add_documents_shared(
    store: &SharedVectorStore,
    embedder: &dyn Embedder,
    documents: Vec<Document>,
) -> Result<Vec<usize>> {
    let vectors = embed_documents(store.dimension()?, embedder, &documents).await?;
    store.with_store(|inner| insert_all(inner, documents, vectors))?
}

/// [`similarity_search`] for a shared store.
pub async fn similarity_search_shared(
    store: &SharedVectorStore,
    embedder: &dyn Embedder,
    query: &str,
    k: usize,
) -> Result<Vec<SearchResult>> {
    log::debug!("Searching for: '{query}' (k: {k})");
    let query_vector = embedder.embed(query).await?;
    store.search(&query_vector, k)
}

async fn embed_documents(
    dimension: Option<usize>,
    embedder: &dyn Embedder,
    documents: &[Document],
) -> Result<Vec<Vec<f32>>> {
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    log::info!(
        "Embedding {} documents with {} (dimension {})",
        documents.len(),
        embedder.model_id(),
        embedder.dimension()
    );

    let contents: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
    let vectors = embedder.embed_batch(&contents).await?;
    if vectors.len() != documents.len() {
        return Err(VectorStoreError::embedding(format!(
            "embedder returned {} vectors for {} documents",
            vectors.len(),
            documents.len()
        )));
    }

    // Fail before any insertion; the first vector fixes D for an empty store.
    let mut expected = dimension;
    for vector in &vectors {
        expected = Some(validate_vector(expected, vector)?);
    }
    Ok(vectors)
}

fn insert_all(
    store: &mut VectorStore,
    documents: Vec<Document>,
    vectors: Vec<Vec<f32>>,
) -> Result<Vec<usize>> {
    // Re-check against the live store: a shared store may have been fixed to
    // another dimension while the batch was being embedded.
    if let Some(first) = vectors.first() {
        store.check_insertable(first)?;
    }

    let mut indices = Vec::with_capacity(vectors.len());
    for (document, vector) in documents.into_iter().zip(vectors) {
        indices.push(store.add(document, vector)?);
    }
    log::info!(
        "Successfully added {} documents. Total: {}",
        indices.len(),
        store.len()
    );
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashingEmbedder;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    struct FixedEmbedder {
        vectors: Vec<Vec<f32>>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        fn dimension(&self) -> usize {
            self.vectors.first().map_or(0, Vec::len)
        }

        fn model_id(&self) -> &str {
            "fixed"
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(self.vectors.iter().take(texts.len()).cloned().collect())
        }
    }

    fn docs(texts: &[&str]) -> Vec<Document> {
        texts.iter().map(|t| Document::new(*t)).collect()
    }

    #[tokio::test]
    async fn batch_is_all_or_nothing() {
        let embedder = FixedEmbedder {
            vectors: vec![vec![1.0, 0.0], vec![0.0, 1.0, 0.0]],
        };
        let mut store = VectorStore::new();

        let err = add_documents(&mut store, &embedder, docs(&["a", "b"]))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            VectorStoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
        assert!(store.is_empty());
        assert_eq!(store.dimension(), None);
    }

    #[tokio::test]
    async fn batch_must_match_existing_dimension() {
        let embedder = FixedEmbedder {
            vectors: vec![vec![1.0, 0.0]],
        };
        let mut store = VectorStore::new();
        store.add(Document::new("seed"), vec![1.0, 0.0, 0.0]).unwrap();

        let err = add_documents(&mut store, &embedder, docs(&["a"]))
            .await
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::DimensionMismatch { .. }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn short_batch_is_an_embedding_error() {
        let embedder = FixedEmbedder {
            vectors: vec![vec![1.0, 0.0]],
        };
        let mut store = VectorStore::new();
        let err = add_documents(&mut store, &embedder, docs(&["a", "b"]))
            .await
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::Embedding(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let embedder = HashingEmbedder::new(8).unwrap();
        let mut store = VectorStore::new();
        let indices = add_documents(&mut store, &embedder, Vec::new())
            .await
            .unwrap();
        assert!(indices.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn text_search_returns_closest_document() {
        let embedder = HashingEmbedder::new(256).unwrap();
        let mut store = VectorStore::new();
        let indices = add_documents(
            &mut store,
            &embedder,
            docs(&[
                "Database connection pool size: 5.",
                "Authentication failed for user 'admin'. Invalid password attempt.",
                "High CPU usage detected on server-web-01.",
            ]),
        )
        .await
        .unwrap();
        assert_eq!(indices, vec![0, 1, 2]);

        let results = similarity_search(&store, &embedder, "authentication failed", 1)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index, 1);
    }

    #[tokio::test]
    async fn shared_helpers_round_trip() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let store = SharedVectorStore::new();
        let indices = add_documents_shared(&store, &embedder, docs(&["alpha beta", "gamma"]))
            .await
            .unwrap();
        assert_eq!(indices, vec![0, 1]);

        let results = similarity_search_shared(&store, &embedder, "gamma", 2)
            .await
            .unwrap();
        assert_eq!(results[0].document.content, "gamma");
        assert_eq!(store.len().unwrap(), 2);
    }
}
