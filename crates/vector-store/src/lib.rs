//! # Logscope Vector Store
//!
//! Exact in-memory vector storage and cosine-similarity search for embedded
//! text chunks such as log lines.
//!
//! ## Features
//!
//! - **Exact k-NN search** by brute-force cosine similarity
//! - **Deterministic ranking**: equal scores keep insertion order
//! - **Fixed dimensionality** established by the first inserted vector
//! - **Metadata filters** on scalar document metadata
//! - **Pluggable embedders** with an offline feature-hashing default
//!
//! ## Architecture
//!
//! ```text
//! Document[]
//!     │
//!     ├──> Embedder (HashingEmbedder or caller-supplied)
//!     │      └─> Vector[D]
//!     │
//!     └──> VectorStore (Vec of entries, insertion ordered)
//!            └─> search(query, k) → SearchResult[]
//! ```
//!
//! ## Example
//!
//! ```
//! use logscope_vector_store::{Document, VectorStore};
//!
//! let mut store = VectorStore::new();
//! store.add(Document::new("docA"), vec![1.0, 0.0]).unwrap();
//! store.add(Document::new("docB"), vec![0.0, 1.0]).unwrap();
//!
//! let results = store.search(&[1.0, 0.0], 1).unwrap();
//! assert_eq!(results[0].document.content, "docA");
//! ```

mod embeddings;
mod error;
mod ingest;
mod shared;
mod similarity;
mod store;
mod types;

pub use embeddings::{
    dimension_from_env, Embedder, HashingEmbedder, DEFAULT_EMBEDDING_DIMENSION,
    EMBEDDING_DIMENSION_ENV,
};
pub use error::{Result, VectorStoreError};
pub use ingest::{add_documents, add_documents_shared, similarity_search, similarity_search_shared};
pub use shared::SharedVectorStore;
pub use similarity::{cosine_similarity, dot, l2_norm};
pub use store::VectorStore;
pub use types::{Document, Metadata, MetadataFilter, MetadataValue, SearchResult};
