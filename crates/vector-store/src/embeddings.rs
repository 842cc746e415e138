use crate::error::{Result, VectorStoreError};
use crate::similarity::l2_norm_f64;
use async_trait::async_trait;
use std::env;
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_EMBEDDING_DIMENSION: usize = 256;
pub const EMBEDDING_DIMENSION_ENV: &str = "LOGSCOPE_EMBED_DIMENSION";

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 1.0;

/// Turns text into fixed-length vectors.
///
/// Every vector returned by one embedder has length [`Embedder::dimension`].
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    /// Stable identifier of the model, used in logs and reports
    fn model_id(&self) -> &str;

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| VectorStoreError::embedding("Empty embedding result"))
    }
}

/// Offline feature-hashing embedder.
///
/// Each lowercased word and each character trigram of `<word>` is hashed
/// (FNV-1a) into one of `dimension` buckets with a hash-derived sign. The
/// result is L2-normalized; text without any word maps to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(VectorStoreError::invalid_config(
                "embedding dimension must be > 0",
            ));
        }
        Ok(Self {
            dimension,
            model_id: format!("hashing-{dimension}"),
        })
    }

    /// Build from `LOGSCOPE_EMBED_DIMENSION`, falling back to the default.
    pub fn from_env() -> Result<Self> {
        Self::new(dimension_from_env()?)
    }

    #[must_use]
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0_f32; self.dimension];
        let lowered = text.to_lowercase();
        for word in lowered.unicode_words() {
            self.accumulate(&mut vec, word, WORD_WEIGHT);

            let padded: Vec<char> = std::iter::once('<')
                .chain(word.chars())
                .chain(std::iter::once('>'))
                .collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.accumulate(&mut vec, &trigram, TRIGRAM_WEIGHT);
            }
        }
        normalize(&mut vec);
        vec
    }

    fn accumulate(&self, vec: &mut [f32], token: &str, weight: f32) {
        let hash = fnv1a_64(token.as_bytes());
        #[allow(clippy::cast_possible_truncation)]
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vec[bucket] += sign * weight;
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_sync(text)).collect())
    }
}

/// Embedding dimension requested through the environment, or the default.
pub fn dimension_from_env() -> Result<usize> {
    match env::var(EMBEDDING_DIMENSION_ENV) {
        Ok(raw) => parse_dimension(&raw),
        Err(_) => Ok(DEFAULT_EMBEDDING_DIMENSION),
    }
}

fn parse_dimension(raw: &str) -> Result<usize> {
    let dimension = raw.trim().parse::<usize>().map_err(|e| {
        VectorStoreError::invalid_config(format!(
            "Invalid {EMBEDDING_DIMENSION_ENV} '{raw}': {e}"
        ))
    })?;
    if dimension == 0 {
        return Err(VectorStoreError::invalid_config(format!(
            "{EMBEDDING_DIMENSION_ENV} must be > 0"
        )));
    }
    Ok(dimension)
}

fn normalize(vec: &mut [f32]) {
    let norm = l2_norm_f64(vec);
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value = (f64::from(*value) / norm) as f32;
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
