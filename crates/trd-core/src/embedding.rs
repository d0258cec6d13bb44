use crate::config::{Config, EmbeddingProvider};
use crate::error::{Result, TrdError};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Embedder
// ---------------------------------------------------------------------------

/// Maps text to a fixed-dimension vector. Implementations must be
/// deterministic for identical input so the index stays queryable.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn dimension(&self) -> usize;
}

/// Build the embedder named by the config. The Gemini provider requires
/// `GEMINI_API_KEY`; without it selection fails rather than silently
/// degrading to a differently-shaped index.
pub fn from_config(config: &Config) -> Result<Box<dyn Embedder>> {
    match config.embedding.provider {
        EmbeddingProvider::Hash => Ok(Box::new(HashEmbedder::new(config.embedding.dimension))),
        EmbeddingProvider::Gemini => {
            let key = Config::gemini_api_key().ok_or_else(|| {
                TrdError::Provider("GEMINI_API_KEY not set for gemini embedding provider".into())
            })?;
            Ok(Box::new(GeminiEmbedder::new(
                key,
                config.embedding.model.clone(),
                config.embedding.dimension,
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// HashEmbedder
// ---------------------------------------------------------------------------

/// Offline embedder: signed hashed bag of word unigrams and bigrams,
/// L2-normalized. Not a language model, but deterministic and cosine-
/// comparable, which is what the index and the tests need.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn tokens(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }
}

/// FNV-1a, 64-bit. Stable across platforms and compiler versions, unlike
/// the std hasher.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0f32; self.dimension];
        let tokens = Self::tokens(text);

        let mut bump = |term: &str| {
            let h = fnv1a(term.as_bytes());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        };

        for token in &tokens {
            bump(token);
        }
        for pair in tokens.windows(2) {
            bump(&format!("{} {}", pair[0], pair[1]));
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

// ---------------------------------------------------------------------------
// GeminiEmbedder
// ---------------------------------------------------------------------------

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Remote embedder backed by the Gemini `embedContent` endpoint.
pub struct GeminiEmbedder {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    dimension: usize,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: String, dimension: usize) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            model,
            dimension,
        }
    }
}

impl Embedder for GeminiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!(
            "{GEMINI_API_BASE}/models/{}:embedContent?key={}",
            self.model, self.api_key
        );
        let body = serde_json::json!({
            "model": format!("models/{}", self.model),
            "content": { "parts": [ { "text": text } ] },
            "outputDimensionality": self.dimension,
        });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| TrdError::Provider(format!("embedContent request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(TrdError::Provider(format!(
                "embedContent returned {}",
                response.status()
            )));
        }
        let parsed: EmbedContentResponse = response
            .json()
            .map_err(|e| TrdError::Provider(format!("embedContent decode failed: {e}")))?;

        let values = parsed.embedding.values;
        if values.len() != self.dimension {
            return Err(TrdError::DimensionMismatch {
                expected: self.dimension,
                got: values.len(),
            });
        }
        Ok(values)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::cosine;

    #[test]
    fn embedding_is_deterministic() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("the insured vehicle coverage").unwrap();
        let b = embedder.embed("the insured vehicle coverage").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn embedding_has_configured_dimension() {
        let embedder = HashEmbedder::new(384);
        assert_eq!(embedder.embed("anything").unwrap().len(), 384);
        assert_eq!(embedder.dimension(), 384);
    }

    #[test]
    fn embedding_is_unit_norm() {
        let embedder = HashEmbedder::new(384);
        let v = embedder.embed("collision deductible applies per occurrence").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_text_embeds_to_zero_vector() {
        let embedder = HashEmbedder::new(384);
        let v = embedder.embed("").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn similar_text_scores_above_unrelated() {
        let embedder = HashEmbedder::new(384);
        let base = embedder.embed("auto policy collision coverage limits").unwrap();
        let close = embedder.embed("collision coverage limits for the auto policy").unwrap();
        let far = embedder.embed("quarterly marketing newsletter draft").unwrap();
        assert!(cosine(&base, &close) > cosine(&base, &far));
    }

    #[test]
    fn identical_text_has_cosine_one() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("underinsured motorist endorsement").unwrap();
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-5);
    }
}
