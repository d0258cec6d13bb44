use crate::error::{Result, TrdError};
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_lob")]
    pub default_lob: String,
}

fn default_lob() -> String {
    "personal_auto".to_string()
}

// ---------------------------------------------------------------------------
// ChunkingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

// ---------------------------------------------------------------------------
// EmbeddingProvider / EmbeddingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProvider {
    /// Deterministic local hashed-ngram embedder. No network, no key.
    Hash,
    /// Gemini `embedContent` REST API. Requires `GEMINI_API_KEY`.
    Gemini,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_provider")]
    pub provider: EmbeddingProvider,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

fn default_embedding_provider() -> EmbeddingProvider {
    EmbeddingProvider::Hash
}

fn default_dimension() -> usize {
    384
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            dimension: default_dimension(),
            model: default_embedding_model(),
        }
    }
}

// ---------------------------------------------------------------------------
// WriterProvider / GenerationConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriterProvider {
    /// Compose sections from retrieved chunks verbatim. No network, no key.
    Extractive,
    /// Gemini `generateContent` REST API. Requires `GEMINI_API_KEY`.
    Gemini,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_writer_provider")]
    pub provider: WriterProvider,
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// How many retrieved chunks feed each section.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_writer_provider() -> WriterProvider {
    WriterProvider::Extractive
}

fn default_generation_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_top_k() -> usize {
    5
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_writer_provider(),
            model: default_generation_model(),
            top_k: default_top_k(),
        }
    }
}

// ---------------------------------------------------------------------------
// VectorConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    /// Index name, overridable via `PINECONE_INDEX_NAME` for deployments
    /// that point at a managed store.
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

fn default_index_name() -> String {
    "trd-agent-documents".to_string()
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            index_name: default_index_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub project: ProjectConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub vector: VectorConfig,
}

impl Config {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project: ProjectConfig {
                name: name.into(),
                default_lob: default_lob(),
            },
            chunking: ChunkingConfig::default(),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            vector: VectorConfig::default(),
        }
    }

    /// Load config from `.trd/config.yaml`, then apply environment overrides.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(TrdError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let mut config: Config = serde_yaml::from_str(&data)?;

        if let Ok(name) = std::env::var("PINECONE_INDEX_NAME") {
            if !name.is_empty() {
                config.vector.index_name = name;
            }
        }
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::config_path(root), data.as_bytes())
    }

    /// API key for the Gemini embedding/generation providers.
    /// Read from the environment at call time, never persisted.
    pub fn gemini_api_key() -> Option<String> {
        std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_config_has_original_chunking_parameters() {
        let config = Config::new("test");
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.embedding.dimension, 384);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let config = Config::new("my-project");
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.project.name, "my-project");
        assert_eq!(loaded.project.default_lob, "personal_auto");
        assert_eq!(loaded.embedding.provider, EmbeddingProvider::Hash);
    }

    #[test]
    fn load_without_init_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(TrdError::NotInitialized)
        ));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".trd")).unwrap();
        std::fs::write(
            dir.path().join(".trd/config.yaml"),
            "project:\n  name: sparse\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.project.name, "sparse");
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.generation.top_k, 5);
    }
}
