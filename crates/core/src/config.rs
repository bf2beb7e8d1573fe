//! Configuration for claimlens.
//!
//! Config priority: explicit path > user config (~/.config/claimlens/config.toml) > defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Chunking Configuration
// ============================================================================

/// Document chunking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
  /// Target chunk size in bytes (default: 800)
  pub chunk_size: usize,

  /// Overlap between consecutive chunks in bytes (default: 200)
  pub overlap: usize,
}

impl Default for ChunkingConfig {
  fn default() -> Self {
    Self {
      chunk_size: 800,
      overlap: 200,
    }
  }
}

// ============================================================================
// Retrieval Configuration
// ============================================================================

/// Vector search defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
  /// Number of chunks retrieved per claim (default: 8)
  pub top_k: usize,

  /// Maximum Euclidean distance for a chunk to count as relevant
  /// (default: 1.4). For l2-normalised non-negative vectors distances fall
  /// in [0, sqrt(2)], so 1.4 only excludes chunks with essentially no term
  /// overlap. When nothing passes the filter, the nearest chunks are
  /// returned anyway.
  pub distance_threshold: f32,

  /// Vocabulary cap for the term-frequency embedder (default: 1000)
  pub max_features: usize,
}

impl Default for RetrievalConfig {
  fn default() -> Self {
    Self {
      top_k: 8,
      distance_threshold: 1.4,
      max_features: 1000,
    }
  }
}

// ============================================================================
// Model Configuration
// ============================================================================

/// External language-model service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
  /// Base URL of an OpenAI-compatible chat-completions API
  pub base_url: String,

  /// Model identifier sent with each request
  pub model: String,

  /// Request timeout in seconds (default: 60)
  pub timeout_secs: u64,

  /// Environment variable holding the API key (default: CLAIMLENS_API_KEY)
  pub api_key_env: String,

  /// Sampling temperature (default: 0.1 - decisions should be stable)
  pub temperature: f32,
}

impl Default for ModelConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.openai.com/v1".to_string(),
      model: "gpt-4o-mini".to_string(),
      timeout_secs: 60,
      api_key_env: "CLAIMLENS_API_KEY".to_string(),
      temperature: 0.1,
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// claimlens configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  #[serde(default)]
  pub chunking: ChunkingConfig,

  #[serde(default)]
  pub retrieval: RetrievalConfig,

  #[serde(default)]
  pub model: ModelConfig,
}

impl Config {
  /// Load config from an explicit path, falling back to the user config and
  /// then to defaults. A malformed file is reported, not silently ignored.
  pub fn load(path: Option<&Path>) -> crate::Result<Self> {
    if let Some(path) = path {
      let content = std::fs::read_to_string(path)?;
      return toml::from_str(&content).map_err(|e| crate::Error::Config(format!("{}: {}", path.display(), e)));
    }

    if let Some(user_path) = Self::user_config_path()
      && user_path.exists()
    {
      let content = std::fs::read_to_string(&user_path)?;
      return toml::from_str(&content).map_err(|e| crate::Error::Config(format!("{}: {}", user_path.display(), e)));
    }

    Ok(Self::default())
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CLAIMLENS_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("claimlens").join("config.toml"))
  }
}
