pub mod tfidf;

pub use tfidf::{TfidfEmbedder, TfidfParams};

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
  #[error("Embedder has not been fitted")]
  NotFitted,
  #[error("Cannot fit on an empty corpus")]
  EmptyCorpus,
}
