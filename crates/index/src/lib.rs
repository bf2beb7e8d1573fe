pub mod session;
pub mod store;

pub use session::{DocumentSession, RetrievalParams, build_claim_query};
pub use store::{SearchResult, VectorStore};

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
  #[error("Document contains no indexable text")]
  EmptyDocument,
  #[error(transparent)]
  Embedding(#[from] embedding::EmbeddingError),
}
