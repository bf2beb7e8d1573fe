use claimlens_core::{Claim, ChunkParams, Document, chunk_text};
use embedding::TfidfEmbedder;
use tracing::info;

use crate::{IndexError, store::VectorStore};

/// Retrieval settings applied to every search within a session
#[derive(Debug, Clone)]
pub struct RetrievalParams {
  pub top_k: usize,
  pub distance_threshold: f32,
}

impl Default for RetrievalParams {
  fn default() -> Self {
    Self {
      top_k: 8,
      distance_threshold: 1.4,
    }
  }
}

/// One ingested policy document with its own embedder and vector store.
///
/// The embedder is fitted exactly once, on this document's chunks, and the
/// store is built from the same fit. Queries against the session are
/// projected onto that vocabulary, so vectors from different documents can
/// never be compared against each other.
#[derive(Debug)]
pub struct DocumentSession {
  document: Document,
  embedder: TfidfEmbedder,
  store: VectorStore,
  retrieval: RetrievalParams,
}

impl DocumentSession {
  /// Chunk, fit and index `text` as a new session.
  pub fn ingest(
    title: &str,
    source: &str,
    text: &str,
    chunk_params: &ChunkParams,
    retrieval: RetrievalParams,
  ) -> Result<Self, IndexError> {
    let chunks = chunk_text(text, chunk_params);
    if chunks.is_empty() {
      return Err(IndexError::EmptyDocument);
    }

    let mut embedder = TfidfEmbedder::default();
    let vectors = embedder.fit_transform(&chunks)?;
    let dimension = vectors.first().map(Vec::len).unwrap_or(0);

    let mut store = VectorStore::new(dimension);
    store.add(&vectors, &chunks);

    let document = Document::new(title.to_string(), source.to_string(), text, chunks.len());
    info!(
      session_id = %document.session_id,
      chunks = chunks.len(),
      dimension,
      "Ingested document"
    );

    Ok(Self {
      document,
      embedder,
      store,
      retrieval,
    })
  }

  pub fn document(&self) -> &Document {
    &self.document
  }

  pub fn chunk_count(&self) -> usize {
    self.store.len()
  }

  /// Retrieve the chunks most relevant to a claim, in relevance order.
  pub fn retrieve_for_claim(&self, claim: &Claim) -> Result<Vec<String>, IndexError> {
    let query = build_claim_query(claim);
    self.retrieve(&query)
  }

  /// Retrieve the chunks most relevant to a free-text query.
  pub fn retrieve(&self, query: &str) -> Result<Vec<String>, IndexError> {
    let vector = self.embedder.transform(query)?;
    let results = self
      .store
      .search(&vector, self.retrieval.top_k, self.retrieval.distance_threshold);

    Ok(
      results
        .iter()
        .filter_map(|r| self.store.chunk(r.index).map(str::to_string))
        .collect(),
    )
  }
}

/// Enrich the retrieval query with class-specific policy vocabulary.
///
/// A bare procedure name rarely overlaps the clause wording that decides the
/// claim, so known procedure classes pull in the terms their clauses use, and
/// short policy durations pull in waiting-period language.
pub fn build_claim_query(claim: &Claim) -> String {
  let mut parts: Vec<&str> = vec![&claim.procedure];

  if claim.procedure.contains("cataract") {
    parts.extend(["eye surgery", "lens", "ophthalmology", "waiting period"]);
  } else if claim.procedure.contains("heart") {
    parts.extend(["cardiac", "cardiovascular", "heart surgery", "waiting period"]);
  } else if claim.procedure.contains("knee") {
    parts.extend(["orthopedic", "joint replacement", "arthroplasty"]);
  } else if claim.procedure.contains("dental") {
    parts.extend(["dental", "oral", "exclusion"]);
  } else if claim.procedure.contains("cosmetic") {
    parts.extend(["cosmetic", "plastic surgery", "exclusion"]);
  } else if claim.procedure.contains("emergency") {
    parts.extend(["emergency", "urgent", "immediate"]);
  }

  if claim.policy_duration_months < 24 {
    parts.push("waiting period");
  }
  if claim.policy_duration_months < 12 {
    parts.push("new policy");
  }

  if !claim.location.is_empty() {
    parts.push(&claim.location);
  }

  parts.join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use claimlens_core::Gender;

  const POLICY: &str = "\
    Cataract surgery is covered after a waiting period of 24 months from policy inception. \
    The sum insured for hospitalization expenses is Rs. 500000 per policy year. \
    Cosmetic surgery is excluded from coverage unless required for reconstruction after an accident. \
    Dental treatment is excluded unless arising out of an emergency. \
    Knee replacement and other joint replacement procedures require a waiting period of 24 months. \
    Pre-existing diseases are covered after 36 months of continuous coverage.";

  fn claim(procedure: &str, duration: u32) -> Claim {
    Claim::new(45, Gender::Male, procedure, "Mumbai", duration).unwrap()
  }

  fn session() -> DocumentSession {
    DocumentSession::ingest(
      "policy.txt",
      "/tmp/policy.txt",
      POLICY,
      &ChunkParams {
        chunk_size: 150,
        overlap: 30,
      },
      RetrievalParams::default(),
    )
    .unwrap()
  }

  #[test]
  fn test_ingest_empty_document_fails() {
    let result = DocumentSession::ingest(
      "empty.txt",
      "/tmp/empty.txt",
      "   ",
      &ChunkParams::default(),
      RetrievalParams::default(),
    );
    assert!(matches!(result, Err(IndexError::EmptyDocument)));
  }

  #[test]
  fn test_ingest_records_chunk_count() {
    let session = session();
    assert!(session.chunk_count() > 1);
    assert_eq!(session.document().chunk_count, session.chunk_count());
  }

  #[test]
  fn test_retrieve_finds_relevant_clause() {
    let session = session();
    let chunks = session.retrieve_for_claim(&claim("cataract surgery", 10)).unwrap();

    assert!(!chunks.is_empty());
    assert!(chunks.iter().any(|c| c.to_lowercase().contains("cataract")));
  }

  #[test]
  fn test_retrieve_never_empty_for_nonempty_store() {
    let session = session();
    // A query sharing no vocabulary with the policy still gets the nearest chunks
    let chunks = session.retrieve("zebra quantum xylophone").unwrap();
    assert!(!chunks.is_empty());
  }

  #[test]
  fn test_claim_query_enrichment() {
    let query = build_claim_query(&claim("cataract surgery", 10));
    assert!(query.contains("cataract surgery"));
    assert!(query.contains("ophthalmology"));
    assert!(query.contains("waiting period"));
    assert!(query.contains("new policy"));
    assert!(query.contains("Mumbai"));
  }

  #[test]
  fn test_claim_query_mature_policy_skips_waiting_terms() {
    let query = build_claim_query(&claim("appendectomy", 36));
    assert!(!query.contains("waiting period"));
    assert!(!query.contains("new policy"));
  }
}
