use tracing::debug;

/// One search hit: chunk position plus Euclidean distance to the query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
  pub index: usize,
  pub distance: f32,
}

/// In-memory vector index over the chunks of a single document.
///
/// Vectors and chunk texts are parallel append-only lists; the dimension is
/// fixed at construction and vectors of the wrong length are reconciled by
/// zero-padding or truncation rather than rejected. There is no delete or
/// update; a session rebuilds its store from scratch on re-ingest.
#[derive(Debug, Clone)]
pub struct VectorStore {
  dimension: usize,
  vectors: Vec<Vec<f32>>,
  chunks: Vec<String>,
}

impl VectorStore {
  pub fn new(dimension: usize) -> Self {
    Self {
      dimension,
      vectors: Vec::new(),
      chunks: Vec::new(),
    }
  }

  pub fn dimension(&self) -> usize {
    self.dimension
  }

  pub fn len(&self) -> usize {
    self.vectors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vectors.is_empty()
  }

  pub fn chunk(&self, index: usize) -> Option<&str> {
    self.chunks.get(index).map(String::as_str)
  }

  pub fn chunks(&self) -> &[String] {
    &self.chunks
  }

  /// Append vectors with their chunk texts. Extra vectors or chunks beyond
  /// the shorter of the two slices are dropped.
  pub fn add(&mut self, vectors: &[Vec<f32>], chunks: &[String]) {
    let n = vectors.len().min(chunks.len());
    for i in 0..n {
      self.vectors.push(self.reconcile(&vectors[i]));
      self.chunks.push(chunks[i].clone());
    }
    debug!(added = n, total = self.vectors.len(), "Added vectors to store");
  }

  /// Nearest chunks to `query` by Euclidean distance.
  ///
  /// Considers the `min(2 * top_k, N)` nearest candidates, keeps those
  /// strictly below `distance_threshold`, and returns up to `top_k` of them
  /// in ascending distance order. When the threshold filters out every
  /// candidate the raw nearest neighbors are returned instead, so a search
  /// against a nonempty store never comes back empty.
  pub fn search(&self, query: &[f32], top_k: usize, distance_threshold: f32) -> Vec<SearchResult> {
    if self.vectors.is_empty() || top_k == 0 {
      return Vec::new();
    }

    let query = self.reconcile(query);
    let mut results: Vec<SearchResult> = self
      .vectors
      .iter()
      .enumerate()
      .map(|(index, v)| SearchResult {
        index,
        distance: euclidean(&query, v),
      })
      .collect();

    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    results.truncate((2 * top_k).min(self.vectors.len()));

    let filtered: Vec<SearchResult> = results
      .iter()
      .filter(|r| r.distance < distance_threshold)
      .take(top_k)
      .cloned()
      .collect();

    if filtered.is_empty() {
      // Nothing within the threshold; fall back to the raw nearest
      debug!(threshold = distance_threshold, "No chunks within threshold, using nearest");
      results.truncate(top_k);
      return results;
    }

    filtered
  }

  /// Zero-pad or truncate to the fixed dimension
  fn reconcile(&self, vector: &[f32]) -> Vec<f32> {
    let mut out = vector.to_vec();
    out.resize(self.dimension, 0.0);
    out
  }
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
  a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}
