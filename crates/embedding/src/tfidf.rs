use std::collections::HashMap;

use tracing::debug;

use crate::EmbeddingError;

/// Common English stopwords excluded from the vocabulary
const STOPWORDS: &[&str] = &[
  "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as", "at", "be",
  "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "cannot", "could", "did",
  "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had", "has", "have", "having",
  "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "me",
  "more", "most", "my", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out",
  "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
  "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
  "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
  "your", "yours",
];

/// Parameters for vocabulary construction
#[derive(Debug, Clone)]
pub struct TfidfParams {
  /// Maximum vocabulary size, kept by corpus frequency (default: 1000)
  pub max_features: usize,
  /// Terms appearing in more than this fraction of documents are dropped (default: 0.9)
  pub max_df: f32,
  /// Minimum document frequency for a term to be kept (default: 1)
  pub min_df: usize,
}

impl Default for TfidfParams {
  fn default() -> Self {
    Self {
      max_features: 1000,
      max_df: 0.9,
      min_df: 1,
    }
  }
}

/// A fitted vocabulary: term -> column index plus per-term idf
#[derive(Debug, Clone)]
struct Vocabulary {
  index: HashMap<String, usize>,
  idf: Vec<f32>,
}

/// Term-frequency embedder with a fit/transform lifecycle.
///
/// `fit_transform` builds a fixed vocabulary from one document corpus and
/// embeds its chunks; `transform` projects later queries onto that same
/// vocabulary. Re-fitting replaces the vocabulary wholesale and invalidates
/// any index built against the previous fit, so each document session owns
/// its own embedder.
#[derive(Debug, Clone)]
pub struct TfidfEmbedder {
  params: TfidfParams,
  vocab: Option<Vocabulary>,
}

impl Default for TfidfEmbedder {
  fn default() -> Self {
    Self::new(TfidfParams::default())
  }
}

impl TfidfEmbedder {
  pub fn new(params: TfidfParams) -> Self {
    Self { params, vocab: None }
  }

  pub fn is_fitted(&self) -> bool {
    self.vocab.is_some()
  }

  /// Vector length produced by the fitted vocabulary
  pub fn dimensions(&self) -> Option<usize> {
    self.vocab.as_ref().map(|v| v.idf.len())
  }

  /// Fit the vocabulary on `chunks` and return one vector per chunk.
  ///
  /// Any previous fit is discarded. Returns exactly `chunks.len()` vectors,
  /// all of the fitted dimension.
  pub fn fit_transform(&mut self, chunks: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if chunks.is_empty() {
      return Err(EmbeddingError::EmptyCorpus);
    }

    let mut doc_terms: Vec<Vec<String>> = chunks.iter().map(|c| extract_terms(c, true)).collect();

    // A corpus of pure stopwords still has to produce a nonzero dimension
    if doc_terms.iter().all(|t| t.is_empty()) {
      doc_terms = chunks.iter().map(|c| extract_terms(c, false)).collect();
    }

    let n_docs = chunks.len();
    let mut corpus_counts: HashMap<&str, usize> = HashMap::new();
    let mut doc_freq: HashMap<&str, usize> = HashMap::new();

    for terms in &doc_terms {
      let mut seen: HashMap<&str, bool> = HashMap::new();
      for term in terms {
        *corpus_counts.entry(term).or_insert(0) += 1;
        seen.entry(term).or_insert(true);
      }
      for term in seen.keys() {
        *doc_freq.entry(term).or_insert(0) += 1;
      }
    }

    let max_df_count = (self.params.max_df * n_docs as f32).floor() as usize;
    let mut kept: Vec<(&str, usize)> = corpus_counts
      .iter()
      .filter(|(term, _)| {
        let df = doc_freq[*term];
        df >= self.params.min_df && (n_docs == 1 || df <= max_df_count.max(1))
      })
      .map(|(term, count)| (*term, *count))
      .collect();

    // Document-frequency filtering must never empty the vocabulary outright
    if kept.is_empty() {
      kept = corpus_counts.iter().map(|(term, count)| (*term, *count)).collect();
    }

    // Cap by corpus frequency, then order lexicographically for determinism
    kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    kept.truncate(self.params.max_features);
    let mut terms: Vec<&str> = kept.into_iter().map(|(term, _)| term).collect();
    terms.sort_unstable();

    let index: HashMap<String, usize> = terms.iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect();

    // Smoothed idf: ln((1 + n) / (1 + df)) + 1
    let idf: Vec<f32> = terms
      .iter()
      .map(|term| {
        let df = doc_freq.get(term).copied().unwrap_or(0);
        ((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0
      })
      .collect();

    debug!(features = idf.len(), documents = n_docs, "Fitted vocabulary");

    let vocab = Vocabulary { index, idf };
    let vectors = doc_terms.iter().map(|terms| project(terms, &vocab)).collect();
    self.vocab = Some(vocab);

    Ok(vectors)
  }

  /// Project a query onto the fitted vocabulary.
  ///
  /// Never changes the vocabulary; terms outside it are ignored.
  pub fn transform(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
    let vocab = self.vocab.as_ref().ok_or(EmbeddingError::NotFitted)?;
    let terms = extract_terms(text, true);
    Ok(project(&terms, vocab))
  }
}

/// Tokenize into lowercased word unigrams and bigrams.
///
/// Tokens are alphanumeric runs of at least two chars; bigrams are formed
/// after stopword removal, joined by a single space.
fn extract_terms(text: &str, filter_stopwords: bool) -> Vec<String> {
  let tokens: Vec<String> = text
    .to_lowercase()
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| t.len() >= 2)
    .filter(|t| !filter_stopwords || !STOPWORDS.contains(t))
    .map(|t| t.to_string())
    .collect();

  let mut terms = tokens.clone();
  for pair in tokens.windows(2) {
    terms.push(format!("{} {}", pair[0], pair[1]));
  }
  terms
}

/// tf-idf projection with l2 normalisation
fn project(terms: &[String], vocab: &Vocabulary) -> Vec<f32> {
  let mut vector = vec![0.0f32; vocab.idf.len()];
  for term in terms {
    if let Some(&i) = vocab.index.get(term.as_str()) {
      vector[i] += vocab.idf[i];
    }
  }

  let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
  if norm > 0.0 {
    for v in &mut vector {
      *v /= norm;
    }
  }
  vector
}

#[cfg(test)]
mod tests {
  use super::*;

  fn corpus() -> Vec<String> {
    vec![
      "Cataract surgery is covered after a waiting period of 24 months.".to_string(),
      "Cosmetic surgery is excluded unless reconstruction after accident.".to_string(),
      "Dental treatment is excluded unless emergency due to accident.".to_string(),
      "The sum insured for hospitalization is 500000 rupees.".to_string(),
    ]
  }

  #[test]
  fn test_fit_transform_shape() {
    let mut embedder = TfidfEmbedder::default();
    let chunks = corpus();
    let vectors = embedder.fit_transform(&chunks).unwrap();

    assert_eq!(vectors.len(), chunks.len());
    let dim = embedder.dimensions().unwrap();
    assert!(dim > 0);
    for v in &vectors {
      assert_eq!(v.len(), dim);
    }
  }

  #[test]
  fn test_transform_before_fit_fails() {
    let embedder = TfidfEmbedder::default();
    assert!(matches!(
      embedder.transform("cataract surgery"),
      Err(EmbeddingError::NotFitted)
    ));
  }

  #[test]
  fn test_fit_empty_corpus_fails() {
    let mut embedder = TfidfEmbedder::default();
    assert!(matches!(embedder.fit_transform(&[]), Err(EmbeddingError::EmptyCorpus)));
  }

  #[test]
  fn test_transform_projects_onto_fixed_vocabulary() {
    let mut embedder = TfidfEmbedder::default();
    let chunks = corpus();
    embedder.fit_transform(&chunks).unwrap();
    let dim = embedder.dimensions().unwrap();

    // A query full of unseen terms maps to the zero vector of the same length
    let unknown = embedder.transform("zzz qqq www").unwrap();
    assert_eq!(unknown.len(), dim);
    assert!(unknown.iter().all(|v| *v == 0.0));

    // A query with known terms produces a nonzero vector
    let known = embedder.transform("cataract surgery waiting period").unwrap();
    assert!(known.iter().any(|v| *v > 0.0));
  }

  #[test]
  fn test_refit_replaces_vocabulary() {
    let mut embedder = TfidfEmbedder::default();
    embedder.fit_transform(&corpus()).unwrap();
    let first_dim = embedder.dimensions().unwrap();

    let other = vec!["completely different words entirely".to_string()];
    embedder.fit_transform(&other).unwrap();
    assert_ne!(embedder.dimensions().unwrap(), first_dim);
  }

  #[test]
  fn test_vocabulary_includes_bigrams() {
    let mut embedder = TfidfEmbedder::default();
    let chunks = vec![
      "waiting period applies to cataract".to_string(),
      "waiting period waived for accidents".to_string(),
      "sum insured limits apply per year".to_string(),
    ];
    embedder.fit_transform(&chunks).unwrap();

    let with_bigram = embedder.transform("waiting period").unwrap();
    let nonzero = with_bigram.iter().filter(|v| **v > 0.0).count();
    // "waiting", "period", and the "waiting period" bigram all hit
    assert!(nonzero >= 3);
  }

  #[test]
  fn test_stopwords_filtered() {
    let mut embedder = TfidfEmbedder::default();
    let chunks = vec![
      "the policy is covered for the insured".to_string(),
      "an exclusion applies to the policy".to_string(),
    ];
    embedder.fit_transform(&chunks).unwrap();

    let stopword_only = embedder.transform("the is for an to").unwrap();
    assert!(stopword_only.iter().all(|v| *v == 0.0));
  }

  #[test]
  fn test_stopword_only_corpus_still_fits() {
    let mut embedder = TfidfEmbedder::default();
    let chunks = vec!["the and of".to_string(), "is was were".to_string()];
    let vectors = embedder.fit_transform(&chunks).unwrap();

    assert_eq!(vectors.len(), 2);
    assert!(embedder.dimensions().unwrap() > 0);
  }

  #[test]
  fn test_max_features_caps_vocabulary() {
    let mut embedder = TfidfEmbedder::new(TfidfParams {
      max_features: 5,
      ..TfidfParams::default()
    });
    embedder.fit_transform(&corpus()).unwrap();
    assert!(embedder.dimensions().unwrap() <= 5);
  }

  #[test]
  fn test_deterministic_across_fits() {
    let chunks = corpus();

    let mut a = TfidfEmbedder::default();
    let va = a.fit_transform(&chunks).unwrap();
    let mut b = TfidfEmbedder::default();
    let vb = b.fit_transform(&chunks).unwrap();

    assert_eq!(va, vb);
    assert_eq!(a.transform("cataract").unwrap(), b.transform("cataract").unwrap());
  }

  #[test]
  fn test_vectors_l2_normalised() {
    let mut embedder = TfidfEmbedder::default();
    let vectors = embedder.fit_transform(&corpus()).unwrap();
    for v in &vectors {
      let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
      assert!((norm - 1.0).abs() < 1e-5, "norm was {}", norm);
    }
  }
}
