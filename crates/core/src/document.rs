use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one document session (newtype for type safety)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
  pub fn new() -> Self {
    Self(Uuid::now_v7()) // Time-ordered UUIDs
  }

  pub fn as_uuid(&self) -> Uuid {
    self.0
  }
}

impl Default for SessionId {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Display for SessionId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl std::str::FromStr for SessionId {
  type Err = uuid::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self(Uuid::parse_str(s)?))
  }
}

/// Metadata about an ingested policy document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub session_id: SessionId,

  /// Document title (usually the file name)
  pub title: String,

  /// Source path the text was read from
  pub source: String,

  /// Content hash for deduplication
  pub content_hash: String,

  /// Total character count of the raw text
  pub char_count: usize,

  /// Number of chunks created during ingestion
  pub chunk_count: usize,

  pub created_at: DateTime<Utc>,
}

impl Document {
  pub fn new(title: String, source: String, content: &str, chunk_count: usize) -> Self {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let content_hash = format!("{:x}", hasher.finalize());

    Self {
      session_id: SessionId::new(),
      title,
      source,
      content_hash,
      char_count: content.len(),
      chunk_count,
      created_at: Utc::now(),
    }
  }
}

/// Parameters for chunking policy text
#[derive(Debug, Clone)]
pub struct ChunkParams {
  /// Target chunk size in bytes
  pub chunk_size: usize,
  /// Overlap between consecutive chunks in bytes
  pub overlap: usize,
}

impl Default for ChunkParams {
  fn default() -> Self {
    Self {
      chunk_size: 800,
      overlap: 200,
    }
  }
}

/// How far back from the window end the sentence-boundary search begins
const BOUNDARY_LOOKBEHIND: usize = 100;
/// How far past the window end the search may extend
const BOUNDARY_LOOKAHEAD: usize = 50;

/// Snap a byte index down to the nearest char boundary
fn floor_char_boundary(s: &str, mut i: usize) -> usize {
  if i >= s.len() {
    return s.len();
  }
  while !s.is_char_boundary(i) {
    i -= 1;
  }
  i
}

/// Snap a byte index up to the nearest char boundary
fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
  while i < s.len() && !s.is_char_boundary(i) {
    i += 1;
  }
  i.min(s.len())
}

/// Byte position of the last sentence-ending marker in `window`, if any.
///
/// Markers are `.`, `!`, `?` and a blank line; for a blank line the position
/// of its first newline is returned, matching the single-byte markers.
fn last_sentence_end(window: &str) -> Option<usize> {
  let bytes = window.as_bytes();
  let mut best: Option<usize> = None;

  for (i, &b) in bytes.iter().enumerate() {
    let is_marker = matches!(b, b'.' | b'!' | b'?') || (b == b'\n' && bytes.get(i + 1) == Some(&b'\n'));
    if is_marker {
      best = Some(i);
    }
  }

  best
}

/// Split policy text into overlapping chunks at heuristic sentence boundaries.
///
/// Windows of `chunk_size` bytes are scanned forward; each non-final window
/// prefers to cut just after the last sentence-ending marker found near the
/// window end, as long as that cut falls past the window midpoint. The window
/// start then advances by `chunk_size - overlap`; when that would not make
/// progress (overlap >= chunk_size) the start jumps to the current end so the
/// scan always terminates. All offsets are snapped to UTF-8 char boundaries.
pub fn chunk_text(text: &str, params: &ChunkParams) -> Vec<String> {
  let text = text.trim();
  if text.is_empty() {
    return Vec::new();
  }

  // No splitting below the size floor
  if text.len() <= params.chunk_size {
    return vec![text.to_string()];
  }

  let len = text.len();
  let mut chunks = Vec::new();
  let mut start = 0usize;

  while start < len {
    let mut end = floor_char_boundary(text, (start + params.chunk_size).min(len));
    if end <= start {
      // A single char wider than the window; take it whole
      end = ceil_char_boundary(text, start + 1);
    }

    // Not the final window: prefer a sentence boundary near the window end
    if end < len {
      let search_start = floor_char_boundary(
        text,
        (start + params.chunk_size).saturating_sub(BOUNDARY_LOOKBEHIND).max(start),
      );
      let search_end = floor_char_boundary(text, (end + BOUNDARY_LOOKAHEAD).min(len));
      if search_start < search_end
        && let Some(pos) = last_sentence_end(&text[search_start..search_end])
      {
        let marker = search_start + pos;
        // Only cut there if it is not too early in the window
        if marker > start + params.chunk_size / 2 {
          end = marker + 1; // markers are ASCII, so this stays on a boundary
        }
      }
    }

    let chunk = text[start..end].trim();
    if !chunk.is_empty() {
      chunks.push(chunk.to_string());
    }

    // Advance with overlap, guarding against zero or negative progress
    let next = floor_char_boundary(text, end.saturating_sub(params.overlap));
    start = if next <= start { end } else { next };
  }

  chunks
}
