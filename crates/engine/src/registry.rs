use claimlens_core::{Document, SessionId};
use index::DocumentSession;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// In-memory map from session id to its document session.
///
/// Sessions are built once at ingest and read-only afterwards, so the map
/// hands out `Arc` clones and readers never block each other. Nothing is
/// persisted; dropping the registry drops every session.
#[derive(Default)]
pub struct SessionRegistry {
  sessions: RwLock<HashMap<SessionId, Arc<DocumentSession>>>,
}

impl SessionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a session under its document's id
  pub fn insert(&self, session: DocumentSession) -> SessionId {
    let id = session.document().session_id;
    self.sessions.write().expect("registry lock poisoned").insert(id, Arc::new(session));
    debug!(session_id = %id, "Registered session");
    id
  }

  pub fn get(&self, id: &SessionId) -> Option<Arc<DocumentSession>> {
    self.sessions.read().expect("registry lock poisoned").get(id).cloned()
  }

  pub fn remove(&self, id: &SessionId) -> Option<Arc<DocumentSession>> {
    self.sessions.write().expect("registry lock poisoned").remove(id)
  }

  pub fn len(&self) -> usize {
    self.sessions.read().expect("registry lock poisoned").len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Metadata for every registered document
  pub fn documents(&self) -> Vec<Document> {
    self
      .sessions
      .read()
      .expect("registry lock poisoned")
      .values()
      .map(|s| s.document().clone())
      .collect()
  }
}
