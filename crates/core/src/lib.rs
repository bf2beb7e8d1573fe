pub mod claim;
pub mod config;
pub mod decision;
pub mod document;
pub mod error;
pub mod trace;

pub use claim::{Claim, Gender};
pub use config::{ChunkingConfig, Config, ModelConfig, RetrievalConfig};
pub use decision::{Decision, Verdict};
pub use document::{ChunkParams, Document, SessionId, chunk_text};
pub use error::{Error, Result};
pub use trace::{DEFAULT_STEP_WEIGHT, ReasoningStep, ReasoningTrace, StepKind};
