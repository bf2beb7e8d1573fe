//! Evaluation pipeline: session registry, claim parsing, model verdict
//! parsing and the decision orchestration that ties them together.

pub mod evaluator;
pub mod query;
pub mod registry;
pub mod sink;
pub mod verdict;

pub use evaluator::{Evaluator, default_amount, sum_insured_from_chunks};
pub use query::parse_claim;
pub use registry::SessionRegistry;
pub use sink::{AuditSink, DecisionRecord, NullSink, TracingSink};
pub use verdict::{ParsedVerdict, parse_amount, parse_verdict};
