pub mod engine;
pub mod tables;

pub use engine::ReasoningEngine;
pub use tables::{PolicyIssues, SPECIFIED_DISEASES, exclusion_reason, policy_issues, required_waiting_period};
