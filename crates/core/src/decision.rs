use serde::{Deserialize, Serialize};

use crate::trace::ReasoningTrace;

/// Final outcome of a claim evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
  Approved,
  Rejected,
}

impl Verdict {
  pub fn as_str(&self) -> &'static str {
    match self {
      Verdict::Approved => "approved",
      Verdict::Rejected => "rejected",
    }
  }
}

impl std::fmt::Display for Verdict {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Complete decision record returned for every evaluation.
///
/// Invariants: a rejected decision always carries amount 0, and the
/// confidence score is always populated from the deterministic trace, even
/// when the external model call failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
  pub verdict: Verdict,
  /// Approved coverage amount; 0 when rejected
  pub amount: u64,
  pub justification: String,
  /// Overall confidence in 0.0..=1.0, derived from the reasoning trace
  pub confidence: f32,
  pub trace: ReasoningTrace,
  /// How many policy chunks were retrieved for this evaluation
  pub retrieved_chunks: usize,
}

impl Decision {
  pub fn approved(amount: u64, justification: impl Into<String>, trace: ReasoningTrace, retrieved_chunks: usize) -> Self {
    let confidence = trace.confidence();
    Self {
      verdict: Verdict::Approved,
      amount,
      justification: justification.into(),
      confidence,
      trace,
      retrieved_chunks,
    }
  }

  /// Rejected decisions force amount to 0 regardless of what was parsed
  pub fn rejected(justification: impl Into<String>, trace: ReasoningTrace, retrieved_chunks: usize) -> Self {
    let confidence = trace.confidence();
    Self {
      verdict: Verdict::Rejected,
      amount: 0,
      justification: justification.into(),
      confidence,
      trace,
      retrieved_chunks,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::trace::{ReasoningStep, StepKind};

  #[test]
  fn test_rejected_zeroes_amount() {
    let decision = Decision::rejected("no coverage", ReasoningTrace::new(), 0);
    assert_eq!(decision.verdict, Verdict::Rejected);
    assert_eq!(decision.amount, 0);
  }

  #[test]
  fn test_confidence_comes_from_trace() {
    let mut trace = ReasoningTrace::new();
    trace.push(ReasoningStep::new(StepKind::PolicyActive, true, "active", 0.9));
    let decision = Decision::approved(50_000, "ok", trace, 3);
    assert!((decision.confidence - 0.9).abs() < 1e-6);
  }

  #[test]
  fn test_verdict_serializes_lowercase() {
    let json = serde_json::to_string(&Verdict::Approved).unwrap();
    assert_eq!(json, "\"approved\"");
  }
}
