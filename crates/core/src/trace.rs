use serde::{Deserialize, Serialize};

/// Fixed catalog of deterministic check types.
///
/// Closed enum on purpose: step weights are keyed by this type, so adding a
/// new check means deciding its weight here instead of silently inheriting
/// one from a loosely-matched string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
  ProcedureMatched,
  WaitingPeriodMet,
  WaitingPeriodNotMet,
  ExclusionFound,
  NoExclusion,
  PolicyActive,
  CoverageVerified,
  AmountCalculated,
}

/// Default weight for step kinds without an explicit entry in the table
pub const DEFAULT_STEP_WEIGHT: f32 = 0.1;

impl StepKind {
  pub fn label(&self) -> &'static str {
    match self {
      StepKind::ProcedureMatched => "Procedure matched",
      StepKind::WaitingPeriodMet => "Waiting period met",
      StepKind::WaitingPeriodNotMet => "Waiting period not met",
      StepKind::ExclusionFound => "Exclusion found",
      StepKind::NoExclusion => "No exclusion found",
      StepKind::PolicyActive => "Policy active",
      StepKind::CoverageVerified => "Coverage verified",
      StepKind::AmountCalculated => "Amount calculated",
    }
  }

  /// Weight of this step kind in the overall confidence score
  pub fn weight(&self) -> f32 {
    match self {
      StepKind::ProcedureMatched => 0.25,
      StepKind::WaitingPeriodMet => 0.30,
      StepKind::NoExclusion => 0.25,
      StepKind::CoverageVerified => 0.20,
      _ => DEFAULT_STEP_WEIGHT,
    }
  }
}

/// One deterministic check result in a reasoning trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningStep {
  pub kind: StepKind,
  /// true = check passed, false = check failed
  pub passed: bool,
  pub detail: String,
  /// References like "Clause 3" into the retrieved chunk list
  pub clause_references: Vec<String>,
  /// Confidence in this determination, 0.0..=1.0
  pub confidence: f32,
}

impl ReasoningStep {
  pub fn new(kind: StepKind, passed: bool, detail: impl Into<String>, confidence: f32) -> Self {
    Self {
      kind,
      passed,
      detail: detail.into(),
      clause_references: Vec::new(),
      confidence,
    }
  }

  pub fn with_clauses(mut self, clauses: Vec<String>) -> Self {
    self.clause_references = clauses;
    self
  }
}

/// Ordered sequence of check results for one claim evaluation.
///
/// Created fresh per claim and discarded after the response is sent, unless
/// an audit sink keeps a copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasoningTrace {
  pub steps: Vec<ReasoningStep>,
}

impl ReasoningTrace {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, step: ReasoningStep) {
    self.steps.push(step);
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  /// Strict AND over all steps - a single failure rejects the claim
  pub fn all_passed(&self) -> bool {
    !self.steps.is_empty() && self.steps.iter().all(|s| s.passed)
  }

  /// Weighted average of step confidences.
  ///
  /// Falls back to a plain arithmetic mean if the total weight is zero.
  pub fn confidence(&self) -> f32 {
    if self.steps.is_empty() {
      return 0.0;
    }

    let mut total_weight = 0.0f32;
    let mut weighted_sum = 0.0f32;
    for step in &self.steps {
      let weight = step.kind.weight();
      total_weight += weight;
      weighted_sum += step.confidence * weight;
    }

    if total_weight > 0.0 {
      weighted_sum / total_weight
    } else {
      self.steps.iter().map(|s| s.confidence).sum::<f32>() / self.steps.len() as f32
    }
  }

  /// Human-readable breakdown for audit output
  pub fn breakdown(&self) -> String {
    if self.steps.is_empty() {
      return "No reasoning steps available".to_string();
    }

    let mut out = String::from("DECISION REASONING BREAKDOWN:\n");
    for (i, step) in self.steps.iter().enumerate() {
      let status = if step.passed { "PASS" } else { "FAIL" };
      out.push_str(&format!("{}. [{}] {}\n", i + 1, status, step.kind.label()));
      out.push_str(&format!("   Details: {}\n", step.detail));
      if !step.clause_references.is_empty() {
        out.push_str(&format!("   Clauses: {}\n", step.clause_references.join(", ")));
      }
      out.push_str(&format!("   Confidence: {:.0}%\n", step.confidence * 100.0));
    }
    out.push_str(&format!("OVERALL CONFIDENCE: {:.0}%", self.confidence() * 100.0));
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn step(kind: StepKind, passed: bool, confidence: f32) -> ReasoningStep {
    ReasoningStep::new(kind, passed, "detail", confidence)
  }

  #[test]
  fn test_all_passed_requires_steps() {
    let trace = ReasoningTrace::new();
    assert!(!trace.all_passed());
  }

  #[test]
  fn test_all_passed_strict_and() {
    let mut trace = ReasoningTrace::new();
    trace.push(step(StepKind::ProcedureMatched, true, 0.9));
    trace.push(step(StepKind::WaitingPeriodMet, true, 0.95));
    assert!(trace.all_passed());

    trace.push(step(StepKind::ExclusionFound, false, 0.9));
    assert!(!trace.all_passed());
  }

  #[test]
  fn test_confidence_weighted() {
    let mut trace = ReasoningTrace::new();
    trace.push(step(StepKind::ProcedureMatched, true, 0.9));
    trace.push(step(StepKind::WaitingPeriodMet, true, 0.95));

    // (0.9*0.25 + 0.95*0.30) / (0.25 + 0.30)
    let expected = (0.9 * 0.25 + 0.95 * 0.30) / 0.55;
    assert!((trace.confidence() - expected).abs() < 1e-6);
  }

  #[test]
  fn test_confidence_default_weight_for_unlisted_kinds() {
    let mut trace = ReasoningTrace::new();
    trace.push(step(StepKind::PolicyActive, true, 0.9));
    trace.push(step(StepKind::WaitingPeriodNotMet, false, 0.95));

    // Both kinds carry the default weight, so this reduces to the mean
    let expected = (0.9 + 0.95) / 2.0;
    assert!((trace.confidence() - expected).abs() < 1e-6);
  }

  #[test]
  fn test_confidence_empty_trace() {
    assert_eq!(ReasoningTrace::new().confidence(), 0.0);
  }

  #[test]
  fn test_breakdown_mentions_steps() {
    let mut trace = ReasoningTrace::new();
    trace.push(step(StepKind::ProcedureMatched, true, 0.9));
    let text = trace.breakdown();
    assert!(text.contains("Procedure matched"));
    assert!(text.contains("PASS"));
    assert!(text.contains("OVERALL CONFIDENCE"));
  }
}
