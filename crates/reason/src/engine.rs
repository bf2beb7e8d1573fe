use claimlens_core::{Claim, ReasoningStep, ReasoningTrace, StepKind};
use tracing::debug;

use crate::tables;

/// Deterministic rule checks over a claim and its retrieved clauses.
///
/// Runs a fixed sequence of four checks and records one step per check; the
/// resulting trace decides by strict AND and carries the weighted confidence.
/// The engine holds no state, so the same inputs always produce the same
/// trace.
#[derive(Debug, Default)]
pub struct ReasoningEngine;

impl ReasoningEngine {
  pub fn new() -> Self {
    Self
  }

  pub fn analyze(&self, claim: &Claim, chunks: &[String]) -> ReasoningTrace {
    let mut trace = ReasoningTrace::new();

    trace.push(check_procedure_coverage(claim, chunks));
    trace.push(check_waiting_period(claim));
    trace.push(check_exclusions(claim));
    trace.push(check_policy_status(claim));

    debug!(
      passed = trace.all_passed(),
      confidence = trace.confidence(),
      "Analyzed claim"
    );
    trace
  }
}

/// Case-folded substring search for the procedure across retrieved clauses
fn check_procedure_coverage(claim: &Claim, chunks: &[String]) -> ReasoningStep {
  let references: Vec<String> = chunks
    .iter()
    .enumerate()
    .filter(|(_, chunk)| chunk.to_lowercase().contains(&claim.procedure))
    .map(|(i, _)| format!("Clause {}", i + 1))
    .collect();

  if references.is_empty() {
    ReasoningStep::new(
      StepKind::ProcedureMatched,
      false,
      format!("Procedure '{}' not explicitly covered in policy", claim.procedure),
      0.7,
    )
  } else {
    ReasoningStep::new(
      StepKind::ProcedureMatched,
      true,
      format!("Procedure '{}' found in policy coverage", claim.procedure),
      0.9,
    )
    .with_clauses(references)
  }
}

fn check_waiting_period(claim: &Claim) -> ReasoningStep {
  // Accidents and unlisted procedures carry no waiting period
  let required = if claim.procedure.contains("accident") {
    None
  } else {
    tables::required_waiting_period(&claim.procedure).filter(|months| *months > 0)
  };

  match required {
    None => ReasoningStep::new(
      StepKind::WaitingPeriodMet,
      true,
      format!("No specific waiting period found for '{}'", claim.procedure),
      0.8,
    ),
    Some(months) if claim.policy_duration_months >= months => ReasoningStep::new(
      StepKind::WaitingPeriodMet,
      true,
      format!(
        "Policy duration {} months >= required {} months",
        claim.policy_duration_months, months
      ),
      0.95,
    ),
    Some(months) => ReasoningStep::new(
      StepKind::WaitingPeriodNotMet,
      false,
      format!(
        "Policy duration {} months < required {} months",
        claim.policy_duration_months, months
      ),
      0.95,
    ),
  }
}

fn check_exclusions(claim: &Claim) -> ReasoningStep {
  match tables::exclusion_reason(&claim.procedure) {
    Some(reason) => ReasoningStep::new(StepKind::ExclusionFound, false, reason, 0.9),
    None => ReasoningStep::new(
      StepKind::NoExclusion,
      true,
      format!("No exclusions found for '{}'", claim.procedure),
      0.8,
    ),
  }
}

fn check_policy_status(claim: &Claim) -> ReasoningStep {
  if claim.policy_duration_months > 0 {
    ReasoningStep::new(
      StepKind::PolicyActive,
      true,
      format!("Policy is active with {} months duration", claim.policy_duration_months),
      0.9,
    )
  } else {
    ReasoningStep::new(StepKind::PolicyActive, false, "Policy duration is invalid or zero", 0.9)
  }
}
