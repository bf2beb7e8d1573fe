//! Claim evaluation: deterministic reasoning plus a model verdict.
//!
//! The deterministic trace and the model verdict are computed independently
//! and then reconciled. Reconciliation is one-directional: hard rule
//! violations can force a model approval down to a rejection, but nothing
//! can upgrade a model rejection. A failed model call degrades to a
//! rejection that still carries the full trace.

use claimlens_core::{Claim, Decision, Verdict};
use llm::VerdictProvider;
use once_cell::sync::Lazy;
use reason::{PolicyIssues, ReasoningEngine};
use regex::Regex;
use tracing::{info, warn};

use crate::{
  sink::{AuditSink, DecisionRecord, TracingSink},
  verdict::parse_verdict,
};

/// Patterns locating a sum-insured or policy-limit figure inside a clause
static SUM_INSURED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
  [
    r"(?i)sum insured.*?(\d+)",
    r"(?i)policy limit.*?(\d+)",
    r"(?i)coverage limit.*?(\d+)",
    r"(?i)maximum.*?(\d+)",
    r"(?i)up to.*?(\d+)",
  ]
  .iter()
  .map(|p| Regex::new(p).unwrap())
  .collect()
});

/// Justifications shorter than this are replaced with a canned one
const MIN_JUSTIFICATION_LEN: usize = 50;

/// Runs the full evaluation pipeline for one claim
pub struct Evaluator<P: VerdictProvider> {
  provider: P,
  reasoner: ReasoningEngine,
  sink: Box<dyn AuditSink>,
}

impl<P: VerdictProvider> Evaluator<P> {
  pub fn new(provider: P) -> Self {
    Self {
      provider,
      reasoner: ReasoningEngine::new(),
      sink: Box::new(TracingSink),
    }
  }

  pub fn with_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
    self.sink = sink;
    self
  }

  /// Evaluate a claim against its retrieved policy chunks.
  ///
  /// Always returns a complete decision; the external model call cannot fail
  /// the evaluation, only degrade it to a rejection.
  pub async fn evaluate(&self, claim: &Claim, chunks: &[String]) -> Decision {
    let trace = self.reasoner.analyze(claim, chunks);

    let prompt = llm::build_evaluation_prompt(claim, chunks);
    let raw = match self.provider.verdict(&prompt).await {
      Ok(text) => text,
      Err(e) => {
        warn!(error = %e, "Model call failed, rejecting claim");
        let decision = Decision::rejected(
          format!("Error in model processing: {}. No relevant policy clause found.", e),
          trace,
          chunks.len(),
        );
        self.sink.record(&DecisionRecord {
          claim,
          decision: &decision,
          chunks,
          raw_response: None,
        });
        return decision;
      }
    };

    let parsed = parse_verdict(&raw);
    let issues = reason::policy_issues(claim, chunks);

    let mut verdict = parsed.verdict;
    let mut justification = raw.clone();

    // Hard rule violations override a model approval, never the reverse
    if verdict == Verdict::Approved && !issues.is_empty() {
      info!(
        waiting = issues.waiting_period.len(),
        exclusions = issues.exclusions.len(),
        "Overriding model approval due to policy violations"
      );
      verdict = Verdict::Rejected;
      justification = override_justification(&issues);
    }

    let decision = match verdict {
      Verdict::Approved => {
        let amount = parsed
          .amount
          .filter(|a| *a > 0)
          .or_else(|| sum_insured_from_chunks(chunks))
          .unwrap_or_else(|| default_amount(&claim.procedure));
        let justification = ensure_justification(justification, verdict, amount);
        Decision::approved(amount, justification, trace, chunks.len())
      }
      Verdict::Rejected => {
        let justification = ensure_justification(justification, verdict, 0);
        Decision::rejected(justification, trace, chunks.len())
      }
    };

    self.sink.record(&DecisionRecord {
      claim,
      decision: &decision,
      chunks,
      raw_response: Some(&raw),
    });
    decision
  }
}

fn override_justification(issues: &PolicyIssues) -> String {
  let listed = issues.all().map(|issue| format!("- {}", issue)).collect::<Vec<_>>().join("\n");
  format!(
    "DECISION: REJECTED\n\n\
     REASONING: Claim rejected due to policy violations:\n{}\n\n\
     COVERAGE AMOUNT: 0\n\n\
     RELEVANT CLAUSES: Policy waiting period and exclusion clauses\n\n\
     WAITING PERIOD CHECK: Policy conditions not met",
    listed
  )
}

/// Scan retrieved chunks for a sum-insured or policy-limit figure
pub fn sum_insured_from_chunks(chunks: &[String]) -> Option<u64> {
  for chunk in chunks {
    for pattern in SUM_INSURED_PATTERNS.iter() {
      if let Some(captures) = pattern.captures(chunk)
        && let Ok(amount) = captures[1].parse::<u64>()
        && amount > 0
      {
        return Some(amount);
      }
    }
  }
  None
}

/// Fallback coverage amount by procedure class
pub fn default_amount(procedure: &str) -> u64 {
  if procedure.contains("cataract") {
    50_000
  } else if procedure.contains("surgery") {
    100_000
  } else {
    25_000
  }
}

fn ensure_justification(justification: String, verdict: Verdict, amount: u64) -> String {
  if justification.trim().len() >= MIN_JUSTIFICATION_LEN {
    return justification;
  }
  match verdict {
    Verdict::Approved => format!("Claim approved based on policy analysis. Coverage amount: ₹{}", amount),
    Verdict::Rejected => "Claim rejected based on policy analysis. No relevant coverage found.".to_string(),
  }
}
