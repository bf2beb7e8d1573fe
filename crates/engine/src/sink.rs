use claimlens_core::{Claim, Decision};
use serde::Serialize;

/// Everything known about one completed evaluation
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord<'a> {
  pub claim: &'a Claim,
  pub decision: &'a Decision,
  pub chunks: &'a [String],
  /// Raw model response, absent when the call failed
  pub raw_response: Option<&'a str>,
}

/// Receiver for completed decision records.
///
/// Fire-and-forget: sinks must not fail the evaluation, so the trait returns
/// nothing and implementations swallow their own errors.
pub trait AuditSink: Send + Sync {
  fn record(&self, record: &DecisionRecord<'_>);
}

/// Default sink that emits the decision through tracing
#[derive(Debug, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
  fn record(&self, record: &DecisionRecord<'_>) {
    tracing::info!(
      verdict = %record.decision.verdict,
      amount = record.decision.amount,
      confidence = record.decision.confidence,
      procedure = %record.claim.procedure,
      retrieved_chunks = record.decision.retrieved_chunks,
      "Claim evaluated"
    );
    tracing::debug!(breakdown = %record.decision.trace.breakdown(), "Reasoning trace");
  }
}

/// Sink that drops every record, for callers that opt out of auditing
#[derive(Debug, Default)]
pub struct NullSink;

impl AuditSink for NullSink {
  fn record(&self, _record: &DecisionRecord<'_>) {}
}

#[cfg(test)]
mod tests {
  use super::*;
  use claimlens_core::{Gender, ReasoningTrace};
  use std::sync::Mutex;

  struct CollectingSink {
    verdicts: Mutex<Vec<String>>,
  }

  impl AuditSink for CollectingSink {
    fn record(&self, record: &DecisionRecord<'_>) {
      self.verdicts.lock().unwrap().push(record.decision.verdict.to_string());
    }
  }

  #[test]
  fn test_sink_receives_full_record() {
    let sink = CollectingSink {
      verdicts: Mutex::new(Vec::new()),
    };
    let claim = Claim::new(40, Gender::Male, "surgery", "Pune", 12).unwrap();
    let decision = Decision::rejected("no coverage", ReasoningTrace::new(), 2);
    let chunks = vec!["clause".to_string()];

    sink.record(&DecisionRecord {
      claim: &claim,
      decision: &decision,
      chunks: &chunks,
      raw_response: None,
    });

    assert_eq!(*sink.verdicts.lock().unwrap(), vec!["rejected".to_string()]);
  }
}
