//! Parsing of raw model output into a structured verdict.
//!
//! The model is asked for labeled plain text, but responses degrade in the
//! wild: a marker line may be missing, the amount may appear in any of
//! several currency notations, or the text may be free prose. The parser
//! works down a fixed ladder and fails closed to Rejected.

use claimlens_core::Verdict;
use once_cell::sync::Lazy;
use regex::Regex;

static DECISION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)DECISION:").unwrap());
static DECISION_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)DECISION:\s*(APPROVED|REJECTED)").unwrap());

/// Amount notations in priority order, first match wins
static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
  [
    r"(?i)COVERAGE AMOUNT:\s*(\d+)",
    r"(?i)AMOUNT:\s*(\d+)",
    r"₹(\d+)",
    r"(?i)Rs\.?\s*(\d+)",
    r"(?i)INR\s*(\d+)",
    r"(?i)(\d+)\s*rupees?",
    r"(?i)(\d+)\s*rs",
  ]
  .iter()
  .map(|p| Regex::new(p).unwrap())
  .collect()
});

/// Verdict extracted from one raw model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVerdict {
  pub verdict: Verdict,
  pub amount: Option<u64>,
  /// Whether a DECISION: marker was present in the response
  pub matched_marker: bool,
}

/// Parse a raw model response.
///
/// The DECISION: marker is authoritative when present, even if its value is
/// garbled (a garbled value keeps the Rejected default). Keyword matching
/// runs only when the marker is entirely absent, and rejection keywords win
/// over approval keywords there: prose that mentions both, or a negation
/// like "not approved", must never come out Approved.
pub fn parse_verdict(text: &str) -> ParsedVerdict {
  let matched_marker = DECISION_MARKER.is_match(text);

  let mut verdict = Verdict::Rejected;
  if matched_marker {
    if let Some(captures) = DECISION_VALUE.captures(text)
      && captures[1].eq_ignore_ascii_case("approved")
    {
      verdict = Verdict::Approved;
    }
  } else {
    let lower = text.to_lowercase();
    if lower.contains("rejected") || lower.contains("reject") {
      verdict = Verdict::Rejected;
    } else if lower.contains("approved") || lower.contains("approve") {
      verdict = Verdict::Approved;
    }
  }

  ParsedVerdict {
    verdict,
    amount: parse_amount(text),
    matched_marker,
  }
}

/// First amount found by the pattern ladder
pub fn parse_amount(text: &str) -> Option<u64> {
  for pattern in AMOUNT_PATTERNS.iter() {
    if let Some(captures) = pattern.captures(text)
      && let Ok(amount) = captures[1].parse::<u64>()
    {
      return Some(amount);
    }
  }
  None
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_marker_approved() {
    let parsed = parse_verdict("DECISION: APPROVED\n\nREASONING: waiting period met.");
    assert_eq!(parsed.verdict, Verdict::Approved);
    assert!(parsed.matched_marker);
  }

  #[test]
  fn test_marker_rejected() {
    let parsed = parse_verdict("DECISION: REJECTED\n\nREASONING: excluded.");
    assert_eq!(parsed.verdict, Verdict::Rejected);
    assert!(parsed.matched_marker);
  }

  #[test]
  fn test_marker_case_insensitive() {
    let parsed = parse_verdict("decision: approved");
    assert_eq!(parsed.verdict, Verdict::Approved);
    assert!(parsed.matched_marker);
  }

  #[test]
  fn test_garbled_marker_value_fails_closed() {
    // Marker present but value unparseable; keyword fallback must not run
    let parsed = parse_verdict("DECISION: MAYBE\n\nThe claim looks approved to me.");
    assert_eq!(parsed.verdict, Verdict::Rejected);
    assert!(parsed.matched_marker);
  }

  #[test]
  fn test_keyword_fallback_without_marker() {
    let parsed = parse_verdict("After review, this claim should be approved per clause 3.");
    assert_eq!(parsed.verdict, Verdict::Approved);
    assert!(!parsed.matched_marker);

    let parsed = parse_verdict("The claim must be rejected due to the exclusion.");
    assert_eq!(parsed.verdict, Verdict::Rejected);
  }

  #[test]
  fn test_keyword_fallback_rejection_wins_over_approval() {
    // Prose mentioning both outcomes must fail closed
    let parsed = parse_verdict("The claim is rejected, it should not be approved per clause 4.");
    assert_eq!(parsed.verdict, Verdict::Rejected);
    assert!(!parsed.matched_marker);
  }

  #[test]
  fn test_empty_response_rejected() {
    let parsed = parse_verdict("");
    assert_eq!(parsed.verdict, Verdict::Rejected);
    assert!(!parsed.matched_marker);
    assert_eq!(parsed.amount, None);
  }

  #[test]
  fn test_amount_ladder_priority() {
    // COVERAGE AMOUNT outranks a rupee sign later in the text
    let text = "COVERAGE AMOUNT: 50000\nPolicy limit ₹500000";
    assert_eq!(parse_amount(text), Some(50_000));
  }

  #[test]
  fn test_amount_currency_notations() {
    assert_eq!(parse_amount("approved for ₹75000"), Some(75_000));
    assert_eq!(parse_amount("approved for Rs. 75000"), Some(75_000));
    assert_eq!(parse_amount("approved for Rs 75000"), Some(75_000));
    assert_eq!(parse_amount("approved for INR 75000"), Some(75_000));
    assert_eq!(parse_amount("approved for 75000 rupees"), Some(75_000));
    assert_eq!(parse_amount("approved for 75000 rs"), Some(75_000));
  }

  #[test]
  fn test_amount_absent() {
    assert_eq!(parse_amount("DECISION: APPROVED with no figure given"), None);
  }
}
