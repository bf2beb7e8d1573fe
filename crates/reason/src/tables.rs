//! Rule tables applied to claim procedures.
//!
//! All matching is case-folded substring matching over the procedure text;
//! callers lowercase once at the boundary (`Claim::new` already does).

use claimlens_core::Claim;

/// Waiting period in months keyed by procedure class, first hit wins.
/// A zero entry means the class is governed by exclusion rules instead.
const WAITING_PERIODS: &[(&str, u32)] = &[
  ("cataract", 24),
  ("heart surgery", 24),
  ("knee replacement", 24),
  ("dental", 0),
  ("cosmetic", 0),
];

/// Procedure classes carrying the standard 24-month specified-disease
/// waiting period.
pub const SPECIFIED_DISEASES: &[&str] = &[
  "cataract",
  "hernia",
  "fistula",
  "sinus",
  "haemorrhoids",
  "piles",
  "hydrocele",
  "fibromyoma",
  "endometriosis",
  "hysterectomy",
  "uterine prolapse",
  "stones",
  "tumors",
  "cysts",
  "gall bladder",
  "pancreatitis",
  "cirrhosis",
  "gout",
  "rheumatism",
  "tonsilitis",
  "varicose veins",
  "kidney disease",
  "alzheimer",
  "joint replacement",
  "vertebral column",
  "nasal septum",
  "turbinate",
  "congenital",
  "refractive error",
  "bariatric",
  "parkinson",
  "genetic",
];

pub const SPECIFIED_DISEASE_MONTHS: u32 = 24;

/// Excluded procedure classes with the canned rejection reason
const EXCLUSIONS: &[(&str, &str)] = &[
  ("cosmetic", "Cosmetic surgery is excluded unless reconstruction after accident"),
  ("dental", "Dental treatment is excluded unless emergency due to accident"),
  ("experimental", "Experimental treatments are excluded"),
  ("refractive", "Refractive eye surgery is excluded unless medically necessary"),
];

/// Waiting period required for `procedure`, if any class matches.
///
/// Consults the explicit per-class table first, then the specified-disease
/// list, so a specified disease like hernia gets the standard 24 months
/// without its own entry. Returns `None` for unlisted procedures (no waiting
/// period applies).
pub fn required_waiting_period(procedure: &str) -> Option<u32> {
  WAITING_PERIODS
    .iter()
    .find(|(class, _)| procedure.contains(class))
    .map(|(_, months)| *months)
    .or_else(|| {
      SPECIFIED_DISEASES
        .iter()
        .find(|d| procedure.contains(*d))
        .map(|_| SPECIFIED_DISEASE_MONTHS)
    })
}

/// Canned exclusion reason for `procedure`, if an excluded class matches.
/// Emergency dental treatment is not excluded.
pub fn exclusion_reason(procedure: &str) -> Option<&'static str> {
  EXCLUSIONS
    .iter()
    .find(|(class, _)| {
      if *class == "dental" {
        procedure.contains("dental") && !procedure.contains("emergency")
      } else {
        procedure.contains(class)
      }
    })
    .map(|(_, reason)| *reason)
}

/// Hard policy violations found for a claim, independent of the model's view
#[derive(Debug, Clone, Default)]
pub struct PolicyIssues {
  pub waiting_period: Vec<String>,
  pub exclusions: Vec<String>,
}

impl PolicyIssues {
  pub fn is_empty(&self) -> bool {
    self.waiting_period.is_empty() && self.exclusions.is_empty()
  }

  pub fn all(&self) -> impl Iterator<Item = &str> {
    self.waiting_period.iter().chain(self.exclusions.iter()).map(String::as_str)
  }
}

/// Check a claim against the waiting-period and exclusion tables.
///
/// Accident claims bypass waiting periods entirely; they are only flagged
/// when a retrieved clause explicitly excludes accident cover. For all other
/// claims the specified-disease table drives the waiting-period check and
/// the exclusion table the exclusion check.
pub fn policy_issues(claim: &Claim, chunks: &[String]) -> PolicyIssues {
  let mut issues = PolicyIssues::default();
  let procedure = claim.procedure.as_str();

  if procedure.contains("accident") {
    for chunk in chunks {
      let lower = chunk.to_lowercase();
      if lower.contains("accident") && (lower.contains("excluded") || lower.contains("not covered")) {
        issues.exclusions.push("Accident claims are excluded by policy clause".to_string());
      }
    }
    return issues;
  }

  if let Some(disease) = SPECIFIED_DISEASES.iter().find(|d| procedure.contains(*d))
    && claim.policy_duration_months < SPECIFIED_DISEASE_MONTHS
  {
    issues.waiting_period.push(format!(
      "{} procedures require {} months waiting period, but only {} months have passed",
      title_case(disease),
      SPECIFIED_DISEASE_MONTHS,
      claim.policy_duration_months
    ));
  }

  if let Some(reason) = exclusion_reason(procedure) {
    issues.exclusions.push(reason.to_string());
  }

  issues
}

fn title_case(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}
