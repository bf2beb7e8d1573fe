//! Natural-language claim parsing.
//!
//! Turns free text like "46M, knee surgery in Pune, 3-month policy" into a
//! typed [`Claim`]. Extraction is regex plus synonym tables; anything the
//! text does not state falls back to a documented default, and numeric
//! fields are clamped into the ranges `Claim::new` accepts.

use claimlens_core::{Claim, Gender, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static AGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)[\s-]*(?:years?[\s-]*old|y\.?o\.?|age|[mf]\b)").unwrap());
static DURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*-?\s*(?:months?|mo\.?\b)").unwrap());
static MALE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(male|man|boy|he|his)\b|\d+\s*m\b").unwrap());
static FEMALE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(female|woman|girl|she|her)\b|\d+\s*f\b").unwrap());

/// Canonical procedure names with the phrasings that map to them
const PROCEDURE_SYNONYMS: &[(&str, &[&str])] = &[
  ("cataract surgery", &["cataract", "lens replacement", "eye surgery"]),
  ("heart surgery", &["heart surgery", "cardiac surgery", "bypass surgery", "angioplasty"]),
  ("knee replacement", &["knee replacement", "knee surgery", "arthroplasty"]),
  ("appendectomy", &["appendectomy", "appendix removal", "appendicitis surgery"]),
  ("dental treatment", &["dental", "tooth", "oral surgery"]),
  ("cosmetic surgery", &["cosmetic", "plastic surgery", "aesthetic surgery"]),
  ("emergency treatment", &["emergency", "urgent care"]),
];

/// Canonical city names with accepted variants
const CITY_SYNONYMS: &[(&str, &[&str])] = &[
  ("Pune", &["pune", "puna"]),
  ("Mumbai", &["mumbai", "bombay"]),
  ("Delhi", &["delhi", "new delhi"]),
  ("Bangalore", &["bangalore", "bengaluru"]),
  ("Chennai", &["chennai", "madras"]),
  ("Hyderabad", &["hyderabad"]),
  ("Kolkata", &["kolkata", "calcutta"]),
];

const DEFAULT_AGE: u32 = 40;
const DEFAULT_PROCEDURE: &str = "general treatment";
const DEFAULT_LOCATION: &str = "Pune";
const DEFAULT_DURATION_MONTHS: u32 = 12;

/// Parse a free-text claim description into a validated [`Claim`].
///
/// Missing fields take defaults (40-year-old male, general treatment in
/// Pune, 12-month policy); out-of-range numbers are clamped rather than
/// rejected, since the text already told us roughly what was meant.
pub fn parse_claim(text: &str) -> Result<Claim> {
  let lower = text.to_lowercase();

  let age = AGE
    .captures(&lower)
    .and_then(|c| c[1].parse::<u32>().ok())
    .map(|a| a.clamp(1, 120))
    .unwrap_or(DEFAULT_AGE);

  let gender = if MALE.is_match(&lower) {
    Gender::Male
  } else if FEMALE.is_match(&lower) {
    Gender::Female
  } else {
    Gender::Male
  };

  let procedure = PROCEDURE_SYNONYMS
    .iter()
    .find(|(_, synonyms)| synonyms.iter().any(|s| lower.contains(s)))
    .map(|(canonical, _)| *canonical)
    .unwrap_or(DEFAULT_PROCEDURE);

  let location = CITY_SYNONYMS
    .iter()
    .find(|(_, synonyms)| synonyms.iter().any(|s| lower.contains(s)))
    .map(|(canonical, _)| *canonical)
    .unwrap_or(DEFAULT_LOCATION);

  let duration = DURATION
    .captures(&lower)
    .and_then(|c| c[1].parse::<u32>().ok())
    .map(|d| d.clamp(1, 120))
    .unwrap_or(DEFAULT_DURATION_MONTHS);

  Claim::new(age, gender, procedure, location, duration)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_full_sentence() {
    let claim = parse_claim("I'm a 45-year-old male who needs cataract surgery in Pune. My policy is 24 months old.")
      .unwrap();

    assert_eq!(claim.age, 45);
    assert_eq!(claim.gender, Gender::Male);
    assert_eq!(claim.procedure, "cataract surgery");
    assert_eq!(claim.location, "Pune");
    assert_eq!(claim.policy_duration_months, 24);
  }

  #[test]
  fn test_parse_terse_form() {
    let claim = parse_claim("46M, knee surgery in Pune, 3-month policy").unwrap();

    assert_eq!(claim.age, 46);
    assert_eq!(claim.gender, Gender::Male);
    assert_eq!(claim.procedure, "knee replacement");
    assert_eq!(claim.policy_duration_months, 3);
  }

  #[test]
  fn test_parse_female_with_city_variant() {
    let claim = parse_claim("Female patient, 32 years old, dental treatment in Bombay. Policy duration 6 months.")
      .unwrap();

    assert_eq!(claim.gender, Gender::Female);
    assert_eq!(claim.procedure, "dental treatment");
    assert_eq!(claim.location, "Mumbai");
    assert_eq!(claim.policy_duration_months, 6);
  }

  #[test]
  fn test_missing_fields_take_defaults() {
    let claim = parse_claim("needs some help").unwrap();

    assert_eq!(claim.age, 40);
    assert_eq!(claim.gender, Gender::Male);
    assert_eq!(claim.procedure, "general treatment");
    assert_eq!(claim.location, "Pune");
    assert_eq!(claim.policy_duration_months, 12);
  }

  #[test]
  fn test_out_of_range_numbers_clamped() {
    let claim = parse_claim("300 years old male, cataract, 500 months policy in Delhi").unwrap();

    assert_eq!(claim.age, 120);
    assert_eq!(claim.policy_duration_months, 120);
  }

  #[test]
  fn test_synonym_maps_to_canonical_procedure() {
    let claim = parse_claim("55 year old man needs angioplasty in Chennai, 18 months policy").unwrap();
    assert_eq!(claim.procedure, "heart surgery");
    assert_eq!(claim.location, "Chennai");
  }
}
