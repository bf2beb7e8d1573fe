use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Patient gender as recorded on the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  pub fn as_str(&self) -> &'static str {
    match self {
      Gender::Male => "male",
      Gender::Female => "female",
    }
  }
}

impl std::fmt::Display for Gender {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Gender {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "male" | "m" => Ok(Gender::Male),
      "female" | "f" => Ok(Gender::Female),
      _ => Err(format!("Unknown gender: {}", s)),
    }
  }
}

/// A single insurance claim - the immutable input record for one evaluation.
///
/// Construct via [`Claim::new`] so field validation happens at the boundary
/// rather than deep inside the reasoning logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
  /// Patient age in years (1..=120)
  pub age: u32,
  pub gender: Gender,
  /// Procedure name, lower-cased for rule matching
  pub procedure: String,
  /// Treatment location (city)
  pub location: String,
  /// How long the policy has been active, in months (1..=120)
  pub policy_duration_months: u32,
}

impl Claim {
  pub fn new(
    age: u32,
    gender: Gender,
    procedure: impl Into<String>,
    location: impl Into<String>,
    policy_duration_months: u32,
  ) -> Result<Self> {
    let procedure: String = procedure.into();
    let location: String = location.into();

    if !(1..=120).contains(&age) {
      return Err(Error::Validation(format!("age {} out of range 1..=120", age)));
    }
    if procedure.trim().is_empty() {
      return Err(Error::Validation("procedure must not be empty".to_string()));
    }
    if !(1..=120).contains(&policy_duration_months) {
      return Err(Error::Validation(format!(
        "policy_duration_months {} out of range 1..=120",
        policy_duration_months
      )));
    }

    Ok(Self {
      age,
      gender,
      procedure: procedure.trim().to_lowercase(),
      location: location.trim().to_string(),
      policy_duration_months,
    })
  }

  /// Procedure name as used for table matching
  pub fn procedure_lower(&self) -> &str {
    &self.procedure
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_claim_lowercases_procedure() {
    let claim = Claim::new(45, Gender::Male, "Cataract Surgery", "Pune", 24).unwrap();
    assert_eq!(claim.procedure, "cataract surgery");
  }

  #[test]
  fn test_claim_rejects_bad_age() {
    assert!(Claim::new(0, Gender::Male, "surgery", "Pune", 12).is_err());
    assert!(Claim::new(121, Gender::Male, "surgery", "Pune", 12).is_err());
  }

  #[test]
  fn test_claim_rejects_empty_procedure() {
    assert!(Claim::new(40, Gender::Female, "  ", "Mumbai", 12).is_err());
  }

  #[test]
  fn test_claim_rejects_bad_duration() {
    assert!(Claim::new(40, Gender::Female, "surgery", "Mumbai", 0).is_err());
  }

  #[test]
  fn test_gender_parse() {
    assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
    assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
    assert!("other".parse::<Gender>().is_err());
  }
}
