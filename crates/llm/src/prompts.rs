//! Prompt construction for claim evaluation.
//!
//! The response format is labeled plain text rather than JSON: the markers
//! survive partial or sloppy completions, and the engine's parser degrades
//! to keyword matching when even the markers are missing.

use claimlens_core::Claim;

const RESPONSE_FORMAT: &str = "\
Please provide your response in the following format:

DECISION: [APPROVED/REJECTED]

REASONING: [Detailed explanation with specific clause references. For rejections, clearly explain the specific waiting period, exclusion, or condition that was not met.]

COVERAGE AMOUNT: [Specific amount in rupees if approved, 0 if rejected]

RELEVANT CLAUSES: [List the specific clause numbers that support your decision]

POLICY LIMITS: [Any sum insured or policy limits mentioned in the clauses]

WAITING PERIOD CHECK: [State the waiting period requirement and whether it was met]

EXCLUSION CHECK: [State any exclusions found and whether they apply]";

/// Build the evaluation prompt for one claim against its retrieved clauses.
///
/// Clauses are numbered from 1 so the model's clause references line up with
/// the reasoning trace's `Clause N` references.
pub fn build_evaluation_prompt(claim: &Claim, chunks: &[String]) -> String {
  let clauses = chunks
    .iter()
    .enumerate()
    .map(|(i, chunk)| format!("Clause {}: {}", i + 1, chunk))
    .collect::<Vec<_>>()
    .join("\n\n");

  format!(
    "You are an expert insurance claim evaluator. Your task is to analyze the claim request against the provided policy clauses and make a precise decision.

CLAIM REQUEST:
- Age: {age} years
- Gender: {gender}
- Procedure: {procedure}
- Location: {location}
- Policy Duration: {duration} months

RELEVANT POLICY CLAUSES:
{clauses}

DECISION CRITERIA - APPROVE ONLY IF ALL CONDITIONS ARE MET:
1. WAITING PERIOD MET: Policy duration >= required waiting period for the procedure
2. NO EXCLUSIONS: Procedure is not explicitly excluded in policy clauses
3. COVERED PROCEDURE: Procedure is listed as covered or not explicitly excluded
4. POLICY ACTIVE: Policy is in force and not expired

SPECIFIC WAITING PERIOD REQUIREMENTS:
- Cataract surgery: 24 months
- Specified diseases: 24 months
- Pre-existing conditions: 36 months
- General procedures: 30 days

SPECIFIC EXCLUSIONS TO CHECK:
- Cosmetic surgery (unless reconstruction after accident/cancer)
- Dental treatment (unless emergency due to accident)
- Experimental treatments
- Refractive eye surgery (unless medically necessary)

CRITICAL: Default to REJECT if any condition is unclear or missing.

{format}",
    age = claim.age,
    gender = claim.gender,
    procedure = claim.procedure,
    location = claim.location,
    duration = claim.policy_duration_months,
    clauses = clauses,
    format = RESPONSE_FORMAT,
  )
}
