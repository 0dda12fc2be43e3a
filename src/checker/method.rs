//! Validation of one JSON-RPC method against the reference provider

use super::compare::parse_hex_result;
use crate::config::{MethodSpec, Provider};
use crate::error::CheckError;
use crate::rpc::{parallel_call_method, MethodCaller, RequestOutcome};
use num_bigint::BigUint;
use std::collections::HashMap;
use std::time::Duration;

/// One provider's verdict for one method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub valid: bool,
    /// `|reference - candidate|`, only when both values parsed
    pub diff: Option<BigUint>,
    /// The candidate's own call outcome
    pub outcome: Option<RequestOutcome>,
    pub error: Option<CheckError>,
}

impl CheckResult {
    fn invalid(outcome: Option<RequestOutcome>, error: CheckError) -> Self {
        Self {
            valid: false,
            diff: None,
            outcome,
            error: Some(error),
        }
    }
}

/// Results of validating one method across all candidates
#[derive(Debug, Clone)]
pub struct MethodValidation {
    pub method: String,
    /// Reference provider's outcome, kept for diagnostics
    pub reference: Option<RequestOutcome>,
    /// Candidate name -> verdict
    pub results: HashMap<String, CheckResult>,
}

/// Query the reference and every candidate for `spec`, then judge each candidate
///
/// If the reference call fails or its value cannot be parsed, every
/// candidate is invalid and no comparison is made. Candidate names must be
/// unique and must differ from the reference name.
pub async fn validate_method(
    spec: &MethodSpec,
    reference: &Provider,
    candidates: &[Provider],
    caller: &dyn MethodCaller,
    timeout: Duration,
) -> MethodValidation {
    let mut all = Vec::with_capacity(candidates.len() + 1);
    all.push(reference.clone());
    all.extend(candidates.iter().cloned());

    let mut outcomes =
        parallel_call_method(caller, &all, &spec.method, &spec.params, timeout).await;
    let reference_outcome = outcomes.remove(&reference.name);

    let results = judge(spec, reference, reference_outcome.as_ref(), candidates, outcomes);

    MethodValidation {
        method: spec.method.clone(),
        reference: reference_outcome,
        results,
    }
}

fn judge(
    spec: &MethodSpec,
    reference: &Provider,
    reference_outcome: Option<&RequestOutcome>,
    candidates: &[Provider],
    mut outcomes: HashMap<String, RequestOutcome>,
) -> HashMap<String, CheckResult> {
    let mut take = |name: &str| outcomes.remove(name);

    let reference_body = match reference_outcome.map(|o| &o.result) {
        Some(Ok(body)) => body,
        failed => {
            let cause = match failed {
                Some(Err(e)) => e.to_string(),
                _ => "no result".to_string(),
            };
            tracing::warn!(
                method = %spec.method,
                reference = %reference.name,
                %cause,
                "reference provider failed, marking all candidates invalid"
            );
            return candidates
                .iter()
                .map(|p| {
                    let error = CheckError::ReferenceFailed {
                        reference: reference.name.clone(),
                        cause: cause.clone(),
                    };
                    (p.name.clone(), CheckResult::invalid(take(&p.name), error))
                })
                .collect();
        }
    };

    let reference_value = match parse_hex_result(reference_body) {
        Ok(value) => value,
        Err(reason) => {
            tracing::warn!(
                method = %spec.method,
                reference = %reference.name,
                %reason,
                "reference response unparseable, marking all candidates invalid"
            );
            return candidates
                .iter()
                .map(|p| {
                    let error = CheckError::ReferenceParse {
                        reference: reference.name.clone(),
                        reason: reason.clone(),
                    };
                    (p.name.clone(), CheckResult::invalid(take(&p.name), error))
                })
                .collect();
        }
    };

    candidates
        .iter()
        .map(|provider| {
            let result = match take(&provider.name) {
                None => CheckResult::invalid(None, CheckError::MissingResult),
                Some(outcome) => match &outcome.result {
                    Err(e) => {
                        let error = CheckError::Call(e.clone());
                        CheckResult::invalid(Some(outcome), error)
                    }
                    Ok(body) => match parse_hex_result(body) {
                        Err(reason) => {
                            CheckResult::invalid(Some(outcome), CheckError::ProviderParse(reason))
                        }
                        Ok(value) => {
                            let verdict = spec.comparison.evaluate(&reference_value, &value);
                            tracing::debug!(
                                method = %spec.method,
                                provider = %provider.name,
                                diff = %verdict.diff,
                                valid = verdict.valid,
                                "compared with reference"
                            );
                            CheckResult {
                                valid: verdict.valid,
                                diff: Some(verdict.diff),
                                outcome: Some(outcome),
                                error: None,
                            }
                        }
                    },
                },
            };
            (provider.name.clone(), result)
        })
        .collect()
}
