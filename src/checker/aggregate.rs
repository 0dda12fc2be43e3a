//! Merging per-method verdicts into one verdict per provider

use super::method::{validate_method, MethodValidation};
use crate::config::{MethodSpec, Provider};
use crate::error::CheckError;
use crate::rpc::{MethodCaller, RequestOutcome};
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;

/// Diagnostics for one method a provider failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedMethod {
    /// Raw outcome from the provider
    pub result: Option<RequestOutcome>,
    /// Raw outcome from the reference provider
    pub reference_result: Option<RequestOutcome>,
    pub error: Option<CheckError>,
}

/// A provider's verdict across every configured method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderValidationResult {
    /// True only if every method passed
    pub valid: bool,
    /// Method name -> failure details
    pub failed_methods: HashMap<String, FailedMethod>,
}

impl Default for ProviderValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            failed_methods: HashMap::new(),
        }
    }
}

impl ProviderValidationResult {
    fn record_failure(&mut self, method: &str, failure: FailedMethod) {
        self.valid = false;
        self.failed_methods.insert(method.to_string(), failure);
    }
}

/// Validate every method and combine the verdicts per candidate
///
/// Methods are independent, so they are validated concurrently.
pub async fn validate_all_methods(
    specs: &[MethodSpec],
    reference: &Provider,
    candidates: &[Provider],
    caller: &dyn MethodCaller,
    timeout: Duration,
) -> HashMap<String, ProviderValidationResult> {
    let validations = join_all(
        specs
            .iter()
            .map(|spec| validate_method(spec, reference, candidates, caller, timeout)),
    )
    .await;

    aggregate(candidates, &validations)
}

/// Fold method validations into one result per candidate
pub fn aggregate(
    candidates: &[Provider],
    validations: &[MethodValidation],
) -> HashMap<String, ProviderValidationResult> {
    candidates
        .iter()
        .map(|provider| {
            let mut summary = ProviderValidationResult::default();

            for validation in validations {
                match validation.results.get(&provider.name) {
                    Some(check) if check.valid => {}
                    Some(check) => summary.record_failure(
                        &validation.method,
                        FailedMethod {
                            result: check.outcome.clone(),
                            reference_result: validation.reference.clone(),
                            error: check.error.clone(),
                        },
                    ),
                    None => summary.record_failure(
                        &validation.method,
                        FailedMethod {
                            result: None,
                            reference_result: validation.reference.clone(),
                            error: Some(CheckError::MissingResult),
                        },
                    ),
                }
            }

            (provider.name.clone(), summary)
        })
        .collect()
}
