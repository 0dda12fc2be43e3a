//! Provider validation against a trusted reference
//!
//! The pipeline per chain is:
//!
//! 1. [`validate_method`] fans one method out to the reference and every
//!    candidate, then compares each candidate's numeric result with the
//!    reference's under the method's [`Comparison`].
//! 2. [`validate_all_methods`] runs every configured method and folds the
//!    verdicts into one [`ProviderValidationResult`] per candidate.
//! 3. [`ChainValidationRunner`] does this for every chain with a reference
//!    and hands the surviving providers to an output sink.

mod aggregate;
mod compare;
mod method;
mod runner;

pub use aggregate::{aggregate, validate_all_methods, FailedMethod, ProviderValidationResult};
pub use compare::{parse_hex_result, Comparison, Verdict};
pub use method::{validate_method, CheckResult, MethodValidation};
pub use runner::{select_valid, ChainResults, ChainValidationRunner, ValidationPass};
