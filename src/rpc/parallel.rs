//! Parallel fan-out of one call across many providers

use super::{MethodCaller, RequestOutcome};
use crate::config::Provider;
use crate::error::RpcError;
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// Deadline used when `now + timeout` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Run `call` against every provider concurrently under one shared deadline
///
/// The returned map holds exactly one outcome per provider, keyed by name.
/// Each call writes only its own slot of a pre-sized result vector, so no
/// shared map is touched while calls are in flight. A provider whose call
/// has not finished when the deadline fires gets a
/// [`RpcError::DeadlineExceeded`] outcome and its call is dropped.
///
/// Names are expected to be unique; on duplicates the last one wins.
pub async fn run_parallel<'a, F, Fut>(
    providers: &'a [Provider],
    timeout: Duration,
    call: F,
) -> HashMap<String, RequestOutcome>
where
    F: Fn(&'a Provider) -> Fut,
    Fut: Future<Output = RequestOutcome> + 'a,
{
    if providers.is_empty() {
        return HashMap::new();
    }

    let started = Instant::now();
    let deadline = started
        .checked_add(timeout)
        .unwrap_or_else(|| started + FAR_FUTURE);

    let tasks = providers.iter().map(|provider| {
        let fut = call(provider);
        async move {
            match timeout_at(deadline, fut).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::debug!(provider = %provider.name, "deadline fired before call completed");
                    RequestOutcome::failure(
                        RpcError::DeadlineExceeded(timeout.as_millis() as u64),
                        started.elapsed(),
                    )
                }
            }
        }
    });

    let outcomes = join_all(tasks).await;

    providers
        .iter()
        .zip(outcomes)
        .map(|(provider, outcome)| (provider.name.clone(), outcome))
        .collect()
}

/// Call one JSON-RPC method on every provider in parallel
pub async fn parallel_call_method(
    caller: &dyn MethodCaller,
    providers: &[Provider],
    method: &str,
    params: &[Value],
    timeout: Duration,
) -> HashMap<String, RequestOutcome> {
    run_parallel(providers, timeout, |provider| {
        caller.call_method(provider, method, params, timeout)
    })
    .await
}
