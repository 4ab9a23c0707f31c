use reqwest::StatusCode;
use std::future::Future;
use tracing::debug;

use crate::error::AuthError;

/// Errors that may carry the HTTP status of the failed request.
pub trait HasStatus {
    fn http_status(&self) -> Option<StatusCode>;
}

impl HasStatus for AuthError {
    fn http_status(&self) -> Option<StatusCode> {
        self.status()
    }
}

/// Retry predicate for data queries: never retry a 404, otherwise allow
/// `max_failures` retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_failures: u32,
    pub stop_on: Vec<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_failures: 2,
            stop_on: vec![StatusCode::NOT_FOUND],
        }
    }
}

impl RetryPolicy {
    /// `failure_count` is the number of failures seen before this one.
    pub fn should_retry(&self, failure_count: u32, status: Option<StatusCode>) -> bool {
        if let Some(status) = status {
            if self.stop_on.contains(&status) {
                return false;
            }
        }
        failure_count < self.max_failures
    }

    /// Runs `op` until it succeeds or the policy gives up, returning the last error.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: HasStatus,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut failures = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !self.should_retry(failures, err.http_status()) {
                        return Err(err);
                    }
                    failures += 1;
                    debug!(failures, "retrying failed query");
                }
            }
        }
    }
}
