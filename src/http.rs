// src/http.rs
// GET with deadlines and server-error retry for the index metadata endpoint

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use reqwest::header::ACCEPT;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

use crate::config::Timeouts;
use crate::error::{ReportError, Result};

/// Retries after the first attempt, 5xx only
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Backoff ceiling for the first retry (doubles each retry)
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(500);
/// Upper bound on any backoff ceiling
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: DEFAULT_BASE_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Largest delay allowed before retry number `retry` (0-based)
    pub fn ceiling(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Full jitter: uniform in `[0, ceiling(retry)]`
    pub fn delay<R: Rng>(&self, retry: u32, rng: &mut R) -> Duration {
        let ceiling = u64::try_from(self.ceiling(retry).as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rng.random_range(0..=ceiling))
    }
}

/// Everything a source needs to build a [`Fetcher`] when it loads
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    pub timeouts: Timeouts,
    pub retry: RetryPolicy,
    /// Deadline imposed by the caller, if any
    pub outer_deadline: Option<Instant>,
}

/// HTTP client for one ingestion call.
///
/// All requests made through one fetcher share a single deadline: the
/// operation budget from construction, or the caller's deadline if sooner.
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
    attempt_timeout: Duration,
    budget: Duration,
    deadline: Instant,
}

impl Fetcher {
    pub fn new(settings: &FetchSettings) -> Self {
        let client = Client::builder()
            .connect_timeout(settings.timeouts.attempt)
            .build()
            .unwrap_or_else(|_| Client::new());

        let start = Instant::now();
        let mut deadline = start + settings.timeouts.operation;
        if let Some(outer) = settings.outer_deadline {
            deadline = deadline.min(outer);
        }

        Self {
            client,
            retry: settings.retry,
            attempt_timeout: settings.timeouts.attempt,
            budget: deadline.saturating_duration_since(start),
            deadline,
        }
    }

    /// GET `url` asking for JSON and return the response body.
    ///
    /// Server errors are retried with jittered backoff. Client errors,
    /// transport failures and timeouts end the call immediately.
    pub async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        let label = url.to_string();
        let mut retries = 0;

        loop {
            let remaining = self.deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.out_of_budget(&label));
            }
            let attempt_timeout = remaining.min(self.attempt_timeout);

            debug!(url = %label, attempt = retries + 1, timeout = ?attempt_timeout, "GET");
            let sent = self
                .client
                .get(url.clone())
                .header(ACCEPT, "application/json")
                .timeout(attempt_timeout)
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(e) => return Err(transport_error(&label, e, attempt_timeout)),
            };

            let status = response.status();
            if status.is_success() {
                return match response.bytes().await {
                    Ok(body) => {
                        debug!(url = %label, bytes = body.len(), "response received");
                        Ok(body.to_vec())
                    }
                    Err(e) => Err(transport_error(&label, e, attempt_timeout)),
                };
            }

            if !status.is_server_error() {
                return Err(ReportError::Request { url: label, status });
            }

            if retries >= self.retry.max_retries {
                return Err(ReportError::Upstream {
                    url: label,
                    status,
                    attempts: retries + 1,
                });
            }

            let delay = self.retry.delay(retries, &mut rand::rng());
            if Instant::now() + delay >= self.deadline {
                return Err(self.out_of_budget(&label));
            }
            info!(
                url = %label,
                status = %status,
                retry = retries + 1,
                "Server error, retrying in {:?}...",
                delay
            );
            tokio::time::sleep(delay).await;
            retries += 1;
        }
    }

    fn out_of_budget(&self, label: &str) -> ReportError {
        ReportError::Timeout {
            input: label.to_string(),
            limit: self.budget,
        }
    }
}

fn transport_error(label: &str, err: reqwest::Error, limit: Duration) -> ReportError {
    if err.is_timeout() {
        ReportError::Timeout {
            input: label.to_string(),
            limit,
        }
    } else {
        ReportError::Network {
            url: label.to_string(),
            source: err,
        }
    }
}
