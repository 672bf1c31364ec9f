// src/config.rs
// Validated run configuration and timing defaults

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ReportError, Result};
use crate::http::RetryPolicy;

/// File read in debug mode unless `--file` says otherwise
pub const DEFAULT_DATA_FILE: &str = "indexes.json";
/// Default day window sent to the endpoint
pub const DEFAULT_DAYS: i64 = 7;

/// Whole run, ingestion plus reporting
pub const RUN_DEADLINE: Duration = Duration::from_secs(60);
/// One HTTP load, all attempts and backoff included
pub const OPERATION_DEADLINE: Duration = Duration::from_secs(30);
/// A single HTTP attempt
pub const ATTEMPT_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub run: Duration,
    pub operation: Duration,
    pub attempt: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            run: RUN_DEADLINE,
            operation: OPERATION_DEADLINE,
            attempt: ATTEMPT_DEADLINE,
        }
    }
}

/// Wire convention used against the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ApiMode {
    /// One GET with `?days=N`
    #[default]
    Query,
    /// One `_cat/indices/*YYYY*MM*DD` GET per day of the window
    Cat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    File { path: PathBuf },
    Http { endpoint: Url, days: u32, api: ApiMode },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub source: SourceConfig,
    pub top: usize,
    pub timeouts: Timeouts,
    pub retry: RetryPolicy,
}

impl RunConfig {
    pub fn new(source: SourceConfig, top: usize) -> Self {
        Self {
            source,
            top,
            timeouts: Timeouts::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Parse `--endpoint`: an absolute http(s) URL
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ReportError::usage("--endpoint is required unless --debug is set"));
    }
    let url = Url::parse(raw)
        .map_err(|e| ReportError::usage(format!("invalid --endpoint {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        "http" | "https" => Err(ReportError::usage(format!("--endpoint {raw:?} has no host"))),
        other => Err(ReportError::usage(format!(
            "--endpoint must use http or https, got {other:?}"
        ))),
    }
}

/// Check a numeric flag is at least 1 and fits the target type
pub fn positive<T: TryFrom<i64>>(flag: &str, value: i64) -> Result<T> {
    if value < 1 {
        return Err(ReportError::usage(format!("--{flag} must be >= 1, got {value}")));
    }
    T::try_from(value).map_err(|_| ReportError::usage(format!("--{flag} is too large: {value}")))
}
