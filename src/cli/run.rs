// src/cli/run.rs
// Load the dataset, run the analyzers, render the report

use tokio::time::Instant;
use tracing::info;

use crate::config::RunConfig;
use crate::error::{ReportError, Result};
use crate::report::Report;
use crate::source::{self, DataSource};

/// Run once under the configured run deadline and return the report text.
///
/// Ingestion finishes completely before any analyzer runs.
pub async fn run(config: &RunConfig) -> Result<String> {
    let deadline = Instant::now() + config.timeouts.run;
    let source = source::from_config(config, deadline);

    match tokio::time::timeout_at(deadline, produce(config, source.as_ref())).await {
        Ok(result) => result,
        Err(_) => Err(ReportError::Timeout {
            input: source.describe(),
            limit: config.timeouts.run,
        }),
    }
}

async fn produce(config: &RunConfig, source: &dyn DataSource) -> Result<String> {
    info!(source = %source.describe(), "Loading index metadata");

    let indexes = source.load().await?;
    info!(count = indexes.len(), "Loaded index metadata");

    let report = Report::build(&indexes, config.top)?;
    Ok(report.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiMode, SourceConfig, Timeouts};
    use crate::error::ErrorKind;
    use crate::http::RetryPolicy;
    use crate::report::{LARGEST_TITLE, LEAST_BALANCED_TITLE, MOST_SHARDS_TITLE};
    use crate::test_support::{MockServer, Reply};
    use std::io::Write;
    use std::time::Duration;

    const DATASET: &str = r#"[
        {"name": "a", "primaries": 1, "replicas": 0, "size_bytes": 100, "doc_count": 1},
        {"name": "b", "primaries": 1, "replicas": 0, "size_bytes": 300, "doc_count": 1},
        {"name": "c", "primaries": 1, "replicas": 0, "size_bytes": 200, "doc_count": 1}
    ]"#;

    fn http_config(server: &MockServer) -> RunConfig {
        let mut config = RunConfig::new(
            SourceConfig::Http {
                endpoint: server.url("/indexes"),
                days: 7,
                api: ApiMode::Query,
            },
            10,
        );
        config.retry = RetryPolicy {
            max_retries: 3,
            base_backoff: Duration::from_millis(5),
            max_backoff: Duration::from_millis(20),
        };
        config
    }

    #[tokio::test]
    async fn test_file_run_prints_sections_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();
        let config = RunConfig::new(
            SourceConfig::File {
                path: file.path().to_path_buf(),
            },
            2,
        );

        let out = run(&config).await.unwrap();
        let largest = out.find(LARGEST_TITLE).unwrap();
        let shards = out.find(MOST_SHARDS_TITLE).unwrap();
        let balance = out.find(LEAST_BALANCED_TITLE).unwrap();
        assert!(largest < shards && shards < balance);
        assert!(out.contains("b  300B  total_shards=1 size=300\nc  200B"));
        assert!(out.ends_with("Least balanced indexes\n<empty>\n"));
    }

    #[tokio::test]
    async fn test_http_run_survives_two_503s() {
        let server = MockServer::start(vec![
            Reply::status(503, "Service Unavailable"),
            Reply::status(503, "Service Unavailable"),
            Reply::ok(DATASET),
        ])
        .await;

        let out = run(&http_config(&server)).await.unwrap();
        assert_eq!(out.matches("\n\n").count(), 2);
        assert!(out.contains("b  300B"));
    }

    #[tokio::test]
    async fn test_http_run_fails_after_four_503s() {
        let server = MockServer::start(vec![Reply::status(503, "Service Unavailable"); 4]).await;

        let err = run(&http_config(&server)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_run_deadline_bounds_silent_endpoint() {
        let server = MockServer::start(vec![Reply::Silent]).await;
        let mut config = http_config(&server);
        config.timeouts = Timeouts {
            run: Duration::from_millis(200),
            operation: Duration::from_secs(30),
            attempt: Duration::from_secs(10),
        };

        let started = std::time::Instant::now();
        let err = run(&config).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.exit_code(), 3);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(err.to_string().contains(server.url("/indexes").as_str()));
    }

    #[tokio::test]
    async fn test_zero_top_is_usage_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();
        let config = RunConfig::new(
            SourceConfig::File {
                path: file.path().to_path_buf(),
            },
            0,
        );

        let err = run(&config).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }
}
