// src/source/mod.rs
// Ingestion sources producing the index dataset

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;

use crate::config::{ApiMode, RunConfig, SourceConfig};
use crate::error::Result;
use crate::http::FetchSettings;
use crate::model::IndexInfo;

pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::{CatSource, HttpSource};

/// Something that can load the full dataset once.
///
/// Implementations hold no open resources between calls; anything they
/// open (files, HTTP clients) lives only for the duration of `load`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Path or URL, used in logs
    fn describe(&self) -> String;

    async fn load(&self) -> Result<Vec<IndexInfo>>;
}

/// Build the source selected by the configuration.
///
/// `deadline` bounds any network work the source does.
pub fn from_config(config: &RunConfig, deadline: Instant) -> Box<dyn DataSource> {
    match &config.source {
        SourceConfig::File { path } => Box::new(FileSource::new(path.clone())),
        SourceConfig::Http {
            endpoint,
            days,
            api,
        } => {
            let settings = FetchSettings {
                timeouts: config.timeouts,
                retry: config.retry,
                outer_deadline: Some(deadline),
            };
            match api {
                ApiMode::Query => Box::new(HttpSource::new(endpoint.clone(), *days, settings)),
                ApiMode::Cat => Box::new(CatSource::new(
                    endpoint.clone(),
                    *days,
                    Utc::now().date_naive(),
                    settings,
                )),
            }
        }
    }
}
