// src/source/file.rs
// Local JSON file source

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::DataSource;
use crate::error::{ReportError, Result};
use crate::model::{self, IndexInfo};

/// Reads a JSON array of index records from disk
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> Result<Vec<IndexInfo>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| ReportError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "read data file");

        model::decode_array(&bytes, &self.describe())
    }
}
