// src/cli/mod.rs
// Command-line surface for shardscope

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::{self, ApiMode, DEFAULT_DATA_FILE, DEFAULT_DAYS, RunConfig, SourceConfig};
use crate::error::Result;

pub mod run;

pub use run::run;

#[derive(Parser, Debug)]
#[command(name = "shardscope")]
#[command(about = "Rank search cluster indexes by size, shard count and shard balance")]
#[command(version)]
pub struct Cli {
    /// Base URL of the index metadata endpoint (required unless --debug)
    #[arg(long, default_value = "")]
    pub endpoint: String,

    /// Read index metadata from a local file instead of the endpoint
    #[arg(long)]
    pub debug: bool,

    /// File read in --debug mode
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Number of days of data to request
    #[arg(long, default_value_t = DEFAULT_DAYS, allow_negative_numbers = true)]
    pub days: i64,

    /// Rows per report
    #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
    pub top: i64,

    /// Endpoint convention: one `?days=N` query, or per-day `_cat/indices` lookups
    #[arg(long, value_enum, default_value_t = ApiMode::Query)]
    pub api: ApiMode,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Validate flags into a run configuration
    pub fn to_config(&self) -> Result<RunConfig> {
        let top = config::positive("top", self.top)?;
        let days: u32 = config::positive("days", self.days)?;

        let source = if self.debug {
            SourceConfig::File {
                path: self.file.clone(),
            }
        } else {
            SourceConfig::Http {
                endpoint: config::parse_endpoint(&self.endpoint)?,
                days,
                api: self.api,
            }
        };

        Ok(RunConfig::new(source, top))
    }
}
