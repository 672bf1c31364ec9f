// src/lib.rs
// shardscope - ranked summaries of search cluster index metadata

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod analyze;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod report;
pub mod source;

#[cfg(test)]
mod test_support;

pub use error::{ErrorKind, ReportError, Result};
