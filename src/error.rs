// src/error.rs
// Error kinds and exit-code mapping for shardscope

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Category of a failure. Every `ReportError` maps to exactly one kind,
/// and every kind maps to one process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Usage,
    Io,
    Network,
    Upstream,
    Request,
    Decode,
    Timeout,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::Usage,
        ErrorKind::Io,
        ErrorKind::Network,
        ErrorKind::Upstream,
        ErrorKind::Request,
        ErrorKind::Decode,
        ErrorKind::Timeout,
    ];

    /// Name used as the prefix of diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Usage => "UsageError",
            ErrorKind::Io => "IOError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Upstream => "UpstreamError",
            ErrorKind::Request => "RequestError",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Timeout => "TimeoutError",
        }
    }

    /// Process exit status for this kind
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 1,
            ErrorKind::Io
            | ErrorKind::Network
            | ErrorKind::Upstream
            | ErrorKind::Request
            | ErrorKind::Decode => 2,
            ErrorKind::Timeout => 3,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the shardscope library
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("UsageError: {0}")]
    Usage(String),

    #[error("IOError: cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("NetworkError: request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("UpstreamError: {url} kept returning {status} after {attempts} attempts")]
    Upstream {
        url: String,
        status: StatusCode,
        attempts: u32,
    },

    #[error("RequestError: {url} rejected the request with {status}")]
    Request { url: String, status: StatusCode },

    #[error("DecodeError: {input}: {reason}")]
    Decode {
        input: String,
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("TimeoutError: {input} did not complete within {limit:?}")]
    Timeout { input: String, limit: Duration },
}

/// Convenience type alias for Result using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::Usage(_) => ErrorKind::Usage,
            ReportError::Io { .. } => ErrorKind::Io,
            ReportError::Network { .. } => ErrorKind::Network,
            ReportError::Upstream { .. } => ErrorKind::Upstream,
            ReportError::Request { .. } => ErrorKind::Request,
            ReportError::Decode { .. } => ErrorKind::Decode,
            ReportError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        ReportError::Usage(msg.into())
    }

    /// Decode failure that is not a JSON syntax/shape error (e.g. a rule in the data model)
    pub(crate) fn invalid(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::Decode {
            input: input.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn json(input: impl Into<String>, err: serde_json::Error) -> Self {
        ReportError::Decode {
            input: input.into(),
            reason: err.to_string(),
            source: Some(err),
        }
    }
}
