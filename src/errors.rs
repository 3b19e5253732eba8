//! Domain error types for forgetbench.
//!
//! Typed errors at module boundaries replace string-encoded errors and
//! enable structured error handling via pattern matching.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

/// Errors from model provider calls.
///
/// Embedded in `anyhow::Error` so the `ChatProvider` trait signature
/// (`-> anyhow::Result<ProviderReply>`) stays unchanged while the runner
/// can downcast: `e.downcast_ref::<ProviderError>()`. The `Display` form
/// is what lands in the `error` field of a recorded result row.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Missing credential: set {0}")]
    MissingCredential(String),

    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Failed to read response body: {0}")]
    ResponseReadError(String),

    #[error("Failed to parse response JSON: {0}")]
    JsonParseError(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Response contained no completion text")]
    EmptyCompletion,
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Errors from dataset persistence.
///
/// Loading is deliberately strict: a missing file or an unparseable line
/// aborts the run instead of silently evaluating a truncated dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("Invalid scenario on line {line} of {}: {source}", .path.display())]
    BadLine {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
