use std::path::PathBuf;

/// Errors produced by the review pipeline.
///
/// Library modules return this type directly; the binary converts to
/// `anyhow::Error` at its boundary. Nothing is caught or recovered along the
/// way, so every variant ends the run with a non-zero exit.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// Missing or invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The diff file is missing or unreadable.
    #[error("failed to read diff from {}: {}", .path.display(), .source)]
    DiffRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other filesystem or stdin I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model API failure: network, auth, quota, or blocked content.
    #[error("model error: {0}")]
    Llm(String),

    /// The comment POST never reached GitHub.
    #[error("publish transport error: {0}")]
    PublishTransport(String),

    /// GitHub answered the comment POST with a non-success status.
    #[error("GitHub API error {status}: {body}")]
    PublishStatus { status: u16, body: String },
}
