//! Error types for the report writer.
//!
//! Only failures the caller can act on surface here. Image and table input
//! problems are logged and skipped during layout instead of aborting a
//! document; see [`crate::layout`].

/// Result type alias for report writer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building or saving a report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (writing the output file, reading a layout description)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Layout description could not be parsed
    #[error("Invalid layout description: {0}")]
    Json(#[from] serde_json::Error),

    /// Layout description is structurally unusable
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}
