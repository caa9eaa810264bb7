// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input directory missing or unreadable (batch-fatal)
    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    /// A video could not be opened or probed (per-video)
    #[error("Failed to open video {path}: {message}")]
    VideoOpenFailed { path: String, message: String },

    /// Start offset lies at or beyond the end of the video (per-video)
    #[error("Start offset {start_offset:.3}s is not before the video duration {duration:.3}s")]
    StartOffsetOutOfRange { start_offset: f64, duration: f64 },

    /// One segment failed to render (per-segment)
    #[error("Failed to render segment {index}: {message}")]
    SegmentRenderFailed { index: usize, message: String },

    /// Split policy is missing or malformed (batch-fatal)
    #[error("Invalid split policy: {0}")]
    InvalidPolicy(String),

    /// A valid policy would cut one video into too many pieces (per-video)
    #[error("Too many segments: {0}")]
    TooManySegments(String),

    /// Crop rectangle cannot be applied to a frame
    #[error("Invalid crop region: {0}")]
    InvalidCrop(String),

    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// Filesystem operation failed
    #[error("Filesystem error: {0}")]
    FsFail(String),

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;
