// Ports - Interface definitions (contracts)

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for the decoder/encoder collaborator
#[async_trait]
pub trait DecoderPort: Send + Sync {
    /// Open a video and resolve its duration and frame size.
    ///
    /// The returned session owns the decoding resources for that video;
    /// dropping it releases them.
    async fn open_video(&self, path: &Path) -> Result<Box<dyn VideoSession>, DomainError>;
}

/// An opened video, exclusively owned by whoever processes it
#[async_trait]
pub trait VideoSession: Send {
    /// Probed properties of the opened video
    fn source(&self) -> &VideoSource;

    /// Render one trimmed, optionally cropped sub-range to an animated image
    async fn render_segment(&mut self, job: &RenderJob) -> Result<RenderReport, DomainError>;

    /// Write a single still frame at `at` seconds, optionally cropped
    async fn extract_frame(
        &mut self,
        at: f64,
        crop: Option<CropRegion>,
        output: &Path,
    ) -> Result<(), DomainError>;
}

/// Result of one successful segment render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub file_size: u64,
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError>;

    /// Check if directory exists
    async fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError>;

    /// Create directory (including parent directories); succeeds if it already exists
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Regular files directly inside `dir_path` (not recursive), in no particular order.
    /// A missing directory is reported as [`DomainError::PathNotFound`].
    async fn list_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError>;

    /// Files and subdirectories directly inside `dir_path`
    async fn list_entries(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError>;

    /// Delete file
    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Delete directory recursively
    async fn delete_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Resolve `path` to an absolute path with symlinks followed
    async fn canonicalize(&self, path: &Path) -> Result<PathBuf, DomainError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Get configuration value
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Set configuration value
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Remove a configuration value
    async fn unset_config(&self, key: &str) -> Result<(), DomainError>;

    /// Load configuration from file
    async fn load_config(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Validate configuration
    async fn validate_config(&self) -> Result<(), DomainError>;

    /// Path of the loaded configuration file, if any
    async fn get_config_file_path(&self) -> Result<Option<PathBuf>, DomainError>;
}

/// Port for batch event delivery.
///
/// Implementations must deliver events in the order they are received.
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Deliver one event
    async fn log_event(&self, event: &LogEvent);

    /// Log info message
    async fn info(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Info, message)).await;
    }

    /// Log warning message
    async fn warn(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Warning, message)).await;
    }

    /// Log error message
    async fn error(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Error, message)).await;
    }

    /// Log success message
    async fn success(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Success, message)).await;
    }

    /// Flush buffered output
    async fn flush(&self) {}
}

/// Timestamped batch event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.level,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.message
        )
    }
}

/// Severity of a batch event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Success => "SUCCESS",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message on the worker-to-caller event stream
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// A progress or audit event, in production order
    Log(LogEvent),
    /// Every discovered video was visited
    Finished(BatchSummary),
    /// The batch stopped before visiting any video
    Failed(String),
}

impl BatchEvent {
    /// Whether no further events follow this one
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BatchEvent::Log(_))
    }
}
