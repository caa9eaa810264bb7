// File log adapter - Persists batch events as plain text lines

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Writes one `[LEVEL] timestamp: message` line per event
pub struct FileLogAdapter {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileLogAdapter {
    /// Create (or truncate) the log file and write the start banner
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!("Failed to create log directory: {}", e))
            })?;
        }

        let mut file = File::create(&path).map_err(|e| {
            DomainError::FsFail(format!("Failed to create log file {}: {}", path.display(), e))
        })?;
        writeln!(
            file,
            "=== Log started at {} ===",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )
        .map_err(|e| DomainError::FsFail(format!("Failed to write log file: {}", e)))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl LogPort for FileLogAdapter {
    async fn log_event(&self, event: &LogEvent) {
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        if let Err(e) = writeln!(file, "{}", event) {
            tracing::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }

    async fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_banner_and_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("run.log");

        let adapter = FileLogAdapter::new(&path).unwrap();
        adapter.info("Found 2 video files").await;
        adapter.error("Failed to open video broken.mp4").await;
        adapter.flush().await;

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("=== Log started at "));
        assert!(lines[1].starts_with("[INFO] "));
        assert!(lines[1].ends_with(": Found 2 video files"));
        assert!(lines[2].starts_with("[ERROR] "));
    }

    #[tokio::test]
    async fn test_recreating_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("run.log");

        FileLogAdapter::new(&path).unwrap().warn("old run").await;
        let _fresh = FileLogAdapter::new(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old run"));
    }
}
