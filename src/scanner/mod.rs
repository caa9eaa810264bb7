//! Directory scanning for candidate videos

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::rules::normalize_extensions;
use crate::ports::FsPort;

/// Lists the videos directly inside a directory
pub struct DirectoryScanner {
    fs_port: Arc<dyn FsPort>,
}

impl DirectoryScanner {
    pub fn new(fs_port: Arc<dyn FsPort>) -> Self {
        Self { fs_port }
    }

    /// Files in `directory` whose extension is in `extensions`, sorted by path.
    ///
    /// Extensions match case-insensitively, with or without a leading dot.
    /// Subdirectories are not descended into. An empty result is not an error;
    /// a missing directory is [`DomainError::PathNotFound`].
    pub async fn scan<S: AsRef<str>>(
        &self,
        directory: &Path,
        extensions: &[S],
    ) -> DomainResult<Vec<PathBuf>> {
        if !self.fs_port.directory_exists(directory).await? {
            return Err(DomainError::PathNotFound {
                path: directory.display().to_string(),
            });
        }

        let wanted = normalize_extensions(extensions);
        let mut videos: Vec<PathBuf> = self
            .fs_port
            .list_files(directory)
            .await?
            .into_iter()
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| wanted.iter().any(|w| w.eq_ignore_ascii_case(ext)))
                    .unwrap_or(false)
            })
            .collect();
        videos.sort();

        debug!(
            "Scanned {}: {} candidate videos",
            directory.display(),
            videos.len()
        );
        Ok(videos)
    }
}
