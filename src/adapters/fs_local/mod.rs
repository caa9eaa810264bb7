// Local filesystem adapter - File system operations over std::fs

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Local filesystem adapter
#[derive(Debug, Default, Clone)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }

    /// Direct children of `dir_path`, without descending
    fn children(dir_path: &Path) -> Result<Vec<DirEntry>, DomainError> {
        if !dir_path.is_dir() {
            return Err(DomainError::PathNotFound {
                path: dir_path.display().to_string(),
            });
        }

        WalkDir::new(dir_path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .map(|entry| {
                entry.map_err(|e| {
                    if e.depth() == 0 {
                        DomainError::PathNotFound {
                            path: dir_path.display().to_string(),
                        }
                    } else {
                        DomainError::FsFail(format!(
                            "Failed to read entry in {}: {}",
                            dir_path.display(),
                            e
                        ))
                    }
                })
            })
            .collect()
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(file_path.is_file())
    }

    async fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError> {
        Ok(dir_path.is_dir())
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    async fn list_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError> {
        Ok(Self::children(dir_path)?
            .into_iter()
            .map(DirEntry::into_path)
            .filter(|path| path.is_file())
            .collect())
    }

    async fn list_entries(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError> {
        Ok(Self::children(dir_path)?
            .into_iter()
            .map(DirEntry::into_path)
            .collect())
    }

    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        fs::remove_file(file_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to delete file {}: {}",
                file_path.display(),
                e
            ))
        })
    }

    async fn delete_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::remove_dir_all(dir_path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to delete directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    async fn canonicalize(&self, path: &Path) -> Result<PathBuf, DomainError> {
        fs::canonicalize(path).map_err(|e| {
            DomainError::FsFail(format!("Failed to resolve {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_files_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.mp4"), b"a").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("b.mp4"), b"b").unwrap();

        let adapter = FsLocalAdapter::new().unwrap();
        let files = adapter.list_files(temp_dir.path()).await.unwrap();
        assert_eq!(files, vec![temp_dir.path().join("a.mp4")]);

        let mut entries = adapter.list_entries(temp_dir.path()).await.unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![temp_dir.path().join("a.mp4"), temp_dir.path().join("nested")]
        );
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_path_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = FsLocalAdapter::new().unwrap();
        let result = adapter.list_files(&temp_dir.path().join("missing")).await;
        assert!(matches!(result, Err(DomainError::PathNotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_directory_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("x").join("y");
        let adapter = FsLocalAdapter::new().unwrap();

        adapter.create_directory(&target).await.unwrap();
        adapter.create_directory(&target).await.unwrap();
        assert!(adapter.directory_exists(&target).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_file_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("1.gif");
        let dir = temp_dir.path().join("clip");
        fs::write(&file, b"GIF89a").unwrap();
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("2.gif"), b"GIF89a").unwrap();

        let adapter = FsLocalAdapter::new().unwrap();
        adapter.delete_file(&file).await.unwrap();
        adapter.delete_directory(&dir).await.unwrap();
        assert!(!adapter.file_exists(&file).await.unwrap());
        assert!(!adapter.directory_exists(&dir).await.unwrap());
        assert!(adapter.delete_file(&file).await.is_err());
    }

    #[tokio::test]
    async fn test_canonicalize_resolves_relative_components() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("videos")).unwrap();
        let adapter = FsLocalAdapter::new().unwrap();

        let direct = adapter
            .canonicalize(&temp_dir.path().join("videos"))
            .await
            .unwrap();
        let dotted = adapter
            .canonicalize(&temp_dir.path().join("videos").join("..").join("videos"))
            .await
            .unwrap();
        assert_eq!(direct, dotted);
        assert!(direct.is_absolute());
        assert!(adapter
            .canonicalize(&temp_dir.path().join("missing"))
            .await
            .is_err());
    }
}
