// TOML config adapter - Configuration management using TOML files

use crate::domain::errors::*;
use crate::domain::model::{OutputFormat, DEFAULT_VIDEO_EXTENSIONS};
use crate::ports::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Table holding this tool's keys inside a config file
const CONFIG_TABLE: &str = "gifslicer";

/// Log levels accepted by the `log_level` key
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Allowed output frame rates
pub const FPS_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: Arc<RwLock<HashMap<String, String>>>,
    config_file_path: Arc<RwLock<Option<PathBuf>>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter holding the default values
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            config: Arc::new(RwLock::new(Self::default_config())),
            config_file_path: Arc::new(RwLock::new(None)),
        })
    }

    /// Default configuration values; split keys have no default
    fn default_config() -> HashMap<String, String> {
        let mut config = HashMap::new();
        config.insert("log_level".to_string(), "info".to_string());
        config.insert("fps".to_string(), "10".to_string());
        config.insert("output_format".to_string(), "gif".to_string());
        config.insert(
            "video_extensions".to_string(),
            DEFAULT_VIDEO_EXTENSIONS.join(","),
        );
        config.insert("ffmpeg_binary".to_string(), "ffmpeg".to_string());
        config.insert("overwrite".to_string(), "true".to_string());
        config
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, String>>, DomainError> {
        self.config
            .read()
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, String>>, DomainError> {
        self.config
            .write()
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))
    }

    /// Flatten a TOML value into the string form stored in the config map
    fn value_to_string(key: &str, value: &toml::Value) -> Result<String, DomainError> {
        match value {
            toml::Value::String(s) => Ok(s.clone()),
            toml::Value::Integer(i) => Ok(i.to_string()),
            toml::Value::Float(f) => Ok(f.to_string()),
            toml::Value::Boolean(b) => Ok(b.to_string()),
            toml::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        DomainError::ConfigError(format!("{} must be a list of strings", key))
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|items| items.join(",")),
            other => Err(DomainError::ConfigError(format!(
                "Unsupported value for {}: {}",
                key, other
            ))),
        }
    }

    /// Deserialize config from TOML string
    fn deserialize_config(&self, toml_content: &str) -> Result<(), DomainError> {
        let parsed: toml::Value = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigError(format!("Failed to parse TOML config: {}", e)))?;

        let Some(section) = parsed.get(CONFIG_TABLE) else {
            tracing::warn!("Config file has no [{}] table", CONFIG_TABLE);
            return Ok(());
        };
        let table = section.as_table().ok_or_else(|| {
            DomainError::ConfigError(format!("[{}] must be a table", CONFIG_TABLE))
        })?;

        let mut entries = Vec::with_capacity(table.len());
        for (key, value) in table {
            entries.push((key.clone(), Self::value_to_string(key, value)?));
        }

        let mut config = self.write()?;
        config.extend(entries);
        Ok(())
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.write()?.insert(key.to_string(), value.to_string());
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn unset_config(&self, key: &str) -> Result<(), DomainError> {
        self.write()?.remove(key);
        Ok(())
    }

    async fn load_config(&self, file_path: &Path) -> Result<(), DomainError> {
        if !file_path.is_file() {
            return Err(DomainError::ConfigError(format!(
                "Config file does not exist: {}",
                file_path.display()
            )));
        }

        let content = std::fs::read_to_string(file_path).map_err(|e| {
            DomainError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        self.deserialize_config(&content)?;
        let mut config_path = self
            .config_file_path
            .write()
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))?;
        *config_path = Some(file_path.to_path_buf());

        Ok(())
    }

    async fn validate_config(&self) -> Result<(), DomainError> {
        let config = self.read()?;

        if let Some(log_level) = config.get("log_level") {
            if !LOG_LEVELS.contains(&log_level.to_lowercase().as_str()) {
                return Err(DomainError::ConfigError(format!(
                    "Invalid log_level '{}', expected one of {}",
                    log_level,
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        if let Some(fps) = config.get("fps") {
            let fps_value: u32 = fps
                .parse()
                .map_err(|e| DomainError::ConfigError(format!("Invalid fps value: {}", e)))?;
            if !FPS_RANGE.contains(&fps_value) {
                return Err(DomainError::ConfigError(format!(
                    "fps must be between {} and {}, got {}",
                    FPS_RANGE.start(),
                    FPS_RANGE.end(),
                    fps_value
                )));
            }
        }

        if let Some(format) = config.get("output_format") {
            OutputFormat::parse(format)
                .map_err(|e| DomainError::ConfigError(e.to_string()))?;
        }

        if let Some(overwrite) = config.get("overwrite") {
            overwrite.parse::<bool>().map_err(|e| {
                DomainError::ConfigError(format!("Invalid boolean value for overwrite: {}", e))
            })?;
        }

        Ok(())
    }

    async fn get_config_file_path(&self) -> Result<Option<PathBuf>, DomainError> {
        let config_path = self
            .config_file_path
            .read()
            .map_err(|_| DomainError::InternalError("Config lock poisoned".to_string()))?;
        Ok(config_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_defaults() {
        let adapter = TomlConfigAdapter::new().unwrap();
        assert_eq!(adapter.get_config("fps").await.unwrap().as_deref(), Some("10"));
        assert_eq!(
            adapter.get_config("video_extensions").await.unwrap().as_deref(),
            Some("mp4,avi,mov,mkv,wmv,flv")
        );
        assert_eq!(adapter.get_config("split_duration").await.unwrap(), None);
        assert!(adapter.get_config_file_path().await.unwrap().is_none());
        adapter.validate_config().await.unwrap();
    }

    #[tokio::test]
    async fn test_load_mixed_value_types() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gifslicer.toml");
        std::fs::write(
            &path,
            r#"
[gifslicer]
fps = 15
split_duration = 2.5
overwrite = false
output_format = "webp"
video_extensions = ["mp4", ".MOV"]
"#,
        )
        .unwrap();

        let adapter = TomlConfigAdapter::new().unwrap();
        adapter.load_config(&path).await.unwrap();

        assert_eq!(adapter.get_config("fps").await.unwrap().as_deref(), Some("15"));
        assert_eq!(adapter.get_config("split_duration").await.unwrap().as_deref(), Some("2.5"));
        assert_eq!(adapter.get_config("overwrite").await.unwrap().as_deref(), Some("false"));
        assert_eq!(
            adapter.get_config("video_extensions").await.unwrap().as_deref(),
            Some("mp4,.MOV")
        );
        assert_eq!(adapter.get_config("log_level").await.unwrap().as_deref(), Some("info"));
        assert_eq!(adapter.get_config_file_path().await.unwrap(), Some(path));
        adapter.validate_config().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_and_bad_toml() {
        let temp_dir = TempDir::new().unwrap();
        let adapter = TomlConfigAdapter::new().unwrap();
        assert!(matches!(
            adapter.load_config(&temp_dir.path().join("none.toml")).await,
            Err(DomainError::ConfigError(_))
        ));

        let bad = temp_dir.path().join("bad.toml");
        std::fs::write(&bad, "[gifslicer\nfps = ").unwrap();
        assert!(matches!(
            adapter.load_config(&bad).await,
            Err(DomainError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_values() {
        let cases = [
            ("log_level", "loud"),
            ("fps", "0"),
            ("fps", "51"),
            ("fps", "ten"),
            ("output_format", "mp4"),
            ("overwrite", "yes"),
        ];

        for (key, value) in cases {
            let adapter = TomlConfigAdapter::new().unwrap();
            adapter.set_config(key, value).await.unwrap();
            assert!(
                adapter.validate_config().await.is_err(),
                "{} = {} should be rejected",
                key,
                value
            );
        }
    }

    #[tokio::test]
    async fn test_set_then_unset() {
        let adapter = TomlConfigAdapter::new().unwrap();
        adapter.set_config("split_count", "4").await.unwrap();
        assert_eq!(
            adapter.get_config("split_count").await.unwrap().as_deref(),
            Some("4")
        );
        adapter.unset_config("split_count").await.unwrap();
        assert_eq!(adapter.get_config("split_count").await.unwrap(), None);
    }
}
