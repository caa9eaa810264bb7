//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::{Cli, Commands, SelectionArgs};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{OutputFormat, RenderSettings, TimeSpec};
use crate::domain::rules::{normalize_extensions, PolicyResolution, SplitPolicyResolver};
use crate::ports::ConfigPort;

/// Files tried, in order, when no `--config` is given
pub const CONFIG_SEARCH_PATHS: &[&str] = &["gifslicer.toml", "config/gifslicer.toml"];

/// Environment variables and the config keys they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("GIFSLICER_LOG_LEVEL", "log_level"),
    ("GIFSLICER_FPS", "fps"),
    ("GIFSLICER_OUTPUT_FORMAT", "output_format"),
    ("GIFSLICER_VIDEO_EXTENSIONS", "video_extensions"),
    ("GIFSLICER_FFMPEG_BINARY", "ffmpeg_binary"),
    ("GIFSLICER_OVERWRITE", "overwrite"),
    ("GIFSLICER_SPLIT_DURATION", "split_duration"),
    ("GIFSLICER_SPLIT_COUNT", "split_count"),
];

/// Effective settings after every configuration layer was applied
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_level: String,
    pub fps: u32,
    pub output_format: OutputFormat,
    pub video_extensions: Vec<String>,
    pub ffmpeg_binary: PathBuf,
    pub overwrite: bool,
    pub split_duration: Option<f64>,
    pub split_count: Option<u32>,
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Read the settings out of a validated config port
    pub async fn from_port(config: &dyn ConfigPort) -> DomainResult<Self> {
        let get = |key: &'static str| async move {
            config
                .get_config(key)
                .await?
                .ok_or_else(|| DomainError::ConfigError(format!("Missing config key {}", key)))
        };

        let fps = get("fps").await?;
        let overwrite = get("overwrite").await?;
        let extensions = get("video_extensions").await?;

        Ok(Self {
            log_level: get("log_level").await?.to_lowercase(),
            fps: fps
                .parse()
                .map_err(|e| DomainError::ConfigError(format!("Invalid fps value: {}", e)))?,
            output_format: OutputFormat::parse(&get("output_format").await?)
                .map_err(|e| DomainError::ConfigError(e.to_string()))?,
            video_extensions: normalize_extensions(&extensions.split(',').collect::<Vec<_>>()),
            ffmpeg_binary: PathBuf::from(get("ffmpeg_binary").await?),
            overwrite: overwrite.parse().map_err(|e| {
                DomainError::ConfigError(format!("Invalid boolean value for overwrite: {}", e))
            })?,
            split_duration: parse_split_duration(config).await?,
            split_count: parse_optional(config, "split_count").await?,
            config_file: config.get_config_file_path().await?,
        })
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            fps: self.fps,
            format: self.output_format,
            overwrite: self.overwrite,
        }
    }

    /// Single split policy, with a notice when one configured input was ignored
    pub fn resolve_policy(&self) -> DomainResult<PolicyResolution> {
        SplitPolicyResolver::resolve(self.split_duration, self.split_count)
    }
}

/// Accepts the same seconds or `MM:SS.ms` forms as `--duration`
async fn parse_split_duration(config: &dyn ConfigPort) -> DomainResult<Option<f64>> {
    match config.get_config("split_duration").await? {
        Some(value) if !value.trim().is_empty() => TimeSpec::parse(&value)
            .map(|time| Some(time.as_seconds()))
            .map_err(|e| {
                DomainError::ConfigError(format!("Invalid split_duration value '{}': {}", value, e))
            }),
        _ => Ok(None),
    }
}

async fn parse_optional<T>(config: &dyn ConfigPort, key: &str) -> DomainResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match config.get_config(key).await? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| DomainError::ConfigError(format!("Invalid {} value '{}': {}", key, value, e))),
        _ => Ok(None),
    }
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy<F>(
    config: &dyn ConfigPort,
    cli: &Cli,
    env_lookup: F,
) -> DomainResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    // Defaults are already present in the adapter
    load_config_file(config, cli.config.as_deref()).await?;
    load_environment_variables(config, env_lookup).await?;
    apply_cli_configuration_overrides(config, cli).await?;

    config.validate_config().await?;
    Settings::from_port(config).await
}

/// Load `explicit`, or the first existing file of [`CONFIG_SEARCH_PATHS`]
pub async fn load_config_file(
    config: &dyn ConfigPort,
    explicit: Option<&Path>,
) -> DomainResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        config.load_config(path).await?;
        info!("Loaded configuration from {}", path.display());
        return Ok(Some(path.to_path_buf()));
    }

    for candidate in CONFIG_SEARCH_PATHS {
        let path = Path::new(candidate);
        if path.is_file() {
            config.load_config(path).await?;
            info!("Loaded configuration from {}", path.display());
            return Ok(Some(path.to_path_buf()));
        }
    }

    debug!("No configuration file found, using defaults");
    Ok(None)
}

/// Apply every set variable of [`ENV_MAPPINGS`]; returns how many were applied
pub async fn load_environment_variables<F>(config: &dyn ConfigPort, env_lookup: F) -> DomainResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;
    for (env_var, config_key) in ENV_MAPPINGS {
        if let Some(value) = env_lookup(env_var) {
            debug!("Found environment override: {} = {}", env_var, value);
            config.set_config(config_key, &value).await?;
            env_overrides += 1;
        }
    }

    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }
    Ok(env_overrides)
}

/// Apply CLI argument overrides; returns how many were applied
pub async fn apply_cli_configuration_overrides(
    config: &dyn ConfigPort,
    cli: &Cli,
) -> DomainResult<usize> {
    let mut cli_overrides = 0;

    if let Some(level) = &cli.log_level {
        config.set_config("log_level", level).await?;
        cli_overrides += 1;
    }

    match &cli.command {
        Commands::Convert(args) => {
            cli_overrides += apply_selection_overrides(config, &args.selection).await?;
            if args.no_overwrite {
                config.set_config("overwrite", "false").await?;
                cli_overrides += 1;
            }
        }
        Commands::Plan(args) => {
            cli_overrides += apply_selection_overrides(config, &args.selection).await?;
        }
        Commands::Inspect(_) | Commands::Frame(_) => {}
    }

    if cli_overrides > 0 {
        debug!("Applied {} CLI configuration overrides", cli_overrides);
    }
    Ok(cli_overrides)
}

async fn apply_selection_overrides(
    config: &dyn ConfigPort,
    selection: &SelectionArgs,
) -> DomainResult<usize> {
    let mut overrides = 0;

    // A split mode named on the command line replaces both configured split keys
    if selection.duration.is_some() || selection.count.is_some() {
        config.unset_config("split_duration").await?;
        config.unset_config("split_count").await?;
    }
    if let Some(duration) = selection.duration {
        config.set_config("split_duration", &duration.to_string()).await?;
        overrides += 1;
    }
    if let Some(count) = selection.count {
        config.set_config("split_count", &count.to_string()).await?;
        overrides += 1;
    }
    if let Some(fps) = selection.fps {
        config.set_config("fps", &fps.to_string()).await?;
        overrides += 1;
    }
    if let Some(format) = selection.format {
        config.set_config("output_format", &format.to_string()).await?;
        overrides += 1;
    }
    if let Some(extensions) = &selection.extensions {
        config.set_config("video_extensions", &extensions.join(",")).await?;
        overrides += 1;
    }

    Ok(overrides)
}
