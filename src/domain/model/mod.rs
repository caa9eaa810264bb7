// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Time specification with precision - represents time in seconds with fractional precision
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: f64,
}

impl TimeSpec {
    /// Create a new TimeSpec from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Parse time string in various formats
    pub fn parse(time_str: &str) -> Result<Self, DomainError> {
        let trimmed = time_str.trim();

        // Try parsing as seconds (float)
        if let Ok(seconds) = trimmed.parse::<f64>() {
            if !seconds.is_finite() {
                return Err(DomainError::BadArgs("Time must be a finite number".to_string()));
            }
            if seconds < 0.0 {
                return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
            }
            return Ok(Self::from_seconds(seconds));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        match parts.as_slice() {
            [minutes, seconds] => {
                let minutes = parse_whole(minutes, "minutes")?;
                let seconds = parse_fraction(seconds)?;
                Ok(Self::from_seconds(minutes as f64 * 60.0 + seconds))
            }
            [hours, minutes, seconds] => {
                let hours = parse_whole(hours, "hours")?;
                let minutes = parse_whole(minutes, "minutes")?;
                if minutes >= 60 {
                    return Err(DomainError::BadArgs("Minutes must be less than 60".to_string()));
                }
                let seconds = parse_fraction(seconds)?;
                Ok(Self::from_seconds(
                    hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds,
                ))
            }
            _ => Err(DomainError::BadArgs(
                "Invalid time format. Supported formats: seconds (e.g., 123.45), MM:SS.ms (e.g., 2:30.5), HH:MM:SS.ms (e.g., 1:02:30.5)".to_string(),
            )),
        }
    }

    /// Format as HH:MM:SS.ms
    pub fn format_hms(&self) -> String {
        let total_millis = (self.seconds * 1000.0).round() as u64;
        let hours = total_millis / 3_600_000;
        let minutes = (total_millis % 3_600_000) / 60_000;
        let seconds = (total_millis % 60_000) / 1000;
        let milliseconds = total_millis % 1000;

        if hours > 0 {
            format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }
}

fn parse_whole(part: &str, unit: &str) -> Result<u32, DomainError> {
    part.parse::<u32>()
        .map_err(|_| DomainError::BadArgs(format!("Invalid {} format", unit)))
}

fn parse_fraction(part: &str) -> Result<f64, DomainError> {
    let seconds = part
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs("Seconds must be less than 60".to_string()));
    }
    Ok(seconds)
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_hms())
    }
}

/// Rectangular region in the source video's own pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    /// Create a crop region; width and height must be non-zero
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::InvalidCrop(
                "Crop width and height must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Exclusive right edge
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }
}

impl FromStr for CropRegion {
    type Err = DomainError;

    /// Parse `x,y,width,height`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::InvalidCrop(format!("'{}': {}", s, e)))?;

        match values.as_slice() {
            [x, y, width, height] => Self::new(*x, *y, *width, *height),
            _ => Err(DomainError::InvalidCrop(format!(
                "'{}': expected x,y,width,height",
                s
            ))),
        }
    }
}

impl fmt::Display for CropRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Rule used to partition a trimmed video into segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Fixed segment length; the last segment may be shorter
    ByDuration { segment_seconds: f64 },
    /// Fixed number of equal segments
    ByCount { segment_count: u32 },
}

impl SplitPolicy {
    pub fn by_duration(segment_seconds: f64) -> Result<Self, DomainError> {
        if !segment_seconds.is_finite() || segment_seconds <= 0.0 {
            return Err(DomainError::InvalidPolicy(format!(
                "Segment duration must be greater than zero, got {}",
                segment_seconds
            )));
        }
        Ok(SplitPolicy::ByDuration { segment_seconds })
    }

    pub fn by_count(segment_count: u32) -> Result<Self, DomainError> {
        if segment_count == 0 {
            return Err(DomainError::InvalidPolicy(
                "Segment count must be at least 1".to_string(),
            ));
        }
        Ok(SplitPolicy::ByCount { segment_count })
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitPolicy::ByDuration { segment_seconds } => {
                write!(f, "every {}s", segment_seconds)
            }
            SplitPolicy::ByCount { segment_count } => write!(f, "{} segments", segment_count),
        }
    }
}

/// One planned output unit, in seconds relative to the trimmed clip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// 1-based number used in artifact file names
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// A discovered input video with its probed properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSource {
    pub path: PathBuf,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<f64>,
}

impl VideoSource {
    pub fn new(path: PathBuf, duration: f64, width: u32, height: u32) -> Result<Self, DomainError> {
        let display = path.display().to_string();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(DomainError::VideoOpenFailed {
                path: display,
                message: format!("Invalid duration: {}", duration),
            });
        }
        if width == 0 || height == 0 {
            return Err(DomainError::VideoOpenFailed {
                path: display,
                message: "Video dimensions cannot be zero".to_string(),
            });
        }
        Ok(Self {
            path,
            duration,
            width,
            height,
            frame_rate: None,
        })
    }

    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = (frame_rate.is_finite() && frame_rate > 0.0).then_some(frame_rate);
        self
    }

    /// File name without extension, used as the per-video output directory
    pub fn base_name(&self) -> String {
        video_base_name(&self.path)
    }
}

pub(crate) fn video_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}

/// Animated image container written for each segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Gif,
    Webp,
    Apng,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, DomainError> {
        match format.trim().to_lowercase().as_str() {
            "gif" => Ok(OutputFormat::Gif),
            "webp" => Ok(OutputFormat::Webp),
            "apng" | "png" => Ok(OutputFormat::Apng),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid output format: {}. Valid formats: gif, webp, apng",
                format
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Gif => "gif",
            OutputFormat::Webp => "webp",
            OutputFormat::Apng => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Gif => "gif",
            OutputFormat::Webp => "webp",
            OutputFormat::Apng => "apng",
        };
        write!(f, "{}", name)
    }
}

/// Encoder settings shared by every segment of a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub fps: u32,
    pub format: OutputFormat,
    pub overwrite: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fps: 10,
            format: OutputFormat::Gif,
            overwrite: true,
        }
    }
}

/// Extensions scanned when none are configured
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "wmv", "flv"];

/// Caller-supplied configuration for one batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub start_offset: TimeSpec,
    pub policy: SplitPolicy,
    pub crop: Option<CropRegion>,
    pub render: RenderSettings,
    pub extensions: Vec<String>,
    pub clean_output: bool,
    /// Warning emitted at batch start, e.g. when a split input was ignored
    pub policy_notice: Option<String>,
}

impl BatchRequest {
    /// Create new batch request with validation
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        start_offset: TimeSpec,
        policy: SplitPolicy,
    ) -> Result<Self, DomainError> {
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();

        if input_dir.as_os_str().is_empty() {
            return Err(DomainError::BadArgs("Input directory cannot be empty".to_string()));
        }
        if output_dir.as_os_str().is_empty() {
            return Err(DomainError::BadArgs("Output directory cannot be empty".to_string()));
        }
        if !start_offset.seconds.is_finite() || start_offset.seconds < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Start offset must be zero or positive, got {}",
                start_offset.seconds
            )));
        }

        Ok(Self {
            input_dir,
            output_dir,
            start_offset,
            policy,
            crop: None,
            render: RenderSettings::default(),
            extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            clean_output: false,
            policy_notice: None,
        })
    }

    pub fn with_crop(mut self, crop: Option<CropRegion>) -> Self {
        self.crop = crop;
        self
    }

    pub fn with_render_settings(mut self, render: RenderSettings) -> Self {
        self.render = render;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_clean_output(mut self, clean_output: bool) -> Self {
        self.clean_output = clean_output;
        self
    }

    pub fn with_policy_notice(mut self, notice: Option<String>) -> Self {
        self.policy_notice = notice;
        self
    }
}

/// Everything the encoder needs to produce one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub source: PathBuf,
    pub segment: Segment,
    /// Absolute seek position in the untrimmed source
    pub seek: f64,
    pub duration: f64,
    pub crop: Option<CropRegion>,
    pub output: PathBuf,
    pub settings: RenderSettings,
}

impl RenderJob {
    pub fn new(
        source: &VideoSource,
        segment: Segment,
        start_offset: f64,
        crop: Option<CropRegion>,
        output: PathBuf,
        settings: RenderSettings,
    ) -> Self {
        Self {
            source: source.path.clone(),
            segment,
            seek: start_offset + segment.start,
            duration: segment.duration(),
            crop,
            output,
            settings,
        }
    }
}

/// Planned work for one video, as shown by a dry run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoPlan {
    pub source: VideoSource,
    pub crop: Option<CropRegion>,
    pub segments: Vec<Segment>,
    pub outputs: Vec<PathBuf>,
}

/// Terminal state of one video within a batch
#[derive(Debug, Clone, PartialEq)]
pub enum VideoOutcome {
    Completed { rendered: usize, failed: usize },
    Skipped { reason: String },
    Failed { error: DomainError },
    Cancelled { rendered: usize, failed: usize },
}

/// Counters reported with the batch completion signal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub videos_found: usize,
    pub videos_completed: usize,
    pub videos_skipped: usize,
    pub videos_failed: usize,
    pub segments_rendered: usize,
    pub segments_failed: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &VideoOutcome) {
        match outcome {
            VideoOutcome::Completed { rendered, failed } => {
                self.videos_completed += 1;
                self.segments_rendered += rendered;
                self.segments_failed += failed;
            }
            VideoOutcome::Skipped { .. } => self.videos_skipped += 1,
            VideoOutcome::Failed { .. } => self.videos_failed += 1,
            VideoOutcome::Cancelled { rendered, failed } => {
                self.segments_rendered += rendered;
                self.segments_failed += failed;
                self.cancelled = true;
            }
        }
    }
}

#[cfg(test)]
mod tests;
