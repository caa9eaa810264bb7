// LibAV decoder adapter - Probes videos with libav and renders segments with ffmpeg

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Opens videos through libav and hands out render sessions
pub struct LibavDecoderAdapter {
    ffmpeg_binary: PathBuf,
}

impl LibavDecoderAdapter {
    /// Create new decoder adapter using `ffmpeg_binary` for encoding
    pub fn new(ffmpeg_binary: impl Into<PathBuf>) -> Result<Self, DomainError> {
        crate::init()?;

        Ok(Self {
            ffmpeg_binary: ffmpeg_binary.into(),
        })
    }

    /// Read duration, frame size and frame rate of the best video stream
    fn probe(path: &Path) -> Result<VideoSource, DomainError> {
        let open_failed = |message: String| DomainError::VideoOpenFailed {
            path: path.display().to_string(),
            message,
        };

        let path_buf = path.to_path_buf();
        let input = ffmpeg_next::format::input(&path_buf).map_err(|e| open_failed(e.to_string()))?;

        let stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| open_failed("no video stream".to_string()))?;

        let container_duration = input.duration();
        let duration = if container_duration > 0 {
            container_duration as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
        } else if stream.duration() > 0 {
            stream.duration() as f64 * f64::from(stream.time_base())
        } else {
            return Err(open_failed("duration is unknown".to_string()));
        };

        let context = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| open_failed(e.to_string()))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| open_failed(e.to_string()))?;

        let source = VideoSource::new(path_buf, duration, decoder.width(), decoder.height())?;
        let frame_rate = f64::from(stream.avg_frame_rate());
        Ok(if frame_rate.is_finite() && frame_rate > 0.0 {
            source.with_frame_rate(frame_rate)
        } else {
            source
        })
    }
}

#[async_trait]
impl DecoderPort for LibavDecoderAdapter {
    async fn open_video(&self, path: &Path) -> Result<Box<dyn VideoSession>, DomainError> {
        let owned = path.to_path_buf();
        let source = tokio::task::spawn_blocking(move || Self::probe(&owned))
            .await
            .map_err(|e| DomainError::InternalError(format!("Probe task failed: {}", e)))??;

        debug!(
            "Opened {} ({:.3}s, {}x{})",
            source.path.display(),
            source.duration,
            source.width,
            source.height
        );

        Ok(Box::new(LibavVideoSession {
            source,
            ffmpeg_binary: self.ffmpeg_binary.clone(),
        }))
    }
}

/// Session over one probed video
pub struct LibavVideoSession {
    source: VideoSource,
    ffmpeg_binary: PathBuf,
}

impl LibavVideoSession {
    /// Run ffmpeg and surface the last line of its stderr on failure
    async fn run_ffmpeg(&self, args: Vec<String>) -> Result<(), String> {
        debug!("{} {}", self.ffmpeg_binary.display(), args.join(" "));

        let output = Command::new(&self.ffmpeg_binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to launch {}: {}", self.ffmpeg_binary.display(), e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("no diagnostic output")
            .trim()
            .to_string();
        Err(format!("ffmpeg exited with {}: {}", output.status, reason))
    }
}

#[async_trait]
impl VideoSession for LibavVideoSession {
    fn source(&self) -> &VideoSource {
        &self.source
    }

    async fn render_segment(&mut self, job: &RenderJob) -> Result<RenderReport, DomainError> {
        let failed = |message: String| DomainError::SegmentRenderFailed {
            index: job.segment.index,
            message,
        };

        if !job.settings.overwrite && job.output.exists() {
            return Err(failed(format!(
                "{} already exists and overwrite is disabled",
                job.output.display()
            )));
        }

        let started = Instant::now();
        self.run_ffmpeg(render_args(job)).await.map_err(failed)?;

        let file_size = std::fs::metadata(&job.output)
            .map_err(|e| failed(format!("no output written to {}: {}", job.output.display(), e)))?
            .len();
        if file_size == 0 {
            return Err(failed(format!(
                "ffmpeg wrote no frames to {}",
                job.output.display()
            )));
        }
        debug!("Rendered {} in {:?}", job.output.display(), started.elapsed());

        Ok(RenderReport {
            output: job.output.clone(),
            file_size,
        })
    }

    async fn extract_frame(
        &mut self,
        at: f64,
        crop: Option<CropRegion>,
        output: &Path,
    ) -> Result<(), DomainError> {
        if !at.is_finite() || at < 0.0 || at >= self.source.duration {
            return Err(DomainError::BadArgs(format!(
                "Frame time {}s is outside the video (duration {:.3}s)",
                at, self.source.duration
            )));
        }

        self.run_ffmpeg(frame_args(&self.source.path, at, crop, output))
            .await
            .map_err(DomainError::InternalError)
    }
}

/// Seek and length arguments keep microsecond precision so adjacent
/// segments share their boundary exactly
fn seconds_arg(seconds: f64) -> String {
    format!("{:.6}", seconds)
}

/// ffmpeg `crop` filter for a region
fn crop_filter(crop: &CropRegion) -> String {
    format!("crop={}:{}:{}:{}", crop.width, crop.height, crop.x, crop.y)
}

/// Video filter graph for one segment
fn render_filter(job: &RenderJob) -> String {
    let mut filter = String::new();
    if let Some(crop) = &job.crop {
        filter.push_str(&crop_filter(crop));
        filter.push(',');
    }
    filter.push_str(&format!("fps={}", job.settings.fps));
    if job.settings.format == OutputFormat::Gif {
        // Per-segment palette keeps GIF colours close to the source
        filter.push_str(",split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse");
    }
    filter
}

/// Full ffmpeg argument list for one segment
fn render_args(job: &RenderJob) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-loglevel".into(),
        "error".into(),
        if job.settings.overwrite { "-y" } else { "-n" }.to_string(),
        "-ss".into(),
        seconds_arg(job.seek),
        "-t".into(),
        seconds_arg(job.duration),
        "-i".into(),
        job.source.display().to_string(),
        "-an".into(),
        "-vf".into(),
        render_filter(job),
    ];

    match job.settings.format {
        OutputFormat::Gif => args.extend(["-loop", "0"].map(String::from)),
        OutputFormat::Webp => args.extend(["-c:v", "libwebp", "-loop", "0"].map(String::from)),
        OutputFormat::Apng => args.extend(["-plays", "0", "-f", "apng"].map(String::from)),
    }

    args.push(job.output.display().to_string());
    args
}

/// ffmpeg argument list for a single still frame
fn frame_args(source: &Path, at: f64, crop: Option<CropRegion>, output: &Path) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-hide_banner".into(),
        "-nostdin".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-ss".into(),
        seconds_arg(at),
        "-i".into(),
        source.display().to_string(),
    ];
    if let Some(crop) = &crop {
        args.push("-vf".to_string());
        args.push(crop_filter(crop));
    }
    args.extend(["-frames:v", "1"].map(String::from));
    args.push(output.display().to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(format: OutputFormat, crop: Option<CropRegion>, overwrite: bool) -> RenderJob {
        let source = VideoSource::new(PathBuf::from("/in/clip.mp4"), 30.0, 640, 480).unwrap();
        let segment = Segment {
            index: 1,
            start: 5.0,
            end: 10.0,
        };
        RenderJob::new(
            &source,
            segment,
            2.5,
            crop,
            PathBuf::from("/out/clip/2.gif"),
            RenderSettings {
                fps: 12,
                format,
                overwrite,
            },
        )
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> &'a str {
        let position = args.iter().position(|a| a == flag).unwrap();
        &args[position + 1]
    }

    #[test]
    fn test_gif_args_seek_into_untrimmed_source() {
        let args = render_args(&job(OutputFormat::Gif, None, true));
        assert_eq!(value_after(&args, "-ss"), "7.500000");
        assert_eq!(value_after(&args, "-t"), "5.000000");
        assert_eq!(value_after(&args, "-i"), "/in/clip.mp4");
        assert_eq!(
            value_after(&args, "-vf"),
            "fps=12,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse"
        );
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().unwrap(), "/out/clip/2.gif");
    }

    #[test]
    fn test_sub_millisecond_segment_keeps_its_length() {
        let source = VideoSource::new(PathBuf::from("/in/clip.mp4"), 10.0, 640, 480).unwrap();
        let start_offset = 10.0 - 0.0004;
        let policy = SplitPolicy::by_duration(5.0).unwrap();
        let segments = crate::planner::SegmentPlanner::plan(10.0, start_offset, &policy).unwrap();
        assert_eq!(segments.len(), 1);

        let job = RenderJob::new(
            &source,
            segments[0],
            start_offset,
            None,
            PathBuf::from("/out/clip/1.gif"),
            RenderSettings::default(),
        );
        let args = render_args(&job);
        assert_eq!(value_after(&args, "-ss"), "9.999600");
        assert_eq!(value_after(&args, "-t"), "0.000400");
    }

    #[test]
    fn test_count_boundaries_are_shared_between_neighbours() {
        let source = VideoSource::new(PathBuf::from("/in/clip.mp4"), 10.0, 640, 480).unwrap();
        let policy = SplitPolicy::by_count(3).unwrap();
        let segments = crate::planner::SegmentPlanner::plan(10.0, 0.0, &policy).unwrap();
        let args: Vec<Vec<String>> = segments
            .iter()
            .map(|segment| {
                render_args(&RenderJob::new(
                    &source,
                    *segment,
                    0.0,
                    None,
                    PathBuf::from("/out/clip/1.gif"),
                    RenderSettings::default(),
                ))
            })
            .collect();

        assert_eq!(value_after(&args[0], "-t"), "3.333333");
        assert_eq!(value_after(&args[1], "-ss"), "3.333333");
        assert_eq!(value_after(&args[2], "-ss"), "6.666667");
    }

    #[test]
    fn test_crop_comes_before_fps() {
        let crop = CropRegion::new(10, 20, 300, 200).unwrap();
        let args = render_args(&job(OutputFormat::Webp, Some(crop), true));
        assert_eq!(value_after(&args, "-vf"), "crop=300:200:10:20,fps=12");
        assert_eq!(value_after(&args, "-c:v"), "libwebp");
    }

    #[test]
    fn test_no_overwrite_uses_dash_n() {
        let args = render_args(&job(OutputFormat::Apng, None, false));
        assert!(args.contains(&"-n".to_string()));
        assert!(!args.contains(&"-y".to_string()));
        assert_eq!(value_after(&args, "-f"), "apng");
    }

    #[test]
    fn test_frame_args() {
        let crop = CropRegion::new(0, 0, 64, 64).unwrap();
        let args = frame_args(Path::new("/in/a.mkv"), 1.25, Some(crop), Path::new("/tmp/f.png"));
        assert_eq!(value_after(&args, "-ss"), "1.250000");
        assert_eq!(value_after(&args, "-vf"), "crop=64:64:0:0");
        assert_eq!(value_after(&args, "-frames:v"), "1");
        assert_eq!(args.last().unwrap(), "/tmp/f.png");
    }

    #[tokio::test]
    async fn test_open_missing_video_fails() {
        let adapter = LibavDecoderAdapter::new("ffmpeg").unwrap();
        let result = adapter.open_video(Path::new("/definitely/not/here.mp4")).await;
        assert!(matches!(result, Err(DomainError::VideoOpenFailed { .. })));
    }

    #[tokio::test]
    async fn test_existing_output_without_overwrite_fails() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let output = temp_dir.path().join("1.gif");
        std::fs::write(&output, b"GIF89a").unwrap();

        let source = VideoSource::new(temp_dir.path().join("clip.mp4"), 10.0, 64, 64).unwrap();
        let mut session = LibavVideoSession {
            source: source.clone(),
            ffmpeg_binary: PathBuf::from("ffmpeg"),
        };
        let mut render_job = RenderJob::new(
            &source,
            Segment {
                index: 0,
                start: 0.0,
                end: 5.0,
            },
            0.0,
            None,
            output,
            RenderSettings::default(),
        );
        render_job.settings.overwrite = false;

        let result = session.render_segment(&render_job).await;
        assert!(matches!(
            result,
            Err(DomainError::SegmentRenderFailed { index: 0, .. })
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_a_failed_segment() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let output = temp_dir.path().join("1.gif");
        std::fs::write(&output, b"").unwrap();

        let source = VideoSource::new(temp_dir.path().join("clip.mp4"), 10.0, 64, 64).unwrap();
        // `true` exits cleanly without touching the output
        let mut session = LibavVideoSession {
            source: source.clone(),
            ffmpeg_binary: PathBuf::from("true"),
        };
        let render_job = RenderJob::new(
            &source,
            Segment {
                index: 0,
                start: 0.0,
                end: 0.0004,
            },
            0.0,
            None,
            output,
            RenderSettings::default(),
        );

        let result = session.render_segment(&render_job).await;
        match result {
            Err(DomainError::SegmentRenderFailed { index, message }) => {
                assert_eq!(index, 0);
                assert!(message.contains("no frames"));
            }
            other => panic!("expected a failed segment, got {:?}", other),
        }
    }
}
