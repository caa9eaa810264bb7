// Convert interactor - Drives a batch from scanned videos to rendered segments

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::planner::SegmentPlanner;
use crate::ports::*;
use crate::scanner::DirectoryScanner;

/// Per-video work decided before anything is rendered
enum Preparation {
    Ready {
        crop: Option<CropRegion>,
        segments: Vec<Segment>,
    },
    Skip(String),
}

/// Interactor for the batch conversion use case
pub struct ConvertInteractor {
    decoder: Arc<dyn DecoderPort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    scanner: DirectoryScanner,
}

impl ConvertInteractor {
    /// Create new convert interactor with injected ports
    pub fn new(
        decoder: Arc<dyn DecoderPort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            decoder,
            scanner: DirectoryScanner::new(Arc::clone(&fs_port)),
            fs_port,
            log_port,
        }
    }

    /// Convert every video of the request.
    ///
    /// Only batch-fatal conditions are returned as errors. Failures of a
    /// single video or segment are reported through the log port and the
    /// batch moves on. Cancellation is honoured between videos and between
    /// segments.
    pub async fn run(
        &self,
        request: &BatchRequest,
        cancel: &CancellationToken,
    ) -> DomainResult<BatchSummary> {
        if let Some(notice) = &request.policy_notice {
            self.log_port.warn(notice).await;
        }

        let videos = self
            .scanner
            .scan(&request.input_dir, &request.extensions)
            .await?;
        self.prepare_output_dir(request).await?;

        let mut summary = BatchSummary {
            videos_found: videos.len(),
            ..BatchSummary::default()
        };

        if videos.is_empty() {
            self.log_port
                .info(&format!(
                    "No video files found in {}",
                    request.input_dir.display()
                ))
                .await;
            return Ok(summary);
        }

        self.log_port
            .info(&format!(
                "Found {} video files, split policy: {}",
                videos.len(),
                request.policy
            ))
            .await;

        for (position, path) in videos.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            self.log_port
                .info(&format!(
                    "Processing video {}/{}: {}",
                    position + 1,
                    videos.len(),
                    video_base_name(path)
                ))
                .await;

            let outcome = self.process_video(path, request, cancel).await;
            summary.record(&outcome);
            if summary.cancelled {
                break;
            }
        }

        if summary.cancelled {
            let visited =
                summary.videos_completed + summary.videos_skipped + summary.videos_failed;
            self.log_port
                .warn(&format!(
                    "Batch cancelled after {} of {} videos",
                    visited,
                    videos.len()
                ))
                .await;
        } else {
            self.log_port.success("All videos processed").await;
        }

        Ok(summary)
    }

    /// Dry run: scan, open and plan every video without rendering or writing
    pub async fn plan_batch(&self, request: &BatchRequest) -> DomainResult<Vec<VideoPlan>> {
        if let Some(notice) = &request.policy_notice {
            self.log_port.warn(notice).await;
        }

        let videos = self
            .scanner
            .scan(&request.input_dir, &request.extensions)
            .await?;
        if videos.is_empty() {
            self.log_port
                .info(&format!(
                    "No video files found in {}",
                    request.input_dir.display()
                ))
                .await;
        }

        let mut plans = Vec::with_capacity(videos.len());
        for path in &videos {
            let source = match self.decoder.open_video(path).await {
                // Only the probed properties are needed; the session closes here
                Ok(session) => session.source().clone(),
                Err(e) => {
                    self.log_port.error(&e.to_string()).await;
                    continue;
                }
            };

            match self.prepare(&source, request).await {
                Ok(Preparation::Ready { crop, segments }) => {
                    let outputs = segments
                        .iter()
                        .map(|segment| {
                            OutputNaming::segment_path(
                                &request.output_dir,
                                &source.path,
                                segment,
                                request.render.format,
                            )
                        })
                        .collect();
                    plans.push(VideoPlan {
                        source,
                        crop,
                        segments,
                        outputs,
                    });
                }
                Ok(Preparation::Skip(reason)) => self.log_port.warn(&reason).await,
                Err(e) => {
                    self.log_port
                        .error(&format!("{}: {}", source.base_name(), e))
                        .await
                }
            }
        }

        Ok(plans)
    }

    /// Create the output directory, or empty it when asked to.
    ///
    /// Cleaning is refused when the input directory is the output directory
    /// or lies inside it, since the scanned sources would be deleted.
    async fn prepare_output_dir(&self, request: &BatchRequest) -> DomainResult<()> {
        let output_dir = &request.output_dir;

        if !self.fs_port.directory_exists(output_dir).await? {
            self.fs_port.create_directory(output_dir).await?;
            self.log_port
                .info(&format!("Created output directory {}", output_dir.display()))
                .await;
            return Ok(());
        }

        if request.clean_output {
            let input_root = self.fs_port.canonicalize(&request.input_dir).await?;
            let output_root = self.fs_port.canonicalize(output_dir).await?;
            if input_root.starts_with(&output_root) {
                return Err(DomainError::BadArgs(format!(
                    "Refusing to clean output directory {}: it contains the input directory {}",
                    output_dir.display(),
                    request.input_dir.display()
                )));
            }

            for entry in self.fs_port.list_entries(output_dir).await? {
                let resolved = self
                    .fs_port
                    .canonicalize(&entry)
                    .await
                    .unwrap_or_else(|_| entry.clone());
                if input_root.starts_with(&resolved) {
                    self.log_port
                        .warn(&format!(
                            "Keeping {}: it leads to the input directory",
                            entry.display()
                        ))
                        .await;
                    continue;
                }

                if self.fs_port.directory_exists(&entry).await? {
                    self.fs_port.delete_directory(&entry).await?;
                } else {
                    self.fs_port.delete_file(&entry).await?;
                }
            }
            self.log_port
                .info(&format!("Cleaned output directory {}", output_dir.display()))
                .await;
        }

        Ok(())
    }

    /// Open one video, convert it, and release it on every path
    async fn process_video(
        &self,
        path: &Path,
        request: &BatchRequest,
        cancel: &CancellationToken,
    ) -> VideoOutcome {
        let mut session = match self.decoder.open_video(path).await {
            Ok(session) => session,
            Err(error) => {
                self.log_port.error(&error.to_string()).await;
                return VideoOutcome::Failed { error };
            }
        };

        let outcome = self.convert_video(session.as_mut(), request, cancel).await;
        drop(session);
        outcome
    }

    async fn convert_video(
        &self,
        session: &mut dyn VideoSession,
        request: &BatchRequest,
        cancel: &CancellationToken,
    ) -> VideoOutcome {
        let source = session.source().clone();
        let name = source.base_name();

        let (crop, segments) = match self.prepare(&source, request).await {
            Ok(Preparation::Ready { crop, segments }) => (crop, segments),
            Ok(Preparation::Skip(reason)) => {
                self.log_port.warn(&reason).await;
                return VideoOutcome::Skipped { reason };
            }
            Err(error) => {
                self.log_port
                    .error(&format!("{}: {}", name, error))
                    .await;
                return VideoOutcome::Failed { error };
            }
        };

        if cancel.is_cancelled() {
            return VideoOutcome::Cancelled {
                rendered: 0,
                failed: 0,
            };
        }

        let video_dir = OutputNaming::video_dir(&request.output_dir, &source.path);
        if let Err(error) = self.fs_port.create_directory(&video_dir).await {
            self.log_port
                .error(&format!("{}: {}", name, error))
                .await;
            return VideoOutcome::Failed { error };
        }

        let total = segments.len();
        self.log_port
            .info(&format!(
                "Splitting {} ({}) into {} segments",
                name,
                TimeSpec::from_seconds(source.duration),
                total
            ))
            .await;

        let start_offset = request.start_offset.as_seconds();
        let mut rendered = 0;
        let mut failed = 0;

        for segment in segments {
            if cancel.is_cancelled() {
                return VideoOutcome::Cancelled { rendered, failed };
            }

            let output = OutputNaming::segment_path(
                &request.output_dir,
                &source.path,
                &segment,
                request.render.format,
            );
            let job = RenderJob::new(&source, segment, start_offset, crop, output, request.render);

            match session.render_segment(&job).await {
                Ok(report) => {
                    rendered += 1;
                    self.log_port
                        .info(&format!(
                            "Saved segment {}/{} of {}: {} ({} bytes)",
                            segment.number(),
                            total,
                            name,
                            report.output.display(),
                            report.file_size
                        ))
                        .await;
                }
                Err(error) => {
                    failed += 1;
                    self.log_port
                        .error(&format!("{}: {}", name, error))
                        .await;
                }
            }
        }

        self.log_port
            .success(&format!(
                "Finished {}: {} of {} segments rendered",
                name, rendered, total
            ))
            .await;
        VideoOutcome::Completed { rendered, failed }
    }

    /// Check the start offset, fit the crop and plan segments for one video
    async fn prepare(
        &self,
        source: &VideoSource,
        request: &BatchRequest,
    ) -> DomainResult<Preparation> {
        let start_offset = request.start_offset.as_seconds();
        let name = source.base_name();
        let out_of_range = || {
            Preparation::Skip(format!(
                "Start offset {} is not before the end of {} ({}), skipping",
                request.start_offset,
                name,
                TimeSpec::from_seconds(source.duration)
            ))
        };

        if start_offset >= source.duration {
            return Ok(out_of_range());
        }

        let crop = match &request.crop {
            Some(requested) => {
                let fitted = CropFitter::fit(requested, source.width, source.height)?;
                if fitted.clamped {
                    self.log_port
                        .warn(&format!(
                            "Crop {} exceeds the {}x{} frame of {}, clamped to {}",
                            requested, source.width, source.height, name, fitted.region
                        ))
                        .await;
                }
                Some(fitted.region)
            }
            None => None,
        };

        match SegmentPlanner::plan(source.duration, start_offset, &request.policy) {
            Ok(segments) => Ok(Preparation::Ready { crop, segments }),
            Err(DomainError::StartOffsetOutOfRange { .. }) => Ok(out_of_range()),
            Err(e) => Err(e),
        }
    }
}
