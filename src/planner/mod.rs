//! Segment planning for trimmed videos
//!
//! Turns a video duration, a start offset and a [`SplitPolicy`] into an
//! ordered list of contiguous [`Segment`]s covering the trimmed clip
//! `[0, total_duration - start_offset)`.

use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{Segment, SplitPolicy};

/// Upper bound on segments produced for a single video
pub const MAX_SEGMENTS: usize = 100_000;

/// Pure segmentation planner
pub struct SegmentPlanner;

impl SegmentPlanner {
    /// Plan the segments of one video.
    ///
    /// Fails with [`DomainError::StartOffsetOutOfRange`] when the offset is at
    /// or past the end of the video. Segment times are relative to the start
    /// offset; the last segment always ends exactly at the trimmed duration.
    pub fn plan(
        total_duration: f64,
        start_offset: f64,
        policy: &SplitPolicy,
    ) -> DomainResult<Vec<Segment>> {
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Total duration must be greater than zero, got {}",
                total_duration
            )));
        }
        if !start_offset.is_finite() || start_offset < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Start offset must be zero or positive, got {}",
                start_offset
            )));
        }
        if start_offset >= total_duration {
            return Err(DomainError::StartOffsetOutOfRange {
                start_offset,
                duration: total_duration,
            });
        }

        let trimmed = total_duration - start_offset;
        let boundaries = match *policy {
            SplitPolicy::ByDuration { segment_seconds } => {
                Self::duration_boundaries(trimmed, segment_seconds)?
            }
            SplitPolicy::ByCount { segment_count } => {
                Self::count_boundaries(trimmed, segment_count)?
            }
        };

        let segments: Vec<Segment> = boundaries
            .windows(2)
            .enumerate()
            .map(|(index, bounds)| Segment {
                index,
                start: bounds[0],
                end: bounds[1],
            })
            .collect();

        debug!(
            "Planned {} segments over {:.3}s ({})",
            segments.len(),
            trimmed,
            policy
        );
        Ok(segments)
    }

    /// Boundaries every `segment_seconds`, closed by a short tail when needed
    fn duration_boundaries(trimmed: f64, segment_seconds: f64) -> DomainResult<Vec<f64>> {
        if !segment_seconds.is_finite() || segment_seconds <= 0.0 {
            return Err(DomainError::InvalidPolicy(format!(
                "Segment duration must be greater than zero, got {}",
                segment_seconds
            )));
        }

        let estimate = (trimmed / segment_seconds).ceil();
        if estimate > MAX_SEGMENTS as f64 {
            return Err(DomainError::TooManySegments(format!(
                "segment duration {}s would produce more than {} segments",
                segment_seconds, MAX_SEGMENTS
            )));
        }

        let mut count = (estimate as usize).max(1);
        // A rounding overshoot in the division must not leave an empty last segment
        while count > 1 && (count - 1) as f64 * segment_seconds >= trimmed {
            count -= 1;
        }

        let mut boundaries: Vec<f64> = (0..count).map(|i| i as f64 * segment_seconds).collect();
        boundaries.push(trimmed);
        Ok(boundaries)
    }

    /// `segment_count` equal boundaries; the final one is pinned to `trimmed`
    fn count_boundaries(trimmed: f64, segment_count: u32) -> DomainResult<Vec<f64>> {
        if segment_count == 0 {
            return Err(DomainError::InvalidPolicy(
                "Segment count must be at least 1".to_string(),
            ));
        }
        if segment_count as usize > MAX_SEGMENTS {
            return Err(DomainError::TooManySegments(format!(
                "segment count {} exceeds the limit of {}",
                segment_count, MAX_SEGMENTS
            )));
        }

        let segment_duration = trimmed / segment_count as f64;
        let mut boundaries: Vec<f64> = (0..segment_count)
            .map(|i| i as f64 * segment_duration)
            .collect();
        boundaries.push(trimmed);
        Ok(boundaries)
    }
}
