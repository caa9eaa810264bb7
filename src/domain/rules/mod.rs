// Domain rules - Business logic and policies

use std::path::{Path, PathBuf};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Crop rectangle after fitting it to one video's frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedCrop {
    pub region: CropRegion,
    pub clamped: bool,
}

/// Rules for applying a crop rectangle to a concrete frame size
pub struct CropFitter;

impl CropFitter {
    /// Clamp the rectangle to the frame; reject it when nothing of it remains inside
    pub fn fit(crop: &CropRegion, frame_width: u32, frame_height: u32) -> Result<FittedCrop, DomainError> {
        if frame_width == 0 || frame_height == 0 {
            return Err(DomainError::InvalidCrop(
                "Frame dimensions cannot be zero".to_string(),
            ));
        }
        if crop.x >= frame_width || crop.y >= frame_height {
            return Err(DomainError::InvalidCrop(format!(
                "Crop {} starts outside the {}x{} frame",
                crop, frame_width, frame_height
            )));
        }

        let right = crop.right().min(frame_width as u64);
        let bottom = crop.bottom().min(frame_height as u64);
        let width = (right - crop.x as u64) as u32;
        let height = (bottom - crop.y as u64) as u32;
        let region = CropRegion::new(crop.x, crop.y, width, height)?;

        Ok(FittedCrop {
            clamped: region != *crop,
            region,
        })
    }
}

/// Split policy chosen from the two mutually exclusive inputs
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyResolution {
    pub policy: SplitPolicy,
    /// Set when both inputs were supplied and the count was ignored
    pub notice: Option<String>,
}

/// Rules for turning raw split inputs into a single policy
pub struct SplitPolicyResolver;

impl SplitPolicyResolver {
    /// Duration wins when both are present; neither present is an error
    pub fn resolve(
        split_duration: Option<f64>,
        split_count: Option<u32>,
    ) -> Result<PolicyResolution, DomainError> {
        match (split_duration, split_count) {
            (Some(duration), Some(count)) => Ok(PolicyResolution {
                policy: SplitPolicy::by_duration(duration)?,
                notice: Some(format!(
                    "Both split duration ({}s) and split count ({}) were given; using split duration",
                    duration, count
                )),
            }),
            (Some(duration), None) => Ok(PolicyResolution {
                policy: SplitPolicy::by_duration(duration)?,
                notice: None,
            }),
            (None, Some(count)) => Ok(PolicyResolution {
                policy: SplitPolicy::by_count(count)?,
                notice: None,
            }),
            (None, None) => Err(DomainError::InvalidPolicy(
                "Split duration and split count cannot both be empty".to_string(),
            )),
        }
    }
}

/// Rules for deterministic artifact locations
pub struct OutputNaming;

impl OutputNaming {
    /// `output_dir/<video base name>`
    pub fn video_dir(output_dir: &Path, video_path: &Path) -> PathBuf {
        output_dir.join(video_base_name(video_path))
    }

    /// `output_dir/<video base name>/<index + 1>.<ext>`
    pub fn segment_path(
        output_dir: &Path,
        video_path: &Path,
        segment: &Segment,
        format: OutputFormat,
    ) -> PathBuf {
        Self::video_dir(output_dir, video_path)
            .join(format!("{}.{}", segment.number(), format.extension()))
    }
}

/// Lowercase extensions without a leading dot, duplicates removed
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for extension in extensions {
        let extension = extension.as_ref().trim().trim_start_matches('.').to_lowercase();
        if !extension.is_empty() && !normalized.contains(&extension) {
            normalized.push(extension);
        }
    }
    normalized
}

#[cfg(test)]
mod tests;
