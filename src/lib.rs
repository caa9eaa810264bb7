//! gifslicer batch video to animated image converter
//!
//! Scans a directory for videos, trims a start offset, applies an optional
//! crop, splits the remaining footage by fixed duration or fixed count and
//! renders each segment to its own animated image. A failing video or
//! segment is reported and skipped; it never aborts the batch.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod planner;
pub mod ports;
pub mod scanner;

// Re-export commonly used types
pub use domain::errors::{DomainError, DomainResult};
pub use domain::model::{
    BatchRequest, BatchSummary, CropRegion, OutputFormat, RenderSettings, Segment, SplitPolicy,
    TimeSpec, VideoSource,
};
pub use planner::SegmentPlanner;

/// Initialize the libav libraries used for probing
pub fn init() -> DomainResult<()> {
    ffmpeg_next::init()
        .map_err(|e| DomainError::InternalError(format!("Failed to initialize libav: {}", e)))
}
