//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::model::{CropRegion, OutputFormat, TimeSpec};

/// Input, split and rendering options shared by `convert` and `plan`
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Directory containing the source videos (not searched recursively)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory receiving one subdirectory per video
    #[arg(short, long)]
    pub output: PathBuf,

    /// Time trimmed from the start of every video (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(short, long, default_value = "0", value_parser = parse_time)]
    pub start: TimeSpec,

    /// Split into segments of this many seconds (the last one may be shorter)
    #[arg(short, long, value_parser = parse_segment_seconds, conflicts_with = "count")]
    pub duration: Option<f64>,

    /// Split into this many equal segments
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: Option<u32>,

    /// Crop rectangle in source pixels: x,y,width,height
    #[arg(long)]
    pub crop: Option<CropRegion>,

    /// Output frame rate (1-50)
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Output format: gif, webp or apng
    #[arg(long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// Video extensions to pick up, comma separated
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,
}

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Empty the output directory before converting
    #[arg(long)]
    pub clean_output: bool,

    /// Keep existing artifacts instead of replacing them
    #[arg(long)]
    pub no_overwrite: bool,

    /// Also write batch events to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the frame command
#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Position of the frame (seconds, MM:SS.ms or HH:MM:SS.ms)
    #[arg(long, value_parser = parse_time)]
    pub at: TimeSpec,

    /// PNG file to write
    #[arg(short, long)]
    pub output: PathBuf,

    /// Crop rectangle in source pixels: x,y,width,height
    #[arg(long)]
    pub crop: Option<CropRegion>,
}

fn parse_time(value: &str) -> Result<TimeSpec, String> {
    TimeSpec::parse(value).map_err(|e| e.to_string())
}

fn parse_segment_seconds(value: &str) -> Result<f64, String> {
    let seconds = parse_time(value)?.as_seconds();
    if seconds <= 0.0 {
        return Err("segment duration must be greater than zero".to_string());
    }
    Ok(seconds)
}

fn parse_fps(value: &str) -> Result<u32, String> {
    clap_num::number_range(value, 1, 50)
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(value).map_err(|e| e.to_string())
}
