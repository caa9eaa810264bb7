//! CLI module for gifslicer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, FrameArgs, InspectArgs, PlanArgs, SelectionArgs};

/// gifslicer batch video to animated image converter
///
/// Scans a directory for videos, trims a start offset, optionally crops,
/// splits what remains by duration or count and renders every segment to
/// its own animated image.
#[derive(Parser, Debug)]
#[command(name = "gifslicer")]
#[command(about = "Split videos into animated GIF/WebP/APNG segments")]
#[command(version)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Console log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Configuration file (default: gifslicer.toml or config/gifslicer.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Console log formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every video of a directory into animated segments
    Convert(ConvertArgs),
    /// Show the segments and artifact paths a conversion would produce
    Plan(PlanArgs),
    /// Show duration, frame size and frame rate of one video
    Inspect(InspectArgs),
    /// Save one still frame, e.g. to choose a crop rectangle
    Frame(FrameArgs),
}
