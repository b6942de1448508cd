use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "media-compressor")]
#[command(about = "Compress video, image, and audio files with FFmpeg", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a video file (H.264, audio copied through)
    Video {
        /// Source video file
        input: PathBuf,

        /// Destination file
        output: PathBuf,

        /// Quality percentage 0-100 (higher is better)
        #[arg(long)]
        quality: Option<i64>,

        /// Video bitrate in kbps (floor 100)
        #[arg(long)]
        bitrate: Option<i64>,

        /// Encoder preset (see `presets`)
        #[arg(long)]
        preset: Option<String>,

        /// Bounding box width; requires --max-height
        #[arg(long, requires = "max_height")]
        max_width: Option<i64>,

        /// Bounding box height; requires --max-width
        #[arg(long, requires = "max_width")]
        max_height: Option<i64>,
    },

    /// Compress an image next to the source (suffix _compressed.jpg)
    Image {
        /// Source image file
        input: PathBuf,

        /// Quality percentage 0-100 (higher is better)
        #[arg(long)]
        quality: Option<i64>,
    },

    /// Compress an audio track next to the source (suffix _compressed.m4a)
    Audio {
        /// Source audio file
        input: PathBuf,

        /// Audio bitrate in kbps (floor 100)
        #[arg(long)]
        bitrate: Option<i64>,
    },

    /// List the available encoder presets
    Presets,

    /// List the supported container formats
    Formats,

    /// Check whether a file's container format is supported
    Check {
        /// Path whose extension to check
        path: String,
    },

    /// Check if ffmpeg is installed
    CheckFfmpeg,

    /// Show the ffmpeg command for a video job without executing (dry run)
    DryRun {
        /// Source video file
        input: PathBuf,

        /// Destination file
        output: PathBuf,

        /// Quality percentage 0-100 (higher is better)
        #[arg(long)]
        quality: Option<i64>,

        /// Video bitrate in kbps (floor 100)
        #[arg(long)]
        bitrate: Option<i64>,

        /// Encoder preset (see `presets`)
        #[arg(long)]
        preset: Option<String>,

        /// Bounding box width; requires --max-height
        #[arg(long, requires = "max_height")]
        max_width: Option<i64>,

        /// Bounding box height; requires --max-width
        #[arg(long, requires = "max_width")]
        max_height: Option<i64>,
    },

    /// Print the platform identifier string
    Platform,

    /// Create a default config file
    InitConfig,
}
