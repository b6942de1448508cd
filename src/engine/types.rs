use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Encoder speed/quality trade-off, ascending compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    /// All presets, in ascending effort order. The order is part of the
    /// `getAvailablePresets` contract.
    pub const ALL: [Preset; 9] = [
        Preset::Ultrafast,
        Preset::Superfast,
        Preset::Veryfast,
        Preset::Faster,
        Preset::Fast,
        Preset::Medium,
        Preset::Slow,
        Preset::Slower,
        Preset::Veryslow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Ultrafast => "ultrafast",
            Preset::Superfast => "superfast",
            Preset::Veryfast => "veryfast",
            Preset::Faster => "faster",
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
            Preset::Slower => "slower",
            Preset::Veryslow => "veryslow",
        }
    }

    /// Parse a preset name (case-insensitive). Unknown names are rejected,
    /// never passed through to the encoder.
    pub fn parse(name: &str) -> Option<Preset> {
        let lower = name.to_ascii_lowercase();
        Preset::ALL.iter().copied().find(|p| p.as_str() == lower)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container/file extensions accepted by `isFormatSupported`.
pub const SUPPORTED_FORMATS: [&str; 6] = ["mp4", "mov", "avi", "mkv", "webm", "3gp"];

/// Lowercase extension after the last `.`, if any.
pub fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Whether the path's extension is one of the supported container formats.
/// A path without an extension is simply unsupported.
pub fn is_format_supported(path: &str) -> bool {
    match extension_of(path) {
        Some(ext) => SUPPORTED_FORMATS.contains(&ext.as_str()),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

/// One compression request as received from the caller, before
/// normalization. Immutable for the duration of the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionRequest {
    pub id: Uuid,
    pub kind: MediaKind,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub quality: Option<i64>,
    pub bitrate_kbps: Option<i64>,
    pub preset: Option<String>,
    pub max_width: Option<i64>,
    pub max_height: Option<i64>,
}

impl CompressionRequest {
    pub fn new(kind: MediaKind, input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            input_path,
            output_path,
            quality: None,
            bitrate_kbps: None,
            preset: None,
            max_width: None,
            max_height: None,
        }
    }
}

/// Fixed suffix appended to the input path for single-input operations
/// that derive their own output path.
pub fn suffixed_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
    input.with_file_name(format!("{stem}{suffix}"))
}
