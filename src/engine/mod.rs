// Core compression engine - independent of the CLI surface

pub mod backend;
pub mod ffmpeg_cmd;
pub mod normalize;
pub mod types;

pub use backend::{Completion, EncoderBackend, FfmpegBackend, Invocation, ffmpeg_version};
pub use ffmpeg_cmd::{build_audio_args, build_image_args, build_video_args, format_cmd};
pub use normalize::{Defaults, NormalizeError, NormalizedParams, fit_within, normalize};
pub use types::{
    CompressionRequest, MediaKind, Preset, SUPPORTED_FORMATS, extension_of, is_format_supported,
};
