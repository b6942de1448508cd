//! Translation from normalized parameters to FFmpeg argument lists.
//!
//! The backend owns process execution; this module only decides what the
//! ordered argument list looks like for each media kind.

use std::path::Path;

use super::normalize::NormalizedParams;

/// Decrease-only scale filter: fits the frame inside the bounding box,
/// preserves aspect ratio, never upscales.
fn scale_filter(max_w: u32, max_h: u32) -> String {
    format!("scale='min({max_w},iw)':'min({max_h},ih)':force_original_aspect_ratio=decrease")
}

/// Arguments for a video compression job: H.264 video re-encode with the
/// normalized preset/crf/bitrate, audio stream copied through untouched.
pub fn build_video_args(input: &Path, output: &Path, params: &NormalizedParams) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        params.preset.as_str().to_string(),
        "-crf".to_string(),
        params.crf().to_string(),
        "-b:v".to_string(),
        format!("{}k", params.bitrate_kbps),
    ];

    if let Some((w, h)) = params.max_size {
        args.push("-vf".to_string());
        args.push(scale_filter(w, h));
    }

    args.push("-c:a".to_string());
    args.push("copy".to_string());
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Arguments for an image compression job. The quality percentage maps onto
/// ffmpeg's 2..=31 qscale range (2 best), inverted like crf.
pub fn build_image_args(input: &Path, output: &Path, params: &NormalizedParams) -> Vec<String> {
    let qscale = 2 + (u32::from(100 - params.quality) * 29) / 100;
    vec![
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-q:v".to_string(),
        qscale.to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Arguments for an audio compression job: AAC re-encode at the normalized
/// bitrate, video streams dropped.
pub fn build_audio_args(input: &Path, output: &Path, params: &NormalizedParams) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string_lossy().into_owned(),
        "-vn".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{}k", params.bitrate_kbps),
        output.to_string_lossy().into_owned(),
    ]
}

/// Shell-quoted command line for dry runs and logs.
pub fn format_cmd(binary: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(shlex::try_quote(binary).map_or_else(|_| binary.to_string(), |q| q.into_owned()));
    for arg in args {
        parts.push(shlex::try_quote(arg).map_or_else(|_| arg.clone(), |q| q.into_owned()));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::{Defaults, NormalizedParams};
    use crate::engine::types::Preset;
    use std::path::PathBuf;

    fn params() -> NormalizedParams {
        let d = Defaults::default();
        NormalizedParams {
            quality: d.quality,
            bitrate_kbps: d.bitrate_kbps,
            preset: d.preset,
            max_size: None,
        }
    }

    #[test]
    fn video_args_basic() {
        let args = build_video_args(
            &PathBuf::from("in.mp4"),
            &PathBuf::from("out.mp4"),
            &params(),
        );
        assert_eq!(
            args,
            vec![
                "-i", "in.mp4", "-c:v", "libx264", "-preset", "medium", "-crf", "25", "-b:v",
                "1000k", "-c:a", "copy", "out.mp4",
            ]
        );
    }

    #[test]
    fn video_args_with_bounds() {
        let mut p = params();
        p.max_size = Some((1280, 720));
        p.preset = Preset::Slow;
        let args = build_video_args(&PathBuf::from("in.mkv"), &PathBuf::from("out.mkv"), &p);
        let vf = args.iter().position(|a| a == "-vf").expect("-vf present");
        assert_eq!(
            args[vf + 1],
            "scale='min(1280,iw)':'min(720,ih)':force_original_aspect_ratio=decrease"
        );
        // Scale filter sits between rate control and the audio copy.
        assert!(vf > args.iter().position(|a| a == "-b:v").unwrap());
        assert!(vf < args.iter().position(|a| a == "-c:a").unwrap());
    }

    #[test]
    fn image_qscale_inverted() {
        let mut p = params();
        p.quality = 100;
        let args = build_image_args(&PathBuf::from("a.png"), &PathBuf::from("b.jpg"), &p);
        assert_eq!(args, vec!["-i", "a.png", "-q:v", "2", "b.jpg"]);

        p.quality = 0;
        let args = build_image_args(&PathBuf::from("a.png"), &PathBuf::from("b.jpg"), &p);
        assert_eq!(args[3], "31");
    }

    #[test]
    fn audio_args_bitrate() {
        let mut p = params();
        p.bitrate_kbps = 128;
        let args = build_audio_args(&PathBuf::from("t.wav"), &PathBuf::from("t.m4a"), &p);
        assert_eq!(
            args,
            vec!["-i", "t.wav", "-vn", "-c:a", "aac", "-b:a", "128k", "t.m4a"]
        );
    }

    #[test]
    fn format_cmd_quotes_spaces() {
        let args = vec!["-i".to_string(), "my clip.mp4".to_string()];
        let line = format_cmd("ffmpeg", &args);
        assert_eq!(line, "ffmpeg -i \"my clip.mp4\"");
    }
}
