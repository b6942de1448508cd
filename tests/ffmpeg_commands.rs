//! Golden assertions for the generated ffmpeg argument lists.

use media_compressor::engine::ffmpeg_cmd::{
    build_audio_args, build_image_args, build_video_args, format_cmd,
};
use media_compressor::engine::normalize::{Defaults, normalize};
use media_compressor::engine::types::{CompressionRequest, MediaKind};
use std::path::PathBuf;

fn normalized(req: &CompressionRequest) -> media_compressor::engine::normalize::NormalizedParams {
    normalize(req, &Defaults::default()).unwrap()
}

#[test]
fn default_video_command() {
    let req = CompressionRequest::new(
        MediaKind::Video,
        PathBuf::from("in.mp4"),
        PathBuf::from("out.mp4"),
    );
    let args = build_video_args(&req.input_path, &req.output_path, &normalized(&req));
    assert_eq!(
        format_cmd("ffmpeg", &args),
        "ffmpeg -i in.mp4 -c:v libx264 -preset medium -crf 25 -b:v 1000k -c:a copy out.mp4"
    );
}

#[test]
fn bounded_video_command_uses_decrease_scaling() {
    let mut req = CompressionRequest::new(
        MediaKind::Video,
        PathBuf::from("in.mkv"),
        PathBuf::from("out.mkv"),
    );
    req.quality = Some(60);
    req.bitrate_kbps = Some(2500);
    req.preset = Some("slow".to_string());
    req.max_width = Some(1280);
    req.max_height = Some(720);

    let args = build_video_args(&req.input_path, &req.output_path, &normalized(&req));
    assert_eq!(
        args,
        vec![
            "-i",
            "in.mkv",
            "-c:v",
            "libx264",
            "-preset",
            "slow",
            "-crf",
            "40",
            "-b:v",
            "2500k",
            "-vf",
            "scale='min(1280,iw)':'min(720,ih)':force_original_aspect_ratio=decrease",
            "-c:a",
            "copy",
            "out.mkv",
        ]
    );
}

#[test]
fn image_command_maps_quality_to_qscale() {
    let mut req = CompressionRequest::new(
        MediaKind::Image,
        PathBuf::from("photo.png"),
        PathBuf::from("photo_compressed.jpg"),
    );
    req.quality = Some(50);
    let args = build_image_args(&req.input_path, &req.output_path, &normalized(&req));
    // quality 50 -> qscale 2 + 50*29/100 = 16
    assert_eq!(
        args,
        vec!["-i", "photo.png", "-q:v", "16", "photo_compressed.jpg"]
    );
}

#[test]
fn audio_command_drops_video() {
    let mut req = CompressionRequest::new(
        MediaKind::Audio,
        PathBuf::from("talk.wav"),
        PathBuf::from("talk_compressed.m4a"),
    );
    req.bitrate_kbps = Some(96);
    let args = build_audio_args(&req.input_path, &req.output_path, &normalized(&req));
    // 96 kbps floors at 100.
    assert_eq!(
        args,
        vec![
            "-i",
            "talk.wav",
            "-vn",
            "-c:a",
            "aac",
            "-b:a",
            "100k",
            "talk_compressed.m4a",
        ]
    );
}

#[test]
fn paths_with_spaces_are_quoted_for_display() {
    let req = CompressionRequest::new(
        MediaKind::Video,
        PathBuf::from("my holiday.mov"),
        PathBuf::from("my holiday.mp4"),
    );
    let args = build_video_args(&req.input_path, &req.output_path, &normalized(&req));
    let line = format_cmd("ffmpeg", &args);
    assert!(line.contains("\"my holiday.mov\""));
    assert!(line.contains("\"my holiday.mp4\""));
}
