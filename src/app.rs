use crate::cli::{Cli, Commands};
use media_compressor::config::Config;
use media_compressor::dispatch::{Dispatcher, MethodCall, platform_version};
use media_compressor::engine::types::{CompressionRequest, MediaKind};
use media_compressor::engine::{
    FfmpegBackend, build_video_args, ffmpeg_version, format_cmd, normalize,
};
use serde_json::json;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

pub fn run(cli: Cli) {
    match cli.command {
        Commands::Video {
            input,
            output,
            quality,
            bitrate,
            preset,
            max_width,
            max_height,
        } => {
            let call = MethodCall::new("compressVideo")
                .arg("inputPath", json!(input.to_string_lossy()))
                .arg("outputPath", json!(output.to_string_lossy()))
                .arg("quality", json!(quality))
                .arg("bitrate", json!(bitrate))
                .arg("preset", json!(preset))
                .arg("maxWidth", json!(max_width))
                .arg("maxHeight", json!(max_height));
            dispatch_and_print(call);
        }
        Commands::Image { input, quality } => {
            let call = MethodCall::new("compressImage")
                .arg("inputPath", json!(input.to_string_lossy()))
                .arg("quality", json!(quality));
            dispatch_and_print(call);
        }
        Commands::Audio { input, bitrate } => {
            let call = MethodCall::new("compressAudio")
                .arg("inputPath", json!(input.to_string_lossy()))
                .arg("bitrate", json!(bitrate));
            dispatch_and_print(call);
        }
        Commands::Presets => {
            let call = MethodCall::new("getAvailablePresets");
            dispatch_and_print(call);
        }
        Commands::Formats => {
            let call = MethodCall::new("getSupportedFormats");
            dispatch_and_print(call);
        }
        Commands::Check { path } => {
            let call = MethodCall::new("isFormatSupported").arg("path", json!(path));
            dispatch_and_print(call);
        }
        Commands::CheckFfmpeg => handle_check_ffmpeg(),
        Commands::DryRun {
            input,
            output,
            quality,
            bitrate,
            preset,
            max_width,
            max_height,
        } => handle_dry_run(input, output, quality, bitrate, preset, max_width, max_height),
        Commands::Platform => println!("{}", platform_version()),
        Commands::InitConfig => handle_init_config(),
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {:#}; using built-in defaults", e);
            Config::default()
        }
    }
}

/// Run one method call against the real backend and print the outcome.
fn dispatch_and_print(call: MethodCall) {
    let config = load_config();
    let defaults = match config.engine_defaults() {
        Ok(defaults) => defaults,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let backend = Arc::new(FfmpegBackend::new(config.ffmpeg.binary));
    let dispatcher = Dispatcher::new(backend, defaults);

    match dispatcher.handle(call).wait() {
        Ok(value) => match value {
            serde_json::Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        },
        Err(e) => {
            eprintln!("Error [{}]: {}", e.code(), e);
            process::exit(1);
        }
    }
}

fn handle_check_ffmpeg() {
    let config = load_config();
    match ffmpeg_version(&config.ffmpeg.binary) {
        Ok(version) => {
            println!("ffmpeg found: {}", version);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_dry_run(
    input: PathBuf,
    output: PathBuf,
    quality: Option<i64>,
    bitrate: Option<i64>,
    preset: Option<String>,
    max_width: Option<i64>,
    max_height: Option<i64>,
) {
    let config = load_config();
    let defaults = match config.engine_defaults() {
        Ok(defaults) => defaults,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let mut request = CompressionRequest::new(MediaKind::Video, input, output);
    request.quality = quality;
    request.bitrate_kbps = bitrate;
    request.preset = preset;
    request.max_width = max_width;
    request.max_height = max_height;

    match normalize(&request, &defaults) {
        Ok(params) => {
            let args = build_video_args(&request.input_path, &request.output_path, &params);
            println!("{}", format_cmd(&config.ffmpeg.binary, &args));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn handle_init_config() {
    match Config::load() {
        Ok(cfg) => {
            match Config::config_path() {
                Ok(path) => println!("Config loaded successfully from {}", path.display()),
                Err(e) => println!("Config loaded, but config path unknown: {:#}", e),
            }
            println!("{:#?}", cfg);
        }
        Err(e) => {
            println!("Config missing or invalid: {:#}", e);
            println!("Creating default config...");

            let cfg = Config::default();
            if let Err(err) = cfg.save() {
                eprintln!("Failed to save default config: {:#}", err);
                process::exit(1);
            } else {
                match Config::config_path() {
                    Ok(path) => println!("Default config saved to {}", path.display()),
                    Err(e) => println!("Default config saved (path unknown): {:#}", e),
                }
            }
        }
    }
}
