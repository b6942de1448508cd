//! Request dispatcher: named operations with a map of named arguments,
//! resolved to exactly one result each.
//!
//! Each request moves through `Received -> Validated -> Submitted ->
//! Completed`; compression work is handed to the encoder backend and the
//! reply channel is resolved once, from whichever side finishes the request.

use serde_json::{Map, Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::backend::{Completion, EncoderBackend, Invocation};
use crate::engine::ffmpeg_cmd::{build_audio_args, build_image_args, build_video_args};
use crate::engine::normalize::{Defaults, NormalizeError, normalize};
use crate::engine::types::{
    CompressionRequest, MediaKind, Preset, SUPPORTED_FORMATS, is_format_supported, suffixed_output,
};

pub const IMAGE_OUTPUT_SUFFIX: &str = "_compressed.jpg";
pub const AUDIO_OUTPUT_SUFFIX: &str = "_compressed.m4a";

/// Structured error surfaced to the caller: stable code plus message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Backend diagnostic text, verbatim.
    #[error("{0}")]
    EncodingFailed(String),

    #[error("method '{0}' is not implemented")]
    NotImplemented(String),
}

impl DispatchError {
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::MissingParameter(_) => "MissingParameter",
            DispatchError::InvalidParameter(_) => "InvalidParameter",
            DispatchError::EncodingFailed(_) => "EncodingFailed",
            DispatchError::NotImplemented(_) => "NotImplemented",
        }
    }
}

impl From<NormalizeError> for DispatchError {
    fn from(e: NormalizeError) -> Self {
        DispatchError::InvalidParameter(e.to_string())
    }
}

/// Per-request lifecycle. Requests never move backwards and are never
/// retried; a backend failure completes the request as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Validated,
    Submitted,
    Completed,
}

/// One inbound operation: method name plus named arguments.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Map::new(),
        }
    }

    pub fn with_args(method: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    pub fn arg(mut self, name: &str, value: Value) -> Self {
        self.args.insert(name.to_string(), value);
        self
    }

    /// Required string argument; absent or null means `MissingParameter`.
    fn require_str(&self, name: &'static str) -> Result<&str, DispatchError> {
        match self.args.get(name) {
            Some(Value::String(s)) => Ok(s),
            Some(Value::Null) | None => Err(DispatchError::MissingParameter(name)),
            Some(other) => Err(DispatchError::InvalidParameter(format!(
                "'{name}' must be a string, got {other}"
            ))),
        }
    }

    /// Optional integer argument; a present non-integer value is an error,
    /// never silently dropped.
    fn opt_int(&self, name: &'static str) -> Result<Option<i64>, DispatchError> {
        match self.args.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| {
                DispatchError::InvalidParameter(format!("'{name}' must be an integer, got {n}"))
            }),
            Some(other) => Err(DispatchError::InvalidParameter(format!(
                "'{name}' must be an integer, got {other}"
            ))),
        }
    }

    fn opt_str(&self, name: &'static str) -> Result<Option<&str>, DispatchError> {
        match self.args.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(DispatchError::InvalidParameter(format!(
                "'{name}' must be a string, got {other}"
            ))),
        }
    }
}

/// Single-resolution reply. The dispatcher (for immediate operations and
/// validation failures) or the backend completion (for submitted work) sends
/// exactly one result; nothing else holds the sender.
pub struct MethodReply {
    rx: Receiver<Result<Value, DispatchError>>,
}

impl MethodReply {
    fn channel() -> (SyncSender<Result<Value, DispatchError>>, MethodReply) {
        let (tx, rx) = sync_channel(1);
        (tx, MethodReply { rx })
    }

    fn resolved(result: Result<Value, DispatchError>) -> MethodReply {
        let (tx, reply) = MethodReply::channel();
        // Capacity one and a fresh channel; cannot fail.
        let _ = tx.send(result);
        reply
    }

    /// Block until the request completes.
    pub fn wait(self) -> Result<Value, DispatchError> {
        self.rx.recv().unwrap_or_else(|_| {
            Err(DispatchError::EncodingFailed(
                "encoder backend dropped the request without completing it".to_string(),
            ))
        })
    }

    /// Block up to `timeout`; `None` if the request is still in flight.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<Value, DispatchError>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => None,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                Some(Err(DispatchError::EncodingFailed(
                    "encoder backend dropped the request without completing it".to_string(),
                )))
            }
        }
    }
}

pub struct Dispatcher {
    backend: Arc<dyn EncoderBackend>,
    defaults: Defaults,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn EncoderBackend>, defaults: Defaults) -> Self {
        Self { backend, defaults }
    }

    /// Route one method call. Always returns a reply that resolves exactly
    /// once; unknown methods resolve with `NotImplemented`.
    pub fn handle(&self, call: MethodCall) -> MethodReply {
        debug!(method = %call.method, state = ?RequestState::Received, "method call received");
        match call.method.as_str() {
            "getPlatformVersion" => MethodReply::resolved(Ok(json!(platform_version()))),
            "compressVideo" => self.compress(&call, MediaKind::Video),
            "compressImage" => self.compress(&call, MediaKind::Image),
            "compressAudio" => self.compress(&call, MediaKind::Audio),
            "getAvailablePresets" => MethodReply::resolved(Ok(json!(
                Preset::ALL.iter().map(Preset::as_str).collect::<Vec<_>>()
            ))),
            "getSupportedFormats" => MethodReply::resolved(Ok(json!(SUPPORTED_FORMATS))),
            "isFormatSupported" => MethodReply::resolved(
                call.require_str("path")
                    .map(|path| json!(is_format_supported(path))),
            ),
            other => {
                warn!(method = %other, "unrecognized method");
                MethodReply::resolved(Err(DispatchError::NotImplemented(other.to_string())))
            }
        }
    }

    fn compress(&self, call: &MethodCall, kind: MediaKind) -> MethodReply {
        match self.build_request(call, kind) {
            Ok(request) => self.submit(request),
            Err(e) => MethodReply::resolved(Err(e)),
        }
    }

    /// `Received -> Validated`: pull the named arguments into a typed
    /// request. No backend submission happens if this fails.
    fn build_request(
        &self,
        call: &MethodCall,
        kind: MediaKind,
    ) -> Result<CompressionRequest, DispatchError> {
        let input_path = PathBuf::from(call.require_str("inputPath")?);

        let output_path = match kind {
            MediaKind::Video => PathBuf::from(call.require_str("outputPath")?),
            MediaKind::Image => suffixed_output(&input_path, IMAGE_OUTPUT_SUFFIX),
            MediaKind::Audio => suffixed_output(&input_path, AUDIO_OUTPUT_SUFFIX),
        };

        let mut request = CompressionRequest::new(kind, input_path, output_path);
        match kind {
            MediaKind::Video => {
                request.quality = call.opt_int("quality")?;
                request.bitrate_kbps = call.opt_int("bitrate")?;
                request.preset = call.opt_str("preset")?.map(str::to_string);
                request.max_width = call.opt_int("maxWidth")?;
                request.max_height = call.opt_int("maxHeight")?;
            }
            MediaKind::Image => {
                request.quality = call.opt_int("quality")?;
            }
            MediaKind::Audio => {
                request.bitrate_kbps = call.opt_int("bitrate")?;
            }
        }
        Ok(request)
    }

    /// `Validated -> Submitted`: normalize, build the invocation, hand it to
    /// the backend. The completion callback resolves the reply exactly once.
    fn submit(&self, request: CompressionRequest) -> MethodReply {
        let params = match normalize(&request, &self.defaults) {
            Ok(p) => p,
            Err(e) => return MethodReply::resolved(Err(e.into())),
        };
        debug!(
            request_id = %request.id,
            state = ?RequestState::Validated,
            quality = params.quality,
            bitrate_kbps = params.bitrate_kbps,
            preset = %params.preset,
            "parameters normalized"
        );

        let args = match request.kind {
            MediaKind::Video => build_video_args(&request.input_path, &request.output_path, &params),
            MediaKind::Image => build_image_args(&request.input_path, &request.output_path, &params),
            MediaKind::Audio => build_audio_args(&request.input_path, &request.output_path, &params),
        };

        let invocation = Invocation {
            request_id: request.id,
            args,
            output_path: request.output_path.clone(),
        };

        let (tx, reply) = MethodReply::channel();
        let request_id = request.id;
        let done: Completion = Box::new(move |result| {
            let resolved = match result {
                Ok(path) => Ok(json!(path.to_string_lossy())),
                Err(diag) => Err(DispatchError::EncodingFailed(diag)),
            };
            debug!(
                request_id = %request_id,
                state = ?RequestState::Completed,
                ok = resolved.is_ok(),
                "request completed"
            );
            // The receiver may have gone away; completion is still one-shot.
            let _ = tx.send(resolved);
        });

        debug!(request_id = %request.id, state = ?RequestState::Submitted, "submitted to backend");
        self.backend.submit(invocation, done);
        reply
    }
}

/// Static platform identifier, the host-OS analog of the mobile originals'
/// "Android x.y" / "iOS x.y" strings.
pub fn platform_version() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}
