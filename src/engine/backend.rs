//! Encoder backend seam. The backend owns all process lifecycle beyond
//! submission; the dispatcher only hands over an invocation descriptor and a
//! completion callback that must fire exactly once.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;
use uuid::Uuid;

use super::ffmpeg_cmd::format_cmd;

/// One backend invocation: the ordered argument list plus the output path to
/// report on success.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub request_id: Uuid,
    pub args: Vec<String>,
    pub output_path: PathBuf,
}

/// Completion callback. Invoked exactly once per submission, from the
/// backend's own execution context. The error string is the backend's
/// diagnostic text, surfaced verbatim.
pub type Completion = Box<dyn FnOnce(Result<PathBuf, String>) + Send + 'static>;

pub trait EncoderBackend: Send + Sync {
    /// Submit an invocation for asynchronous execution. Must not block the
    /// caller; must invoke `done` exactly once.
    fn submit(&self, invocation: Invocation, done: Completion);
}

/// Production backend: spawns the external ffmpeg binary on a dedicated
/// thread and reports its exit status.
pub struct FfmpegBackend {
    binary: String,
}

impl FfmpegBackend {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl EncoderBackend for FfmpegBackend {
    fn submit(&self, invocation: Invocation, done: Completion) {
        let binary = self.binary.clone();
        debug!(
            request_id = %invocation.request_id,
            cmd = %format_cmd(&binary, &invocation.args),
            "spawning encoder"
        );

        thread::spawn(move || {
            let result = run_encoder(&binary, &invocation);
            done(result);
        });
    }
}

fn run_encoder(binary: &str, invocation: &Invocation) -> Result<PathBuf, String> {
    let output = Command::new(binary)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("failed to launch '{binary}': {e}"))?;

    if output.status.success() {
        Ok(invocation.output_path.clone())
    } else {
        Err(diagnostic_tail(&output.stderr, output.status.code()))
    }
}

/// Last few stderr lines: ffmpeg prints the actual failure at the end,
/// after pages of banner and stream info.
fn diagnostic_tail(stderr: &[u8], exit_code: Option<i32>) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let tail = lines
        .iter()
        .rev()
        .take(5)
        .rev()
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    match exit_code {
        Some(code) if tail.is_empty() => format!("encoder exited with status {code}"),
        Some(code) => format!("encoder exited with status {code}:\n{tail}"),
        None if tail.is_empty() => "encoder terminated by signal".to_string(),
        None => format!("encoder terminated by signal:\n{tail}"),
    }
}

/// Check that the encoder binary is available and return its version line.
pub fn ffmpeg_version(binary: &str) -> Result<String> {
    let output = Command::new(binary)
        .arg("-version")
        .output()
        .with_context(|| format!("Failed to execute {binary}. Is ffmpeg installed and in PATH?"))?;

    if !output.status.success() {
        anyhow::bail!("{} command failed with status: {}", binary, output.status);
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    let first_line = version_output.lines().next().unwrap_or("Unknown version");

    Ok(first_line.to_string())
}
