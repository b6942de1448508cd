//! Parameter normalization: clamp and validate user-supplied compression
//! parameters into the ranges the encoder backend accepts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{CompressionRequest, Preset};

pub const MIN_BITRATE_KBPS: u32 = 100;

/// Normalization error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("parameter '{param}' must be a positive integer, got {value}")]
    NonPositive { param: &'static str, value: i64 },
}

/// Fallback values applied when a request omits a parameter. Sourced from
/// the config file; `Default` gives the built-in fallbacks.
#[derive(Debug, Clone)]
pub struct Defaults {
    pub quality: u8,
    pub bitrate_kbps: u32,
    pub preset: Preset,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            quality: 75,
            bitrate_kbps: 1000,
            preset: Preset::Medium,
        }
    }
}

/// Parameters after validation and clamping. Always within the encoder's
/// accepted domain; the dispatcher only ever forwards these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedParams {
    /// User-facing quality percentage, 0..=100.
    pub quality: u8,
    /// At least `MIN_BITRATE_KBPS`; no upper bound is enforced.
    pub bitrate_kbps: u32,
    pub preset: Preset,
    /// Bounding box for the output frame. Only set when the request carried
    /// both dimensions; scaling is decrease-only, applied by the encoder.
    pub max_size: Option<(u32, u32)>,
}

impl NormalizedParams {
    /// Encoder quality metric derived from the user-facing percentage.
    /// Inverted by contract: quality 75 maps to crf 25.
    pub fn crf(&self) -> u8 {
        100 - self.quality
    }
}

/// Validate and clamp a request's raw parameters.
///
/// Quality and bitrate are clamped into range rather than rejected; an
/// unrecognized preset or a non-positive dimension fails the request.
pub fn normalize(
    req: &CompressionRequest,
    defaults: &Defaults,
) -> Result<NormalizedParams, NormalizeError> {
    let quality = match req.quality {
        Some(q) => q.clamp(0, 100) as u8,
        None => defaults.quality,
    };

    let bitrate_kbps = match req.bitrate_kbps {
        Some(b) => b.max(i64::from(MIN_BITRATE_KBPS)).min(i64::from(u32::MAX)) as u32,
        None => defaults.bitrate_kbps,
    };

    let preset = match &req.preset {
        Some(name) => {
            Preset::parse(name).ok_or_else(|| NormalizeError::UnknownPreset(name.clone()))?
        }
        None => defaults.preset,
    };

    let max_size = match (req.max_width, req.max_height) {
        (Some(w), Some(h)) => {
            let w = positive("maxWidth", w)?;
            let h = positive("maxHeight", h)?;
            Some((w, h))
        }
        // A lone dimension cannot define a bounding box; ignore it like the
        // absent case rather than guessing the other axis.
        _ => None,
    };

    Ok(NormalizedParams {
        quality,
        bitrate_kbps,
        preset,
        max_size,
    })
}

fn positive(param: &'static str, value: i64) -> Result<u32, NormalizeError> {
    if value > 0 && value <= i64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(NormalizeError::NonPositive { param, value })
    }
}

/// Fit a source size into a bounding box, preserving aspect ratio and never
/// upscaling. Used when the source dimensions are known up front; otherwise
/// the decrease-only scale filter resolves this at encode time.
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = source;
    let (bw, bh) = bounds;
    if sw == 0 || sh == 0 {
        return source;
    }

    let scale = f64::min(
        1.0,
        f64::min(f64::from(bw) / f64::from(sw), f64::from(bh) / f64::from(sh)),
    );
    let w = (f64::from(sw) * scale).round().max(1.0) as u32;
    let h = (f64::from(sh) * scale).round().max(1.0) as u32;
    (w.min(bw.max(1)), h.min(bh.max(1)))
}
