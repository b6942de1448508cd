//! Property-based tests for parameter normalization.
//!
//! Uses proptest to cover the full input ranges of quality, bitrate, and
//! the bounding-box fit.

use media_compressor::engine::normalize::{Defaults, fit_within, normalize};
use media_compressor::engine::types::{CompressionRequest, MediaKind};
use proptest::prelude::*;
use std::path::PathBuf;

fn request() -> CompressionRequest {
    CompressionRequest::new(
        MediaKind::Video,
        PathBuf::from("in.mp4"),
        PathBuf::from("out.mp4"),
    )
}

proptest! {
    #[test]
    fn in_range_quality_passes_through(q in 0i64..=100) {
        let mut req = request();
        req.quality = Some(q);
        let params = normalize(&req, &Defaults::default()).unwrap();
        prop_assert_eq!(i64::from(params.quality), q);
        prop_assert_eq!(i64::from(params.crf()), 100 - q);
    }

    #[test]
    fn any_quality_ends_in_range(q in i64::MIN..i64::MAX) {
        let mut req = request();
        req.quality = Some(q);
        let params = normalize(&req, &Defaults::default()).unwrap();
        prop_assert!(params.quality <= 100);
        prop_assert!(params.crf() <= 100);
    }

    #[test]
    fn bitrate_always_at_least_floor(b in i64::MIN..i64::MAX) {
        let mut req = request();
        req.bitrate_kbps = Some(b);
        let params = normalize(&req, &Defaults::default()).unwrap();
        prop_assert!(params.bitrate_kbps >= 100);
        if (100..=i64::from(u32::MAX)).contains(&b) {
            prop_assert_eq!(i64::from(params.bitrate_kbps), b);
        }
    }

    #[test]
    fn fit_never_exceeds_box_or_source(
        sw in 1u32..=8192,
        sh in 1u32..=8192,
        bw in 1u32..=8192,
        bh in 1u32..=8192,
    ) {
        let (w, h) = fit_within((sw, sh), (bw, bh));
        prop_assert!(w <= bw && h <= bh, "({w},{h}) exceeds box ({bw},{bh})");
        prop_assert!(w <= sw && h <= sh, "({w},{h}) upscales ({sw},{sh})");
        prop_assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn fit_preserves_aspect_within_rounding(
        sw in 16u32..=4096,
        sh in 16u32..=4096,
        bw in 16u32..=4096,
        bh in 16u32..=4096,
    ) {
        let (w, h) = fit_within((sw, sh), (bw, bh));
        // w = round(sw*s), h = round(sh*s), so the cross product drifts by
        // at most half a pixel per axis (plus the >=1 clamp).
        let drift = (f64::from(w) * f64::from(sh) - f64::from(h) * f64::from(sw)).abs();
        prop_assert!(
            drift <= f64::from(sw + sh),
            "aspect drifted: source {sw}x{sh}, output {w}x{h}"
        );
    }
}
