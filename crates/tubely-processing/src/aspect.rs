//! Aspect-ratio classification

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Maximum distance from an exact ratio, measured in the cross-multiplied domain
/// (`|w*9 - h*16|`). Absolute, so it gets looser relative to the frame as resolution
/// drops.
pub const ASPECT_TOLERANCE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "other")]
    Other,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Other => "other",
        }
    }

    /// Object key prefix for videos of this shape.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

fn cross_diff(width: i64, height: i64, wf: i64, hf: i64) -> i64 {
    width
        .saturating_mul(wf)
        .saturating_sub(height.saturating_mul(hf))
        .saturating_abs()
}

/// Bucket a width/height pair.
///
/// The 16:9 check runs first, so a degenerate pair inside both tolerances is landscape.
pub fn classify(width: i64, height: i64) -> AspectRatio {
    let diff_16x9 = cross_diff(width, height, 9, 16);
    let diff_9x16 = cross_diff(width, height, 16, 9);

    tracing::debug!(
        w = width,
        h = height,
        diff16x9 = diff_16x9,
        diff9x16 = diff_9x16,
        "Classifying aspect ratio"
    );

    if diff_16x9 < ASPECT_TOLERANCE {
        AspectRatio::Landscape
    } else if diff_9x16 < ASPECT_TOLERANCE {
        AspectRatio::Portrait
    } else {
        AspectRatio::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_hd_landscape() {
        assert_eq!(classify(1920, 1080), AspectRatio::Landscape);
    }

    #[test]
    fn test_full_hd_portrait() {
        assert_eq!(classify(1080, 1920), AspectRatio::Portrait);
    }

    #[test]
    fn test_square_is_other() {
        assert_eq!(classify(1000, 1000), AspectRatio::Other);
    }

    #[test]
    fn test_near_ratio_within_tolerance() {
        // 1366x768: |12294 - 12288| = 6
        assert_eq!(classify(1366, 768), AspectRatio::Landscape);
        // 720x1280 exact, 718x1280 off by 18
        assert_eq!(classify(720, 1280), AspectRatio::Portrait);
        assert_eq!(classify(718, 1280), AspectRatio::Portrait);
    }

    #[test]
    fn test_tolerance_boundary_is_exclusive() {
        // 16x9 scaled by 100, then nudged: width*9 grows by 9 per pixel
        // 1611x900 -> |14499 - 14400| = 99
        assert_eq!(classify(1611, 900), AspectRatio::Landscape);
        // 1612x900 -> |14508 - 14400| = 108
        assert_eq!(classify(1612, 900), AspectRatio::Other);
    }

    #[test]
    fn test_degenerate_dimensions_prefer_landscape() {
        // Both differences are 0 for a 0x0 frame; rule order decides.
        assert_eq!(classify(0, 0), AspectRatio::Landscape);
        // 4x4: |36-64| = 28 and |64-36| = 28, both under tolerance
        assert_eq!(classify(4, 4), AspectRatio::Landscape);
    }

    #[test]
    fn test_labels_and_prefixes() {
        assert_eq!(AspectRatio::Landscape.to_string(), "16:9");
        assert_eq!(AspectRatio::Portrait.to_string(), "9:16");
        assert_eq!(AspectRatio::Other.to_string(), "other");
        assert_eq!(AspectRatio::Landscape.key_prefix(), "landscape");
        assert_eq!(AspectRatio::Portrait.key_prefix(), "portrait");
        assert_eq!(AspectRatio::Other.key_prefix(), "other");
        assert_eq!(
            serde_json::to_string(&AspectRatio::Portrait).unwrap(),
            "\"9:16\""
        );
    }
}
