// THEORY:
// The `gesture_decoder` is the top of the vision stack. It chains the lower modules
// into one pure function: an `ImageRegion` goes in, a `GestureCount` comes out, and
// nothing is remembered between calls.
//
// Pipeline:
// 1.  **Intensity & Smoothing** (`intensity`): luma, then a heavy Gaussian blur.
// 2.  **Binarization** (`intensity`): Otsu threshold, inverted so the hand is foreground.
// 3.  **Contours** (`contour`): outer and hole boundaries; the largest by area is the hand.
// 4.  **Hull & Defects** (`hull`, `defect`): index-form hull, then one defect per
//     concave hull edge.
// 5.  **Valley Counting**: a defect whose far-point angle is at most 90 degrees is the
//     gap between two raised fingers. `k` valleys separate `k + 1` fingers, so the
//     count is `valleys + 1`, capped at six.
//
// Ambiguous scenes are not errors. An empty mask, or a hand silhouette with no
// concavities at all, decodes to zero fingers and the game simply carries on.

use crate::core_modules::contour::{Contour, find_contours, largest_contour};
use crate::core_modules::defect::{ConvexityDefect, convexity_defects};
use crate::core_modules::hull::ConvexHull;
use crate::core_modules::intensity::{binarize_inverted, otsu_threshold, smooth, to_intensity};
use crate::core_modules::region::ImageRegion;
use image::GrayImage;
use log::debug;
use std::fmt;

/// The highest finger count the decoder can report.
pub const MAX_GESTURE: u8 = 6;

/// Number of raised fingers read from one region, always within `0..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GestureCount(u8);

impl GestureCount {
    pub const ZERO: Self = Self(0);

    /// Clamps `value` into the gesture range.
    pub fn new(value: u8) -> Self {
        Self(value.min(MAX_GESTURE))
    }

    /// `valleys + 1` fingers, capped at `cap` (itself never above six).
    pub fn from_valleys(valleys: usize, cap: u8) -> Self {
        let cap = cap.min(MAX_GESTURE) as usize;
        Self((valleys.saturating_add(1)).min(cap) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for GestureCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<GestureCount> for u8 {
    fn from(count: GestureCount) -> Self {
        count.0
    }
}

/// Tunables for the decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderConfig {
    /// Side of the square Gaussian kernel. 1 or less disables smoothing.
    pub blur_kernel: u32,
    /// A defect whose far-point angle is at or below this many degrees counts as a valley.
    pub valley_angle_max: f64,
    /// Upper bound on the reported count (never above six).
    pub max_count: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 35,
            valley_angle_max: 90.0,
            max_count: MAX_GESTURE,
        }
    }
}

/// Every intermediate product of one decode, for debugging and overlays.
#[derive(Debug, Clone)]
pub struct GestureAnalysis {
    pub threshold: u8,
    /// The inverted binary mask the contours were traced on.
    pub mask: GrayImage,
    /// The largest contour, taken to be the hand.
    pub hand: Option<Contour>,
    pub hull: Option<ConvexHull>,
    pub defects: Vec<ConvexityDefect>,
    pub valleys: usize,
    pub count: GestureCount,
}

/// Counts the defects that look like the gap between two fingers.
/// Degenerate triangles never count.
pub fn count_valleys(contour: &Contour, defects: &[ConvexityDefect], angle_max: f64) -> usize {
    defects
        .iter()
        .filter_map(|d| d.angle_degrees(contour))
        .filter(|&angle| angle <= angle_max)
        .count()
}

/// The stateless finger-count decoder.
#[derive(Debug, Clone, Default)]
pub struct GestureDecoder {
    config: DecoderConfig,
}

impl GestureDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Runs the full pipeline and keeps every intermediate result.
    pub fn analyze(&self, region: &ImageRegion) -> GestureAnalysis {
        let gray = smooth(&to_intensity(region.pixels()), self.config.blur_kernel);
        let threshold = otsu_threshold(&gray);
        let mask = binarize_inverted(&gray, threshold);
        let contours = find_contours(&mask);
        debug!("otsu threshold {threshold}, {} contours", contours.len());

        let Some(hand) = largest_contour(&contours).cloned() else {
            return GestureAnalysis {
                threshold,
                mask,
                hand: None,
                hull: None,
                defects: Vec::new(),
                valleys: 0,
                count: GestureCount::ZERO,
            };
        };

        let hull = ConvexHull::of(&hand);
        let defects = convexity_defects(&hand, &hull);
        let valleys = count_valleys(&hand, &defects, self.config.valley_angle_max);
        let count = if defects.is_empty() {
            GestureCount::ZERO
        } else {
            GestureCount::from_valleys(valleys, self.config.max_count)
        };
        debug!(
            "hand contour: {} points, area {:.0}, hull {}, defects {}, valleys {} -> {}",
            hand.len(),
            hand.area(),
            hull.len(),
            defects.len(),
            valleys,
            count
        );

        GestureAnalysis {
            threshold,
            mask,
            hand: Some(hand),
            hull: Some(hull),
            defects,
            valleys,
            count,
        }
    }

    /// Reads the finger count shown in `region`.
    pub fn decode(&self, region: &ImageRegion) -> GestureCount {
        self.analyze(region).count
    }
}

/// Decodes `region` with the default configuration.
pub fn decode(region: &ImageRegion) -> GestureCount {
    GestureDecoder::default().decode(region)
}

/// Anything that can turn a hand region into a finger count.
pub trait GestureReader {
    fn read_gesture(&mut self, region: &ImageRegion) -> GestureCount;
}

impl GestureReader for GestureDecoder {
    fn read_gesture(&mut self, region: &ImageRegion) -> GestureCount {
        self.decode(region)
    }
}
