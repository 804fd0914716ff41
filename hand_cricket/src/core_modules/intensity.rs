// THEORY (Intensity & Binarization):
// Before any geometry can happen, the hand region has to become a clean two-class
// mask: hand versus everything else. This module does that in three steps, each a
// pure function over an `image` buffer.
//
// 1) Intensity: collapse RGB to a single luma channel (Rec. 601 weights).
// 2) Smoothing: a heavy Gaussian blur. The kernel is large relative to a finger
//    (35x35 by default) so skin texture, creases and sensor noise melt away and
//    only the silhouette survives. Sigma is derived from the kernel size with the
//    conventional rule `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
// 3) Binarization: Otsu's method picks the single global threshold that best
//    separates the histogram into two classes. The result is inverted: anything
//    at or below the threshold is foreground (255), brighter pixels are
//    background (0). There is no local or adaptive thresholding.

use image::{GrayImage, Luma, RgbImage, imageops};

pub type Intensity = u8;
pub type Threshold = u8;

/// Mask value for hand pixels.
pub const FOREGROUND: Intensity = 255;
/// Mask value for everything else.
pub const BACKGROUND: Intensity = 0;

const HISTOGRAM_BINS: usize = 256;

/// Converts an RGB buffer into a single-channel luma image (Rec. 601).
pub fn to_intensity(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let pixel = rgb.get_pixel(x, y);
        let luma = 0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
        Luma([luma.round().clamp(0.0, 255.0) as Intensity])
    })
}

/// Gaussian sigma for a square kernel of side `kernel`.
pub fn sigma_for_kernel(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Blurs with a Gaussian sized for a `kernel` x `kernel` window.
/// A kernel of 1 or less, or an empty image, is returned untouched.
pub fn smooth(gray: &GrayImage, kernel: u32) -> GrayImage {
    if kernel <= 1 || gray.width() == 0 || gray.height() == 0 {
        return gray.clone();
    }
    imageops::blur(gray, sigma_for_kernel(kernel))
}

/// Otsu's global threshold: the level that maximizes between-class variance.
/// Ties resolve to the lowest level; a uniform image yields 0.
pub fn otsu_threshold(gray: &GrayImage) -> Threshold {
    let mut histogram = [0u64; HISTOGRAM_BINS];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0;
    }
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut below = 0u64;
    let mut weighted_below = 0.0f64;
    let mut best_variance = 0.0f64;
    let mut threshold: Threshold = 0;

    for (level, &count) in histogram.iter().enumerate() {
        below += count;
        if below == 0 {
            continue;
        }
        let above = total - below;
        if above == 0 {
            break;
        }
        weighted_below += level as f64 * count as f64;

        let mean_below = weighted_below / below as f64;
        let mean_above = (weighted_total - weighted_below) / above as f64;
        let spread = mean_below - mean_above;
        let variance = below as f64 * above as f64 * spread * spread;

        if variance > best_variance {
            best_variance = variance;
            threshold = level as Threshold;
        }
    }

    threshold
}

/// Inverted binary threshold: `value > threshold` becomes background,
/// everything else foreground.
pub fn binarize_inverted(gray: &GrayImage, threshold: Threshold) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > threshold {
            Luma([BACKGROUND])
        } else {
            Luma([FOREGROUND])
        }
    })
}
